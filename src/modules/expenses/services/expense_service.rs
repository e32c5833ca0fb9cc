use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::expenses::{
    models::{Expense, ExpenseCategory},
    repositories::{CategoryTotal, ExpenseRepository},
};

/// Month-level view of the expense ledger
#[derive(Debug)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub totals: Vec<CategoryTotal>,
    pub grand_total: Decimal,
}

/// Service for expense ledger business logic
pub struct ExpenseService {
    repository: ExpenseRepository,
    currency: Currency,
}

impl ExpenseService {
    pub fn new(pool: MySqlPool, currency: Currency) -> Self {
        Self {
            repository: ExpenseRepository::new(pool),
            currency,
        }
    }

    pub async fn record(
        &self,
        category: ExpenseCategory,
        amount: Decimal,
        incurred_on: Option<NaiveDate>,
        description: String,
    ) -> Result<Expense> {
        self.currency
            .validate_amount(amount)
            .map_err(AppError::Validation)?;

        let incurred_on = incurred_on.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let expense = Expense::new(category, amount, incurred_on, description)?;
        self.repository.create(&expense).await?;

        info!(
            expense_id = expense.id.as_str(),
            category = %expense.category,
            amount = %expense.amount,
            "Expense recorded"
        );

        Ok(expense)
    }

    pub async fn get(&self, id: &str) -> Result<Expense> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Expense not found"))
    }

    pub async fn list_for_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        validate_month(month)?;
        self.repository.find_by_month(year, month).await
    }

    /// Per-category totals plus grand total for one calendar month
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        validate_month(month)?;

        let totals = self.repository.monthly_totals(year, month).await?;
        let grand_total = totals.iter().map(|t| t.total).sum();

        Ok(MonthlySummary {
            year,
            month,
            totals,
            grand_total,
        })
    }

    pub async fn update(
        &self,
        id: &str,
        category: Option<ExpenseCategory>,
        amount: Option<Decimal>,
        incurred_on: Option<NaiveDate>,
        description: Option<String>,
    ) -> Result<Expense> {
        let mut expense = self.get(id).await?;

        if let Some(category) = category {
            expense.category = category;
        }

        if let Some(amount) = amount {
            if amount <= Decimal::ZERO {
                return Err(AppError::validation("Expense amount must be positive"));
            }
            self.currency
                .validate_amount(amount)
                .map_err(AppError::Validation)?;
            expense.amount = amount;
        }

        if let Some(incurred_on) = incurred_on {
            expense.incurred_on = incurred_on;
        }

        if let Some(description) = description {
            let description = description.trim().to_string();
            if description.is_empty() {
                return Err(AppError::validation("Expense description must not be empty"));
            }
            expense.description = description;
        }

        expense.updated_at = chrono::Utc::now().naive_utc();
        self.repository.update(&expense).await?;

        info!(expense_id = id, "Expense updated");

        Ok(expense)
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;

        info!(expense_id = id, "Expense deleted");

        Ok(())
    }
}

fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!("Invalid month: {}", month)));
    }
    Ok(())
}

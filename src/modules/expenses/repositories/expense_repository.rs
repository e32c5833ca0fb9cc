use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::expenses::models::{Expense, ExpenseCategory};

/// Per-category total for one calendar month
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Decimal,
}

/// Repository for expense ledger operations
pub struct ExpenseRepository {
    pool: MySqlPool,
}

impl ExpenseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, category, amount, incurred_on, description, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(expense.category.to_string())
        .bind(expense.amount)
        .bind(expense.incurred_on)
        .bind(&expense.description)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert expense: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, category, amount, incurred_on, description, created_at, updated_at
            FROM expenses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch expense: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    /// Ledger entries for one calendar month, newest first
    pub async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, category, amount, incurred_on, description, created_at, updated_at
            FROM expenses
            WHERE YEAR(incurred_on) = ? AND MONTH(incurred_on) = ?
            ORDER BY incurred_on DESC
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch expenses: {}", e)))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Per-category totals for one calendar month
    pub async fn monthly_totals(&self, year: i32, month: u32) -> Result<Vec<CategoryTotal>> {
        let rows = sqlx::query_as::<_, CategoryTotalRow>(
            r#"
            SELECT category, SUM(amount) AS total
            FROM expenses
            WHERE YEAR(incurred_on) = ? AND MONTH(incurred_on) = ?
            GROUP BY category
            ORDER BY total DESC
            "#,
        )
        .bind(year)
        .bind(month)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to sum expenses: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let category =
                    ExpenseCategory::try_from(row.category).map_err(AppError::Internal)?;
                Ok(CategoryTotal {
                    category,
                    total: row.total,
                })
            })
            .collect()
    }

    pub async fn update(&self, expense: &Expense) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE expenses
            SET category = ?, amount = ?, incurred_on = ?, description = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(expense.category.to_string())
        .bind(expense.amount)
        .bind(expense.incurred_on)
        .bind(&expense.description)
        .bind(expense.updated_at)
        .bind(&expense.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update expense: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Expense not found"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete expense: {}", e)))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Expense not found"));
        }

        Ok(())
    }
}

/// Database row for the `expenses` table
#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    category: String,
    amount: rust_decimal::Decimal,
    incurred_on: chrono::NaiveDate,
    description: String,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = AppError;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        let category = ExpenseCategory::try_from(row.category).map_err(AppError::Internal)?;

        Ok(Expense {
            id: row.id,
            category,
            amount: row.amount,
            incurred_on: row.incurred_on,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryTotalRow {
    category: String,
    total: rust_decimal::Decimal,
}

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Operating-expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Equipment,
    Maintenance,
    Salary,
    Utilities,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Maintenance => "maintenance",
            Self::Salary => "salary",
            Self::Utilities => "utilities",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ExpenseCategory {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "equipment" => Ok(Self::Equipment),
            "maintenance" => Ok(Self::Maintenance),
            "salary" => Ok(Self::Salary),
            "utilities" => Ok(Self::Utilities),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid expense category: {}", value)),
        }
    }
}

/// One entry in the operating-expense ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub incurred_on: NaiveDate,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    pub fn new(
        category: ExpenseCategory,
        amount: Decimal,
        incurred_on: NaiveDate,
        description: String,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("Expense amount must be positive"));
        }

        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::validation("Expense description must not be empty"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            category,
            amount,
            incurred_on,
            description,
            created_at: now,
            updated_at: now,
        })
    }
}

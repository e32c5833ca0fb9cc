use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentMethod};

/// Repository for payment database operations
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, member_id, amount, method, paid_on, note, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.member_id)
        .bind(payment.amount)
        .bind(payment.method.to_string())
        .bind(payment.paid_on)
        .bind(&payment.note)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert payment: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, member_id, amount, method, paid_on, note, created_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch payment: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    /// A member's payments, newest first
    pub async fn find_by_member(&self, member_id: &str) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, member_id, amount, method, paid_on, note, created_at
            FROM payments
            WHERE member_id = ?
            ORDER BY paid_on DESC, created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch payments: {}", e)))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Sum of everything a member has paid
    pub async fn total_for_member(&self, member_id: &str) -> Result<Decimal> {
        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(amount) FROM payments WHERE member_id = ?",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to sum payments: {}", e)))?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }
}

/// Database row for the `payments` table
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: String,
    member_id: String,
    amount: rust_decimal::Decimal,
    method: String,
    paid_on: chrono::NaiveDate,
    note: Option<String>,
    created_at: chrono::NaiveDateTime,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let method = PaymentMethod::try_from(row.method).map_err(AppError::Internal)?;

        Ok(Payment {
            id: row.id,
            member_id: row.member_id,
            amount: row.amount,
            method,
            paid_on: row.paid_on,
            note: row.note,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_payment_row_conversion() {
        let row = PaymentRow {
            id: "pay-001".to_string(),
            member_id: "mem-001".to_string(),
            amount: Decimal::new(33300, 2),
            method: "card".to_string(),
            paid_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            note: Some("first installment".to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        };

        let payment: Payment = row.try_into().unwrap();
        assert_eq!(payment.method, PaymentMethod::Card);
        assert_eq!(payment.amount, Decimal::new(33300, 2));
    }

    #[test]
    fn test_invalid_method_conversion() {
        let row = PaymentRow {
            id: "pay-001".to_string(),
            member_id: "mem-001".to_string(),
            amount: Decimal::new(100, 0),
            method: "barter".to_string(),
            paid_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            note: None,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let result: Result<Payment> = row.try_into();
        assert!(result.is_err());
    }
}

// MySQL persistence for installment plans.
//
// A plan is stored as one row in `installment_plans` plus one row per
// installment in `installments`, keyed by (plan_id, number). Writes that
// touch both tables run in a transaction.

use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::installments::models::{Installment, InstallmentPlan};

/// Repository for installment plan database operations
pub struct InstallmentRepository {
    pool: MySqlPool,
}

impl InstallmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Persist a confirmed plan together with its installments
    pub async fn create(&self, plan: &InstallmentPlan) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO installment_plans (
                id, membership_id, enabled, total_amount, num_installments,
                down_payment, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.membership_id)
        .bind(plan.enabled)
        .bind(plan.total_amount)
        .bind(plan.num_installments)
        .bind(plan.down_payment)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(tx.as_mut())
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert plan: {}", e)))?;

        for installment in &plan.installments {
            self.insert_installment_with_tx(&mut tx, &plan.id, installment)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn insert_installment_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        plan_id: &str,
        installment: &Installment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO installments (
                plan_id, number, amount, due_date, paid, paid_date, payment_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(plan_id)
        .bind(installment.number)
        .bind(installment.amount)
        .bind(installment.due_date)
        .bind(installment.paid)
        .bind(installment.paid_date)
        .bind(&installment.payment_id)
        .execute(tx.as_mut())
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert installment: {}", e)))?;

        Ok(())
    }

    /// Find a plan (with its installments, ordered by number) by plan ID
    pub async fn find_by_id(&self, plan_id: &str) -> Result<Option<InstallmentPlan>> {
        let row = sqlx::query_as::<_, InstallmentPlanRow>(
            r#"
            SELECT id, membership_id, enabled, total_amount, num_installments,
                   down_payment, created_at, updated_at
            FROM installment_plans
            WHERE id = ?
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch plan: {}", e)))?;

        match row {
            Some(row) => Ok(Some(self.load_installments(row).await?)),
            None => Ok(None),
        }
    }

    /// Find the plan attached to a membership, if any
    pub async fn find_by_membership(&self, membership_id: &str) -> Result<Option<InstallmentPlan>> {
        let row = sqlx::query_as::<_, InstallmentPlanRow>(
            r#"
            SELECT id, membership_id, enabled, total_amount, num_installments,
                   down_payment, created_at, updated_at
            FROM installment_plans
            WHERE membership_id = ?
            "#,
        )
        .bind(membership_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch plan: {}", e)))?;

        match row {
            Some(row) => Ok(Some(self.load_installments(row).await?)),
            None => Ok(None),
        }
    }

    async fn load_installments(&self, row: InstallmentPlanRow) -> Result<InstallmentPlan> {
        let installments = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT plan_id, number, amount, due_date, paid, paid_date, payment_id
            FROM installments
            WHERE plan_id = ?
            ORDER BY number ASC
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch installments: {}", e)))?;

        Ok(InstallmentPlan {
            id: row.id,
            membership_id: row.membership_id,
            enabled: row.enabled,
            total_amount: row.total_amount,
            num_installments: row.num_installments,
            down_payment: row.down_payment,
            installments: installments.into_iter().map(Installment::from).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Update a single installment row (used when marking paid)
    pub async fn update_installment(&self, plan_id: &str, installment: &Installment) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE installments
            SET amount = ?, due_date = ?, paid = ?, paid_date = ?, payment_id = ?
            WHERE plan_id = ? AND number = ?
            "#,
        )
        .bind(installment.amount)
        .bind(installment.due_date)
        .bind(installment.paid)
        .bind(installment.paid_date)
        .bind(&installment.payment_id)
        .bind(plan_id)
        .bind(installment.number)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update installment: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Installment not found"));
        }

        self.touch_plan(plan_id).await
    }

    /// Batch update installment amounts and due dates (manual overrides)
    pub async fn update_installments(
        &self,
        plan_id: &str,
        installments: &[Installment],
    ) -> Result<()> {
        if installments.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start transaction: {}", e)))?;

        for installment in installments {
            sqlx::query(
                r#"
                UPDATE installments
                SET amount = ?, due_date = ?
                WHERE plan_id = ? AND number = ?
                "#,
            )
            .bind(installment.amount)
            .bind(installment.due_date)
            .bind(plan_id)
            .bind(installment.number)
            .execute(tx.as_mut())
            .await
            .map_err(|e| AppError::internal(format!("Failed to update installment: {}", e)))?;
        }

        sqlx::query("UPDATE installment_plans SET updated_at = ? WHERE id = ?")
            .bind(chrono::Utc::now().naive_utc())
            .bind(plan_id)
            .execute(tx.as_mut())
            .await
            .map_err(|e| AppError::internal(format!("Failed to touch plan: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn touch_plan(&self, plan_id: &str) -> Result<()> {
        sqlx::query("UPDATE installment_plans SET updated_at = ? WHERE id = ?")
            .bind(chrono::Utc::now().naive_utc())
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to touch plan: {}", e)))?;

        Ok(())
    }
}

/// Database row for the `installment_plans` table
#[derive(sqlx::FromRow)]
struct InstallmentPlanRow {
    id: String,
    membership_id: String,
    enabled: bool,
    total_amount: rust_decimal::Decimal,
    num_installments: u32,
    down_payment: Option<rust_decimal::Decimal>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

/// Database row for the `installments` table
#[derive(sqlx::FromRow)]
struct InstallmentRow {
    #[allow(dead_code)]
    plan_id: String,
    number: u32,
    amount: rust_decimal::Decimal,
    due_date: chrono::NaiveDate,
    paid: bool,
    paid_date: Option<chrono::NaiveDate>,
    payment_id: Option<String>,
}

impl From<InstallmentRow> for Installment {
    fn from(row: InstallmentRow) -> Self {
        Installment {
            number: row.number,
            amount: row.amount,
            due_date: row.due_date,
            paid: row.paid,
            paid_date: row.paid_date,
            payment_id: row.payment_id,
        }
    }
}

use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::memberships::models::MembershipPlan;

/// Repository for membership plan catalog operations
pub struct PlanRepository {
    pool: MySqlPool,
}

impl PlanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, plan: &MembershipPlan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO membership_plans (
                id, name, duration_months, price, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(plan.duration_months)
        .bind(plan.price)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert plan: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<MembershipPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, duration_months, price, created_at, updated_at
            FROM membership_plans
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch plan: {}", e)))?;

        Ok(row.map(MembershipPlan::from))
    }

    pub async fn list(&self) -> Result<Vec<MembershipPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT id, name, duration_months, price, created_at, updated_at
            FROM membership_plans
            ORDER BY duration_months ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to list plans: {}", e)))?;

        Ok(rows.into_iter().map(MembershipPlan::from).collect())
    }

    pub async fn update(&self, plan: &MembershipPlan) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE membership_plans
            SET name = ?, duration_months = ?, price = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&plan.name)
        .bind(plan.duration_months)
        .bind(plan.price)
        .bind(plan.updated_at)
        .bind(&plan.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update plan: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Membership plan not found"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM membership_plans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete plan: {}", e)))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Membership plan not found"));
        }

        Ok(())
    }
}

/// Database row for the `membership_plans` table
#[derive(sqlx::FromRow)]
struct PlanRow {
    id: String,
    name: String,
    duration_months: u32,
    price: rust_decimal::Decimal,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl From<PlanRow> for MembershipPlan {
    fn from(row: PlanRow) -> Self {
        MembershipPlan {
            id: row.id,
            name: row.name,
            duration_months: row.duration_months,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

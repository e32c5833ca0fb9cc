use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::memberships::models::{Membership, MembershipStatus};

/// Repository for membership period database operations
pub struct MembershipRepository {
    pool: MySqlPool,
}

impl MembershipRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, membership: &Membership) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memberships (
                id, member_id, plan_id, start_date, end_date, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&membership.id)
        .bind(&membership.member_id)
        .bind(&membership.plan_id)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .bind(membership.status.to_string())
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert membership: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Membership>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, member_id, plan_id, start_date, end_date, status,
                   created_at, updated_at
            FROM memberships
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch membership: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    /// All periods for a member, newest first
    pub async fn find_by_member(&self, member_id: &str) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, member_id, plan_id, start_date, end_date, status,
                   created_at, updated_at
            FROM memberships
            WHERE member_id = ?
            ORDER BY start_date DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch memberships: {}", e)))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    pub async fn update(&self, membership: &Membership) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE memberships
            SET plan_id = ?, start_date = ?, end_date = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&membership.plan_id)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .bind(membership.status.to_string())
        .bind(membership.updated_at)
        .bind(&membership.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update membership: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Membership not found"));
        }

        Ok(())
    }
}

/// Database row for the `memberships` table
#[derive(sqlx::FromRow)]
struct MembershipRow {
    id: String,
    member_id: String,
    plan_id: String,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    status: String,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = AppError;

    fn try_from(row: MembershipRow) -> Result<Self> {
        let status = MembershipStatus::try_from(row.status).map_err(AppError::Internal)?;

        Ok(Membership {
            id: row.id,
            member_id: row.member_id,
            plan_id: row.plan_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

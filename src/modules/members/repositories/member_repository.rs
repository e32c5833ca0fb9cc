// MySQL CRUD for gym members, implementing the shared Repository trait.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::traits::Repository;
use crate::core::{AppError, Result};
use crate::modules::members::models::{Member, MemberStatus};

/// Repository for member database operations
pub struct MemberRepository {
    pool: MySqlPool,
}

impl MemberRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Member, String> for MemberRepository {
    async fn create(&self, member: Member) -> Result<Member> {
        sqlx::query(
            r#"
            INSERT INTO members (
                id, name, email, phone, status, joined_on, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.status.to_string())
        .bind(member.joined_on)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to insert member: {}", e)))?;

        Ok(member)
    }

    async fn find_by_id(&self, id: String) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, phone, status, joined_on, created_at, updated_at
            FROM members
            WHERE id = ?
            "#,
        )
        .bind(&id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch member: {}", e)))?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: String, member: Member) -> Result<Member> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE members
            SET name = ?, email = ?, phone = ?, status = ?, joined_on = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.status.to_string())
        .bind(member.joined_on)
        .bind(member.updated_at)
        .bind(&id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update member: {}", e)))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Member not found"));
        }

        Ok(member)
    }

    async fn delete(&self, id: String) -> Result<()> {
        let rows_affected = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to delete member: {}", e)))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found("Member not found"));
        }

        Ok(())
    }

    async fn list(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Member>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, phone, status, joined_on, created_at, updated_at
            FROM members
            ORDER BY joined_on DESC, name ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to list members: {}", e)))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

/// Database row for the `members` table
#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    name: String,
    email: String,
    phone: Option<String>,
    status: String,
    joined_on: chrono::NaiveDate,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl TryFrom<MemberRow> for Member {
    type Error = AppError;

    fn try_from(row: MemberRow) -> Result<Self> {
        let status = MemberStatus::try_from(row.status).map_err(AppError::Internal)?;

        Ok(Member {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            status,
            joined_on: row.joined_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_member_row_conversion() {
        let row = MemberRow {
            id: "mem-001".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: "active".to_string(),
            joined_on: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let member: Member = row.try_into().unwrap();
        assert_eq!(member.id, "mem-001");
        assert_eq!(member.status, MemberStatus::Active);
    }

    #[test]
    fn test_invalid_status_conversion() {
        let row = MemberRow {
            id: "mem-001".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: "banned".to_string(),
            joined_on: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let result: Result<Member> = row.try_into();
        assert!(result.is_err());
    }
}

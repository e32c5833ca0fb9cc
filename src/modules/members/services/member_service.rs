use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::traits::Repository;
use crate::core::{AppError, Result};
use crate::modules::members::{models::Member, repositories::MemberRepository};

/// Service for member business logic
pub struct MemberService {
    repository: MemberRepository,
}

impl MemberService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: MemberRepository::new(pool),
        }
    }

    /// Register a new member
    pub async fn register(
        &self,
        name: String,
        email: String,
        phone: Option<String>,
        joined_on: Option<NaiveDate>,
    ) -> Result<Member> {
        let joined_on = joined_on.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let member = Member::new(name, email, phone, joined_on)?;
        let member = self.repository.create(member).await?;

        info!(
            member_id = member.id.as_str(),
            name = member.name.as_str(),
            "Member registered"
        );

        Ok(member)
    }

    pub async fn get(&self, id: &str) -> Result<Member> {
        self.repository
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))
    }

    pub async fn list(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Vec<Member>> {
        self.repository.list(limit, offset).await
    }

    /// Update contact details on an existing member
    pub async fn update_details(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Member> {
        let mut member = self.get(id).await?;

        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::validation("Member name must not be empty"));
            }
            member.name = name;
        }

        if let Some(email) = email {
            if !email.contains('@') || !email.contains('.') {
                return Err(AppError::validation(format!(
                    "Invalid email address: {}",
                    email
                )));
            }
            member.email = email;
        }

        if let Some(phone) = phone {
            member.phone = Some(phone);
        }

        member.updated_at = chrono::Utc::now().naive_utc();
        let member = self.repository.update(id.to_string(), member).await?;

        info!(member_id = id, "Member details updated");

        Ok(member)
    }

    /// Deactivate a member without deleting history
    pub async fn deactivate(&self, id: &str) -> Result<Member> {
        let mut member = self.get(id).await?;
        member.deactivate();
        let member = self.repository.update(id.to_string(), member).await?;

        info!(member_id = id, "Member deactivated");

        Ok(member)
    }

    /// Remove a member record entirely
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.repository.delete(id.to_string()).await?;

        info!(member_id = id, "Member deleted");

        Ok(())
    }
}

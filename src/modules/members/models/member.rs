use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Membership status of a gym member record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Member can use the gym
    Active,
    /// Member record kept for history, access disabled
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for MemberStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Invalid member status: {}", value)),
        }
    }
}

/// A registered gym member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: MemberStatus,
    pub joined_on: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Member {
    /// Create a new active member
    pub fn new(
        name: String,
        email: String,
        phone: Option<String>,
        joined_on: NaiveDate,
    ) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Member name must not be empty"));
        }

        if !email.contains('@') || !email.contains('.') {
            return Err(AppError::validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            status: MemberStatus::Active,
            joined_on,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Disable gym access while keeping the record
    pub fn deactivate(&mut self) {
        self.status = MemberStatus::Inactive;
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    pub fn reactivate(&mut self) {
        self.status = MemberStatus::Active;
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

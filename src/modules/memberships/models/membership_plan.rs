use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A catalog entry describing a purchasable membership.
///
/// The plan price is the total an installment schedule must collect when a
/// membership on this plan is paid in parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: String,
    pub name: String,
    /// Membership length in calendar months
    pub duration_months: u32,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MembershipPlan {
    pub fn new(name: String, duration_months: u32, price: Decimal) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Plan name must not be empty"));
        }

        if duration_months == 0 {
            return Err(AppError::validation(
                "Plan duration must be at least one month",
            ));
        }

        if price <= Decimal::ZERO {
            return Err(AppError::validation("Plan price must be positive"));
        }

        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            duration_months,
            price,
            created_at: now,
            updated_at: now,
        })
    }
}

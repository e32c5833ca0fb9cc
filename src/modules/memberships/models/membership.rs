use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::memberships::models::MembershipPlan;

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Period is running
    Active,
    /// Period has ended (or was superseded by a renewal)
    Expired,
    /// Terminated before the period ended
    Cancelled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for MembershipStatus {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid membership status: {}", value)),
        }
    }
}

/// One paid membership period for a member on a plan.
///
/// The period end is derived from the plan duration with the same
/// calendar-month arithmetic the installment schedule uses for due dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: String,
    pub member_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MembershipStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Membership {
    /// Start a new membership period on a plan
    pub fn new(member_id: String, plan: &MembershipPlan, start_date: NaiveDate) -> Result<Self> {
        let end_date = Self::period_end(start_date, plan.duration_months)?;
        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            member_id,
            plan_id: plan.id.clone(),
            start_date,
            end_date,
            status: MembershipStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Compute a period end: start + duration calendar months
    pub fn period_end(start_date: NaiveDate, duration_months: u32) -> Result<NaiveDate> {
        start_date
            .checked_add_months(Months::new(duration_months))
            .ok_or_else(|| AppError::validation("Failed to calculate membership end date"))
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    /// Anchor date for a renewal: a running membership renews from its
    /// current end date, a lapsed one from today.
    pub fn renewal_start(&self, today: NaiveDate) -> NaiveDate {
        if self.end_date >= today {
            self.end_date
        } else {
            today
        }
    }

    pub fn mark_expired(&mut self) {
        self.status = MembershipStatus::Expired;
        self.updated_at = chrono::Utc::now().naive_utc();
    }

    pub fn cancel(&mut self) -> Result<()> {
        if self.status != MembershipStatus::Active {
            return Err(AppError::validation(format!(
                "Only active memberships can be cancelled (status: {})",
                self.status
            )));
        }

        self.status = MembershipStatus::Cancelled;
        self.updated_at = chrono::Utc::now().naive_utc();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual_plan() -> MembershipPlan {
        MembershipPlan::new("Annual".to_string(), 12, dec!(1200)).unwrap()
    }

    #[test]
    fn test_period_end_calendar_months() {
        assert_eq!(
            Membership::period_end(date(2026, 1, 15), 12).unwrap(),
            date(2027, 1, 15)
        );
        // Month-end clamping
        assert_eq!(
            Membership::period_end(date(2026, 1, 31), 1).unwrap(),
            date(2026, 2, 28)
        );
    }

    #[test]
    fn test_membership_period_from_plan() {
        let membership =
            Membership::new("mem-001".to_string(), &annual_plan(), date(2026, 3, 1)).unwrap();

        assert_eq!(membership.start_date, date(2026, 3, 1));
        assert_eq!(membership.end_date, date(2027, 3, 1));
        assert_eq!(membership.status, MembershipStatus::Active);
    }

    #[test]
    fn test_renewal_start_running_membership() {
        let membership =
            Membership::new("mem-001".to_string(), &annual_plan(), date(2026, 1, 1)).unwrap();

        // Still running: renewal chains onto the current period
        assert_eq!(
            membership.renewal_start(date(2026, 6, 1)),
            date(2027, 1, 1)
        );
    }

    #[test]
    fn test_renewal_start_lapsed_membership() {
        let membership =
            Membership::new("mem-001".to_string(), &annual_plan(), date(2024, 1, 1)).unwrap();

        // Lapsed: renewal starts fresh from today
        assert_eq!(
            membership.renewal_start(date(2026, 6, 1)),
            date(2026, 6, 1)
        );
    }

    #[test]
    fn test_is_expired() {
        let membership =
            Membership::new("mem-001".to_string(), &annual_plan(), date(2026, 1, 1)).unwrap();

        assert!(!membership.is_expired(date(2027, 1, 1)));
        assert!(membership.is_expired(date(2027, 1, 2)));
    }

    #[test]
    fn test_cancel_only_active() {
        let mut membership =
            Membership::new("mem-001".to_string(), &annual_plan(), date(2026, 1, 1)).unwrap();

        membership.cancel().unwrap();
        assert_eq!(membership.status, MembershipStatus::Cancelled);

        // Cancelling twice fails
        assert!(membership.cancel().is_err());
    }
}

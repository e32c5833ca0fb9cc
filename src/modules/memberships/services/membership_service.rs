// Membership period lifecycle: enrollment, cancellation, renewal.
//
// Renewal chains a new period onto a running membership (or starts fresh
// for a lapsed one) and can attach an installment plan for the plan price
// in the same operation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::installments::{
    models::{InstallmentPlan, ScheduleRequest},
    services::InstallmentService,
};
use crate::modules::memberships::{
    models::{Membership, MembershipStatus},
    repositories::{MembershipRepository, PlanRepository},
};

/// Installment terms chosen in the renewal/setup form. The total collected
/// is always the membership plan's price.
#[derive(Debug, Clone)]
pub struct InstallmentTerms {
    pub num_installments: u32,
    pub down_payment: Option<Decimal>,
}

/// Result of a renewal: the new period, plus the installment plan when the
/// renewal was paid in parts.
#[derive(Debug)]
pub struct RenewalOutcome {
    pub membership: Membership,
    pub installment_plan: Option<InstallmentPlan>,
}

/// Service for membership period business logic
pub struct MembershipService {
    repository: MembershipRepository,
    plans: PlanRepository,
    installments: InstallmentService,
}

impl MembershipService {
    pub fn new(pool: MySqlPool, currency: Currency) -> Self {
        Self {
            repository: MembershipRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            installments: InstallmentService::new(pool, currency),
        }
    }

    /// Enroll a member on a plan, starting a new period
    pub async fn enroll(
        &self,
        member_id: String,
        plan_id: &str,
        start_date: Option<NaiveDate>,
    ) -> Result<Membership> {
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership plan not found"))?;

        let start_date = start_date.unwrap_or_else(|| chrono::Utc::now().date_naive());
        let membership = Membership::new(member_id, &plan, start_date)?;
        self.repository.create(&membership).await?;

        info!(
            membership_id = membership.id.as_str(),
            member_id = membership.member_id.as_str(),
            plan = plan.name.as_str(),
            end_date = %membership.end_date,
            "Membership started"
        );

        Ok(membership)
    }

    pub async fn get(&self, id: &str) -> Result<Membership> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership not found"))
    }

    pub async fn list_for_member(&self, member_id: &str) -> Result<Vec<Membership>> {
        self.repository.find_by_member(member_id).await
    }

    pub async fn cancel(&self, id: &str) -> Result<Membership> {
        let mut membership = self.get(id).await?;
        membership.cancel()?;
        self.repository.update(&membership).await?;

        info!(membership_id = id, "Membership cancelled");

        Ok(membership)
    }

    /// Renew a membership.
    ///
    /// The new period starts where the old one ends (or today, when the old
    /// one has lapsed), on the same plan unless a different `plan_id` is
    /// given. With installment terms, the plan price is spread into a
    /// schedule anchored on the new period's start date and persisted with
    /// the new membership.
    pub async fn renew(
        &self,
        membership_id: &str,
        plan_id: Option<String>,
        start_date: Option<NaiveDate>,
        terms: Option<InstallmentTerms>,
    ) -> Result<RenewalOutcome> {
        let mut previous = self.get(membership_id).await?;

        let plan_id = plan_id.unwrap_or_else(|| previous.plan_id.clone());
        let plan = self
            .plans
            .find_by_id(&plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership plan not found"))?;

        let today = chrono::Utc::now().date_naive();
        let start_date = start_date.unwrap_or_else(|| previous.renewal_start(today));

        let membership = Membership::new(previous.member_id.clone(), &plan, start_date)?;
        self.repository.create(&membership).await?;

        // The renewed period supersedes the old one
        if previous.status == MembershipStatus::Active {
            previous.mark_expired();
            self.repository.update(&previous).await?;
        }

        let installment_plan = match terms {
            Some(terms) => {
                let request = ScheduleRequest::new(
                    plan.price,
                    terms.num_installments,
                    Some(start_date),
                    terms.down_payment,
                );

                Some(
                    self.installments
                        .create_plan(membership.id.clone(), request)
                        .await?,
                )
            }
            None => None,
        };

        info!(
            membership_id = membership.id.as_str(),
            renewed_from = membership_id,
            plan = plan.name.as_str(),
            with_installments = installment_plan.is_some(),
            "Membership renewed"
        );

        Ok(RenewalOutcome {
            membership,
            installment_plan,
        })
    }
}

// Business logic for installment plan lifecycle.
//
// - Preview: recompute a draft schedule on every structural-input change
// - Create: compute, run the balance gate, persist plan + installments
// - Adjust: apply manual per-installment overrides, balance-gate at save
// - Mark paid: settle one installment and link the payment record

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::core::{AppError, Currency, Result};
use crate::modules::installments::{
    models::{Installment, InstallmentPlan, ScheduleRequest},
    repositories::InstallmentRepository,
    services::ScheduleCalculator,
};

/// A manual edit to a single installment in a draft plan.
///
/// Overrides never touch sibling installments; the balance gate decides at
/// save time whether the edited schedule is still acceptable.
#[derive(Debug, Clone)]
pub struct InstallmentOverride {
    pub number: u32,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

/// Service for installment plan business logic
pub struct InstallmentService {
    repository: InstallmentRepository,
    currency: Currency,
}

impl InstallmentService {
    pub fn new(pool: MySqlPool, currency: Currency) -> Self {
        Self {
            repository: InstallmentRepository::new(pool),
            currency,
        }
    }

    /// Compute a schedule without persisting anything.
    ///
    /// Backs the live recomputation in the setup form: the draft schedule
    /// has no identity of its own and is regenerated in full whenever the
    /// caller changes total, count, start date, or down payment.
    pub fn preview(&self, request: &ScheduleRequest) -> Result<Vec<Installment>> {
        ScheduleCalculator::compute(request, self.currency)
    }

    /// Create and persist an installment plan for a membership
    pub async fn create_plan(
        &self,
        membership_id: String,
        request: ScheduleRequest,
    ) -> Result<InstallmentPlan> {
        if self
            .repository
            .find_by_membership(&membership_id)
            .await?
            .is_some()
        {
            return Err(AppError::validation(format!(
                "Membership {} already has an installment plan",
                membership_id
            )));
        }

        let installments = ScheduleCalculator::compute(&request, self.currency)?;
        ScheduleCalculator::verify_balance(&installments, request.total_amount)?;

        let plan = InstallmentPlan::new(membership_id, &request, installments);
        self.repository.create(&plan).await?;

        info!(
            plan_id = plan.id.as_str(),
            membership_id = plan.membership_id.as_str(),
            num_installments = plan.num_installments,
            total_amount = %plan.total_amount,
            "Installment plan created"
        );

        Ok(plan)
    }

    /// Get a plan by its ID
    pub async fn get_plan(&self, plan_id: &str) -> Result<InstallmentPlan> {
        self.repository
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment plan not found"))
    }

    /// Get the plan attached to a membership
    pub async fn get_plan_for_membership(&self, membership_id: &str) -> Result<InstallmentPlan> {
        self.repository
            .find_by_membership(membership_id)
            .await?
            .ok_or_else(|| AppError::not_found("Installment plan not found"))
    }

    /// Apply manual overrides to individual installments.
    ///
    /// Paid installments cannot be edited. Siblings of an edited installment
    /// are left untouched; the balance gate runs once over the resulting
    /// schedule before anything is written.
    pub async fn adjust_installments(
        &self,
        plan_id: &str,
        overrides: Vec<InstallmentOverride>,
    ) -> Result<InstallmentPlan> {
        if overrides.is_empty() {
            return Err(AppError::validation("No installment overrides provided"));
        }

        let mut plan = self.get_plan(plan_id).await?;
        let mut changed: Vec<u32> = Vec::with_capacity(overrides.len());

        for over in &overrides {
            let installment = plan.installment_mut(over.number)?;

            if installment.paid {
                return Err(AppError::validation(format!(
                    "Installment {} is already paid and cannot be adjusted",
                    over.number
                )));
            }

            if let Some(amount) = over.amount {
                if amount <= Decimal::ZERO {
                    return Err(AppError::validation(
                        "Installment amount must be positive",
                    ));
                }
                self.currency
                    .validate_amount(amount)
                    .map_err(AppError::Validation)?;
                installment.amount = amount;
            }

            if let Some(due_date) = over.due_date {
                installment.due_date = due_date;
            }

            changed.push(over.number);
        }

        // Pre-save gate: the edited schedule must still balance
        if let Err(e) = ScheduleCalculator::verify_balance(&plan.installments, plan.total_amount) {
            warn!(
                plan_id = plan_id,
                "Installment adjustment rejected by balance gate"
            );
            return Err(e);
        }

        let updated: Vec<Installment> = plan
            .installments
            .iter()
            .filter(|i| changed.contains(&i.number))
            .cloned()
            .collect();

        self.repository.update_installments(plan_id, &updated).await?;

        info!(
            plan_id = plan_id,
            adjusted = updated.len(),
            "Installments adjusted"
        );

        self.get_plan(plan_id).await
    }

    /// Mark an installment paid and link the settling payment record
    pub async fn mark_installment_paid(
        &self,
        plan_id: &str,
        number: u32,
        payment_id: String,
        paid_on: NaiveDate,
    ) -> Result<InstallmentPlan> {
        let mut plan = self.get_plan(plan_id).await?;

        let installment = plan.installment_mut(number)?;
        installment.mark_paid(payment_id, paid_on)?;

        let settled = installment.clone();
        self.repository.update_installment(plan_id, &settled).await?;

        info!(
            plan_id = plan_id,
            number = number,
            paid_on = %paid_on,
            "Installment marked as paid"
        );

        self.get_plan(plan_id).await
    }
}

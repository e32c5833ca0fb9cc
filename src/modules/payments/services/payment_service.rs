// Payment recording and installment settlement.
//
// A payment may target an installment, in which case the payment row is
// written first and the installment is then marked paid with the payment's
// id, giving the schedule a durable link back to the money that settled it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::info;

use crate::core::{AppError, Currency, Result};
use crate::modules::installments::{models::InstallmentPlan, services::InstallmentService};
use crate::modules::payments::{
    models::{Payment, PaymentMethod},
    repositories::PaymentRepository,
};

/// Which installment a payment settles
#[derive(Debug, Clone)]
pub struct InstallmentTarget {
    pub plan_id: String,
    pub number: u32,
}

/// Result of recording a payment
#[derive(Debug)]
pub struct PaymentOutcome {
    pub payment: Payment,
    /// Updated plan when the payment settled an installment
    pub installment_plan: Option<InstallmentPlan>,
}

/// Service for payment business logic
pub struct PaymentService {
    repository: PaymentRepository,
    installments: InstallmentService,
    currency: Currency,
}

impl PaymentService {
    pub fn new(pool: MySqlPool, currency: Currency) -> Self {
        Self {
            repository: PaymentRepository::new(pool.clone()),
            installments: InstallmentService::new(pool, currency),
            currency,
        }
    }

    /// Record a payment, optionally settling an installment
    pub async fn record(
        &self,
        member_id: String,
        amount: Decimal,
        method: PaymentMethod,
        paid_on: Option<NaiveDate>,
        note: Option<String>,
        target: Option<InstallmentTarget>,
    ) -> Result<PaymentOutcome> {
        self.currency
            .validate_amount(amount)
            .map_err(AppError::Validation)?;

        let paid_on = paid_on.unwrap_or_else(|| chrono::Utc::now().date_naive());

        // When settling an installment, the amounts must agree
        if let Some(ref target) = target {
            let plan = self.installments.get_plan(&target.plan_id).await?;
            let installment = plan
                .installments
                .iter()
                .find(|i| i.number == target.number)
                .ok_or_else(|| {
                    AppError::not_found(format!("Installment {} not found", target.number))
                })?;

            if installment.amount != amount {
                return Err(AppError::validation(format!(
                    "Payment amount ({}) does not match installment {} amount ({})",
                    amount, target.number, installment.amount
                )));
            }
        }

        let payment = Payment::new(member_id, amount, method, paid_on, note)?;
        self.repository.create(&payment).await?;

        let installment_plan = match target {
            Some(target) => Some(
                self.installments
                    .mark_installment_paid(
                        &target.plan_id,
                        target.number,
                        payment.id.clone(),
                        paid_on,
                    )
                    .await?,
            ),
            None => None,
        };

        info!(
            payment_id = payment.id.as_str(),
            member_id = payment.member_id.as_str(),
            amount = %payment.amount,
            method = %payment.method,
            settles_installment = installment_plan.is_some(),
            "Payment recorded"
        );

        Ok(PaymentOutcome {
            payment,
            installment_plan,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Payment> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))
    }

    pub async fn list_for_member(&self, member_id: &str) -> Result<Vec<Payment>> {
        self.repository.find_by_member(member_id).await
    }

    pub async fn total_for_member(&self, member_id: &str) -> Result<Decimal> {
        self.repository.total_for_member(member_id).await
    }
}

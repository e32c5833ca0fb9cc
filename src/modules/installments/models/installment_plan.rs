use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};

/// Minimum number of installments a plan may carry.
pub const MIN_INSTALLMENTS: u32 = 2;
/// Maximum number of installments accepted at the API boundary.
pub const MAX_INSTALLMENTS: u32 = 24;

/// A single entry in an installment schedule.
///
/// Freshly computed schedules are transient values; an installment only
/// gains durable identity once its plan is confirmed and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// Sequential number (1-based)
    pub number: u32,
    /// Amount due for this installment
    pub amount: Decimal,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Whether the installment has been settled
    pub paid: bool,
    /// Date the installment was settled
    pub paid_date: Option<NaiveDate>,
    /// Payment record that settled this installment
    pub payment_id: Option<String>,
}

impl Installment {
    /// Create an unpaid installment entry
    pub fn scheduled(number: u32, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            number,
            amount,
            due_date,
            paid: false,
            paid_date: None,
            payment_id: None,
        }
    }

    /// Mark this installment as settled by a payment
    pub fn mark_paid(&mut self, payment_id: String, paid_on: NaiveDate) -> Result<()> {
        if self.paid {
            return Err(AppError::validation(format!(
                "Installment {} is already paid",
                self.number
            )));
        }

        self.paid = true;
        self.paid_date = Some(paid_on);
        self.payment_id = Some(payment_id);

        Ok(())
    }

    /// Whether this installment is unpaid and past its due date
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        !self.paid && self.due_date < today
    }
}

/// Parameters for computing an installment schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Full amount to be collected across the schedule
    pub total_amount: Decimal,
    /// Number of installments, down payment included
    pub num_installments: u32,
    /// Anchor date for due-date generation
    pub start_date: NaiveDate,
    /// Optional down payment collected up front as installment #1
    pub down_payment: Option<Decimal>,
}

impl ScheduleRequest {
    /// Build a request, defaulting the start date to today when omitted
    pub fn new(
        total_amount: Decimal,
        num_installments: u32,
        start_date: Option<NaiveDate>,
        down_payment: Option<Decimal>,
    ) -> Self {
        Self {
            total_amount,
            num_installments,
            start_date: start_date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            down_payment,
        }
    }

    /// Validate the structural inputs against the configured currency
    pub fn validate(&self, currency: Currency) -> Result<()> {
        if self.total_amount <= Decimal::ZERO {
            return Err(AppError::validation("Total amount must be positive"));
        }

        currency
            .validate_amount(self.total_amount)
            .map_err(AppError::Validation)?;

        if self.num_installments < MIN_INSTALLMENTS || self.num_installments > MAX_INSTALLMENTS {
            return Err(AppError::validation(format!(
                "Installment count must be between {} and {}, got {}",
                MIN_INSTALLMENTS, MAX_INSTALLMENTS, self.num_installments
            )));
        }

        if let Some(dp) = self.down_payment {
            currency.validate_amount(dp).map_err(AppError::Validation)?;
        }

        Ok(())
    }

    /// Down payment, or `None` when down-payment mode does not apply.
    ///
    /// A down payment of zero, one that covers the whole total, or one that
    /// leaves no regular installment behind silently disables the mode and
    /// the equal-split algorithm runs instead.
    pub fn effective_down_payment(&self) -> Option<Decimal> {
        let dp = self.down_payment?;

        if dp <= Decimal::ZERO || dp >= self.total_amount || self.num_installments < 2 {
            return None;
        }

        Some(dp)
    }
}

/// A confirmed installment plan attached to a membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: String,
    pub membership_id: String,
    /// Plans can be switched off without discarding their schedule
    pub enabled: bool,
    pub total_amount: Decimal,
    pub num_installments: u32,
    pub down_payment: Option<Decimal>,
    pub installments: Vec<Installment>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InstallmentPlan {
    /// Create a plan from a schedule request and its computed installments
    pub fn new(
        membership_id: String,
        request: &ScheduleRequest,
        installments: Vec<Installment>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();

        Self {
            id: Uuid::new_v4().to_string(),
            membership_id,
            enabled: true,
            total_amount: request.total_amount,
            num_installments: request.num_installments,
            down_payment: request.effective_down_payment(),
            installments,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of unpaid installment amounts
    pub fn outstanding(&self) -> Decimal {
        self.installments
            .iter()
            .filter(|i| !i.paid)
            .map(|i| i.amount)
            .sum()
    }

    /// Number of settled installments
    pub fn paid_count(&self) -> usize {
        self.installments.iter().filter(|i| i.paid).count()
    }

    /// Mutable access to an installment by its 1-based number
    pub fn installment_mut(&mut self, number: u32) -> Result<&mut Installment> {
        self.installments
            .iter_mut()
            .find(|i| i.number == number)
            .ok_or_else(|| AppError::not_found(format!("Installment {} not found", number)))
    }
}

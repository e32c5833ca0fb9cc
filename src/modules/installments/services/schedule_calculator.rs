use chrono::Months;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{AppError, Currency, Result};
use crate::modules::installments::models::{Installment, ScheduleRequest};

/// Computes installment payment schedules.
///
/// Splits a total into equal monthly installments, flooring each base amount
/// to the currency scale and absorbing the remainder into the final
/// installment so the schedule sums exactly to the total. An optional down
/// payment becomes installment #1, due on the start date, with the remaining
/// installments splitting what is left.
pub struct ScheduleCalculator;

impl ScheduleCalculator {
    /// Compute the full schedule for a request.
    ///
    /// Deterministic and side-effect free: identical inputs always produce
    /// the identical schedule, and any change to a structural input
    /// regenerates the schedule from scratch. Due dates advance by calendar
    /// months from the start date, keeping the day-of-month (clamped at
    /// month end), never by a fixed 30-day step.
    pub fn compute(request: &ScheduleRequest, currency: Currency) -> Result<Vec<Installment>> {
        request.validate(currency)?;

        info!(
            total_amount = %request.total_amount,
            num_installments = request.num_installments,
            start_date = %request.start_date,
            "Computing installment schedule"
        );

        let schedule = match request.effective_down_payment() {
            Some(down_payment) => {
                // Down payment is installment #1, due immediately; the rest
                // split the remainder starting one month out.
                let mut schedule = vec![Installment::scheduled(
                    1,
                    down_payment,
                    request.start_date,
                )];

                let remaining = request.total_amount - down_payment;
                let remaining_count = request.num_installments - 1;

                schedule.extend(Self::equal_split(
                    remaining,
                    remaining_count,
                    currency,
                    request,
                    2,
                )?);

                schedule
            }
            None => Self::equal_split(
                request.total_amount,
                request.num_installments,
                currency,
                request,
                1,
            )?,
        };

        // The sum invariant must hold exactly, not within tolerance
        let computed_total: Decimal = schedule.iter().map(|i| i.amount).sum();
        if computed_total != request.total_amount {
            warn!(
                computed = %computed_total,
                expected = %request.total_amount,
                "Computed schedule does not sum to total"
            );
            return Err(AppError::validation(format!(
                "Installment amounts ({}) do not sum to total ({})",
                computed_total, request.total_amount
            )));
        }

        Ok(schedule)
    }

    /// Split `total` into `count` equal installments, flooring the base to
    /// the currency scale and giving the remainder to the last installment.
    ///
    /// `first_number` is the sequence number of the first produced
    /// installment; due dates start `first_number - 1` months after the
    /// request's start date, so a down payment shifts the cadence by one.
    fn equal_split(
        total: Decimal,
        count: u32,
        currency: Currency,
        request: &ScheduleRequest,
        first_number: u32,
    ) -> Result<Vec<Installment>> {
        if count == 0 {
            return Err(AppError::validation("Installment count cannot be zero"));
        }

        let base = currency.floor(total / Decimal::from(count));

        if base <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Total {} is too small to split into {} installments",
                total, count
            )));
        }

        let month_offset = first_number - 1;
        let mut schedule = Vec::with_capacity(count as usize);
        let mut distributed = Decimal::ZERO;

        for i in 0..count {
            let amount = if i == count - 1 {
                // Last installment absorbs the division remainder
                total - distributed
            } else {
                base
            };

            let due_date = request
                .start_date
                .checked_add_months(Months::new(month_offset + i))
                .ok_or_else(|| AppError::validation("Failed to calculate due date"))?;

            distributed += amount;
            schedule.push(Installment::scheduled(first_number + i, amount, due_date));
        }

        Ok(schedule)
    }

    /// Pre-save validation gate for confirmed or hand-edited schedules.
    ///
    /// Accepts the schedule only while the amounts stay within one whole
    /// currency unit of the plan total; freshly computed schedules always
    /// pass with zero drift.
    pub fn verify_balance(installments: &[Installment], total_amount: Decimal) -> Result<()> {
        let sum: Decimal = installments.iter().map(|i| i.amount).sum();
        let drift = (sum - total_amount).abs();

        if drift >= Decimal::ONE {
            return Err(AppError::validation(format!(
                "Installment amounts ({}) do not sum to plan total ({})",
                sum, total_amount
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(
        total: Decimal,
        count: u32,
        start: NaiveDate,
        down_payment: Option<Decimal>,
    ) -> ScheduleRequest {
        ScheduleRequest::new(total, count, Some(start), down_payment)
    }

    #[test]
    fn test_equal_split_with_remainder_on_last() {
        let req = request(dec!(1000), 3, date(2024, 1, 15), None);
        let schedule = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].amount, dec!(333));
        assert_eq!(schedule[1].amount, dec!(333));
        assert_eq!(schedule[2].amount, dec!(334));

        assert_eq!(schedule[0].due_date, date(2024, 1, 15));
        assert_eq!(schedule[1].due_date, date(2024, 2, 15));
        assert_eq!(schedule[2].due_date, date(2024, 3, 15));

        let total: Decimal = schedule.iter().map(|i| i.amount).sum();
        assert_eq!(total, dec!(1000));
    }

    #[test]
    fn test_down_payment_becomes_first_installment() {
        let req = request(dec!(1000), 3, date(2024, 1, 15), Some(dec!(400)));
        let schedule = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].number, 1);
        assert_eq!(schedule[0].amount, dec!(400));
        assert_eq!(schedule[0].due_date, date(2024, 1, 15));

        assert_eq!(schedule[1].number, 2);
        assert_eq!(schedule[1].amount, dec!(300));
        assert_eq!(schedule[1].due_date, date(2024, 2, 15));

        assert_eq!(schedule[2].number, 3);
        assert_eq!(schedule[2].amount, dec!(300));
        assert_eq!(schedule[2].due_date, date(2024, 3, 15));
    }

    #[test]
    fn test_invalid_down_payment_falls_back_to_equal_split() {
        // dp == total: down-payment mode silently disabled
        let req = request(dec!(1000), 3, date(2024, 1, 15), Some(dec!(1000)));
        let schedule = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].amount, dec!(333));
        assert_eq!(schedule[2].amount, dec!(334));

        let total: Decimal = schedule.iter().map(|i| i.amount).sum();
        assert_eq!(total, dec!(1000));
    }

    #[test]
    fn test_fractional_currency_floors_to_cents() {
        let req = request(dec!(100.00), 3, date(2026, 3, 1), None);
        let schedule = ScheduleCalculator::compute(&req, Currency::USD).unwrap();

        assert_eq!(schedule[0].amount, dec!(33.33));
        assert_eq!(schedule[1].amount, dec!(33.33));
        assert_eq!(schedule[2].amount, dec!(33.34));
    }

    #[test]
    fn test_month_end_clamping() {
        // Jan 31 + 1 month lands on Feb 29 in a leap year
        let req = request(dec!(300), 3, date(2024, 1, 31), None);
        let schedule = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        assert_eq!(schedule[0].due_date, date(2024, 1, 31));
        assert_eq!(schedule[1].due_date, date(2024, 2, 29));
        assert_eq!(schedule[2].due_date, date(2024, 3, 31));
    }

    #[test]
    fn test_all_installments_start_unpaid() {
        let req = request(dec!(1200), 4, date(2026, 1, 1), Some(dec!(300)));
        let schedule = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        for inst in &schedule {
            assert!(!inst.paid);
            assert!(inst.paid_date.is_none());
            assert!(inst.payment_id.is_none());
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let req = request(dec!(777), 5, date(2026, 6, 10), Some(dec!(77)));

        let first = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();
        let second = ScheduleCalculator::compute(&req, Currency::IDR).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_total_too_small_to_split() {
        let req = request(dec!(1), 3, date(2026, 1, 1), None);
        assert!(ScheduleCalculator::compute(&req, Currency::IDR).is_err());
    }

    #[test]
    fn test_verify_balance_tolerates_sub_unit_drift() {
        let installments = vec![
            Installment::scheduled(1, dec!(33.40), date(2026, 1, 1)),
            Installment::scheduled(2, dec!(33.30), date(2026, 2, 1)),
            Installment::scheduled(3, dec!(33.31), date(2026, 3, 1)),
        ];

        // Sums to 100.01 against a 100.00 total: drift under one unit
        assert!(ScheduleCalculator::verify_balance(&installments, dec!(100.00)).is_ok());
    }

    #[test]
    fn test_verify_balance_rejects_unit_drift() {
        let installments = vec![
            Installment::scheduled(1, dec!(34), date(2026, 1, 1)),
            Installment::scheduled(2, dec!(33), date(2026, 2, 1)),
            Installment::scheduled(3, dec!(34), date(2026, 3, 1)),
        ];

        let result = ScheduleCalculator::verify_balance(&installments, dec!(100));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("do not sum"));
    }
}

// Property-based tests for the installment schedule calculator:
// sum invariant, count invariant, monthly cadence, remainder placement,
// down-payment handling, and idempotence.

use chrono::{Months, NaiveDate};
use gymdesk::core::Currency;
use gymdesk::installments::models::ScheduleRequest;
use gymdesk::installments::services::ScheduleCalculator;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn start_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2031, 1u32..13, 1u32..29)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    /// Property: installment amounts always sum exactly to the total
    #[test]
    fn prop_sum_equals_total(
        total in 100u64..1_000_000u64,
        count in 2u32..=24u32,
        start in start_date(),
    ) {
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), None);
        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, Decimal::from(total), "Installments must sum exactly to total");
    }

    /// Property: the sum invariant holds for fractional currencies too
    #[test]
    fn prop_sum_equals_total_in_cents(
        total_cents in 10_000u64..100_000_000u64,
        count in 2u32..=24u32,
        start in start_date(),
    ) {
        let total = Decimal::new(total_cents as i64, 2);
        let request = ScheduleRequest::new(total, count, Some(start), None);
        let schedule = ScheduleCalculator::compute(&request, Currency::USD)
            .expect("Failed to compute schedule");

        let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, total);
    }

    /// Property: with a valid down payment, installment #1 carries it and
    /// the amounts still sum exactly to the total
    #[test]
    fn prop_sum_with_down_payment(
        total in 1_000u64..1_000_000u64,
        count in 2u32..=24u32,
        dp_permille in 1u64..500u64,
        start in start_date(),
    ) {
        let down_payment = Decimal::from(total * dp_permille / 1000).max(Decimal::ONE);
        let request = ScheduleRequest::new(
            Decimal::from(total),
            count,
            Some(start),
            Some(down_payment),
        );

        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        prop_assert_eq!(schedule[0].number, 1);
        prop_assert_eq!(schedule[0].amount, down_payment);
        prop_assert_eq!(schedule[0].due_date, start);

        let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, Decimal::from(total));
    }

    /// Property: output length always equals the requested count
    #[test]
    fn prop_count_invariant(
        total in 1_000u64..1_000_000u64,
        count in 2u32..=24u32,
        with_dp in any::<bool>(),
        start in start_date(),
    ) {
        let down_payment = with_dp.then(|| Decimal::from(total / 4).max(Decimal::ONE));
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), down_payment);

        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        prop_assert_eq!(schedule.len(), count as usize);

        // Numbers are 1-based and sequential
        for (i, inst) in schedule.iter().enumerate() {
            prop_assert_eq!(inst.number, (i + 1) as u32);
        }
    }

    /// Property: due dates advance by calendar months from the start date
    #[test]
    fn prop_monthly_cadence(
        total in 1_000u64..1_000_000u64,
        count in 2u32..=24u32,
        start in start_date(),
    ) {
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), None);
        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        for (i, inst) in schedule.iter().enumerate() {
            let expected = start.checked_add_months(Months::new(i as u32)).unwrap();
            prop_assert_eq!(inst.due_date, expected, "Installment {} cadence", i + 1);
        }
    }

    /// Property: the division remainder lands entirely on the last
    /// installment; every earlier installment carries the floored base
    #[test]
    fn prop_remainder_on_last(
        total in 100u64..1_000_000u64,
        count in 2u32..=24u32,
        start in start_date(),
    ) {
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), None);
        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        let base = (Decimal::from(total) / Decimal::from(count)).trunc();

        for inst in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(inst.amount, base);
        }

        let last = schedule.last().unwrap();
        prop_assert!(last.amount >= base, "Last installment absorbs the remainder");
        prop_assert!(last.amount < base + Decimal::from(count), "Remainder is bounded by count");
    }

    /// Property: identical inputs produce the identical schedule
    #[test]
    fn prop_idempotent(
        total in 1_000u64..1_000_000u64,
        count in 2u32..=24u32,
        with_dp in any::<bool>(),
        start in start_date(),
    ) {
        let down_payment = with_dp.then(|| Decimal::from(total / 3).max(Decimal::ONE));
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), down_payment);

        let first = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");
        let second = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        prop_assert_eq!(first, second);
    }

    /// Property: an out-of-range down payment never breaks the invariants,
    /// it just falls back to the equal split
    #[test]
    fn prop_invalid_down_payment_fallback(
        total in 100u64..100_000u64,
        count in 2u32..=24u32,
        excess in 0u64..10_000u64,
        start in start_date(),
    ) {
        let request = ScheduleRequest::new(
            Decimal::from(total),
            count,
            Some(start),
            Some(Decimal::from(total + excess)),
        );

        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        prop_assert_eq!(schedule.len(), count as usize);

        let sum: Decimal = schedule.iter().map(|i| i.amount).sum();
        prop_assert_eq!(sum, Decimal::from(total));

        // Equal split: no installment carries the bogus down payment
        let base = (Decimal::from(total) / Decimal::from(count)).trunc();
        prop_assert_eq!(schedule[0].amount, base);
    }

    /// Property: freshly computed schedules always pass the balance gate
    #[test]
    fn prop_computed_schedules_pass_gate(
        total in 1_000u64..1_000_000u64,
        count in 2u32..=24u32,
        start in start_date(),
    ) {
        let request = ScheduleRequest::new(Decimal::from(total), count, Some(start), None);
        let schedule = ScheduleCalculator::compute(&request, Currency::IDR)
            .expect("Failed to compute schedule");

        prop_assert!(
            ScheduleCalculator::verify_balance(&schedule, Decimal::from(total)).is_ok()
        );
    }
}

// Worked examples for the schedule calculator and edge cases for the
// pre-save balance gate and request validation.

use chrono::NaiveDate;
use gymdesk::core::Currency;
use gymdesk::installments::models::{
    Installment, ScheduleRequest, MAX_INSTALLMENTS, MIN_INSTALLMENTS,
};
use gymdesk::installments::services::ScheduleCalculator;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_thousand_over_three_example() {
    let request = ScheduleRequest::new(dec!(1000), 3, Some(date(2024, 1, 15)), None);
    let schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();

    let amounts: Vec<_> = schedule.iter().map(|i| i.amount).collect();
    assert_eq!(amounts, vec![dec!(333), dec!(333), dec!(334)]);

    let dates: Vec<_> = schedule.iter().map(|i| i.due_date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
    );
}

#[test]
fn test_down_payment_example() {
    let request = ScheduleRequest::new(dec!(1000), 3, Some(date(2024, 1, 15)), Some(dec!(400)));
    let schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();

    assert_eq!(schedule[0].amount, dec!(400));
    assert_eq!(schedule[0].due_date, date(2024, 1, 15));
    assert_eq!(schedule[1].amount, dec!(300));
    assert_eq!(schedule[1].due_date, date(2024, 2, 15));
    assert_eq!(schedule[2].amount, dec!(300));
    assert_eq!(schedule[2].due_date, date(2024, 3, 15));

    let sum: rust_decimal::Decimal = schedule.iter().map(|i| i.amount).sum();
    assert_eq!(sum, dec!(1000));
}

#[test]
fn test_full_down_payment_falls_back() {
    // dp == total: rejected, equal three-way split instead
    let request = ScheduleRequest::new(dec!(1000), 3, Some(date(2024, 1, 15)), Some(dec!(1000)));
    let schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();

    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule[0].amount, dec!(333));
    assert_eq!(schedule[1].amount, dec!(333));
    assert_eq!(schedule[2].amount, dec!(334));
}

#[test]
fn test_even_split_has_no_remainder() {
    let request = ScheduleRequest::new(dec!(1200), 4, Some(date(2026, 5, 1)), None);
    let schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();

    for inst in &schedule {
        assert_eq!(inst.amount, dec!(300));
    }
}

#[test]
fn test_installment_count_bounds() {
    let start = Some(date(2026, 1, 1));

    let at_min = ScheduleRequest::new(dec!(1000), MIN_INSTALLMENTS, start, None);
    assert!(ScheduleCalculator::compute(&at_min, Currency::IDR).is_ok());

    let at_max = ScheduleRequest::new(dec!(1000), MAX_INSTALLMENTS, start, None);
    assert!(ScheduleCalculator::compute(&at_max, Currency::IDR).is_ok());

    let below = ScheduleRequest::new(dec!(1000), MIN_INSTALLMENTS - 1, start, None);
    assert!(ScheduleCalculator::compute(&below, Currency::IDR).is_err());

    let above = ScheduleRequest::new(dec!(1000), MAX_INSTALLMENTS + 1, start, None);
    assert!(ScheduleCalculator::compute(&above, Currency::IDR).is_err());
}

#[test]
fn test_zero_total_rejected() {
    let request = ScheduleRequest::new(dec!(0), 3, Some(date(2026, 1, 1)), None);
    assert!(ScheduleCalculator::compute(&request, Currency::IDR).is_err());
}

#[test]
fn test_balance_gate_accepts_exact_sum() {
    let installments = vec![
        Installment::scheduled(1, dec!(400), date(2026, 1, 1)),
        Installment::scheduled(2, dec!(300), date(2026, 2, 1)),
        Installment::scheduled(3, dec!(300), date(2026, 3, 1)),
    ];

    assert!(ScheduleCalculator::verify_balance(&installments, dec!(1000)).is_ok());
}

#[test]
fn test_balance_gate_accepts_sub_unit_drift() {
    // Hand-edited schedule drifting by 0.99: still within one currency unit
    let installments = vec![
        Installment::scheduled(1, dec!(500.99), date(2026, 1, 1)),
        Installment::scheduled(2, dec!(500.00), date(2026, 2, 1)),
    ];

    assert!(ScheduleCalculator::verify_balance(&installments, dec!(1000.00)).is_ok());
}

#[test]
fn test_balance_gate_rejects_whole_unit_drift() {
    let installments = vec![
        Installment::scheduled(1, dec!(501), date(2026, 1, 1)),
        Installment::scheduled(2, dec!(500), date(2026, 2, 1)),
    ];

    let result = ScheduleCalculator::verify_balance(&installments, dec!(1000));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("do not sum"));
}

#[test]
fn test_balance_gate_rejects_undershoot_too() {
    let installments = vec![
        Installment::scheduled(1, dec!(400), date(2026, 1, 1)),
        Installment::scheduled(2, dec!(400), date(2026, 2, 1)),
    ];

    assert!(ScheduleCalculator::verify_balance(&installments, dec!(1000)).is_err());
}

#[test]
fn test_manual_override_leaves_siblings_untouched() {
    let request = ScheduleRequest::new(dec!(1000), 4, Some(date(2026, 1, 10)), None);
    let mut schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();
    let before = schedule.clone();

    // Shift money between two installments by hand; no recomputation runs
    schedule[1].amount = dec!(200);
    schedule[2].amount = dec!(300);

    assert_eq!(schedule[0], before[0]);
    assert_eq!(schedule[3], before[3]);
    assert_eq!(schedule[1].due_date, before[1].due_date);

    // The compensating edit keeps the gate satisfied
    assert!(ScheduleCalculator::verify_balance(&schedule, dec!(1000)).is_ok());
}

#[test]
fn test_december_start_rolls_into_next_year() {
    let request = ScheduleRequest::new(dec!(600), 3, Some(date(2025, 12, 20)), None);
    let schedule = ScheduleCalculator::compute(&request, Currency::IDR).unwrap();

    assert_eq!(schedule[0].due_date, date(2025, 12, 20));
    assert_eq!(schedule[1].due_date, date(2026, 1, 20));
    assert_eq!(schedule[2].due_date, date(2026, 2, 20));
}

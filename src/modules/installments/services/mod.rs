pub mod installment_service;
pub mod schedule_calculator;

pub use installment_service::{InstallmentOverride, InstallmentService};
pub use schedule_calculator::ScheduleCalculator;

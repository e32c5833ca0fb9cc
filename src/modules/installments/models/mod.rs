pub mod installment_plan;

pub use installment_plan::{
    Installment, InstallmentPlan, ScheduleRequest, MAX_INSTALLMENTS, MIN_INSTALLMENTS,
};

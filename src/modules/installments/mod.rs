pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Installment, InstallmentPlan, ScheduleRequest};
pub use repositories::InstallmentRepository;
pub use services::{InstallmentOverride, InstallmentService, ScheduleCalculator};

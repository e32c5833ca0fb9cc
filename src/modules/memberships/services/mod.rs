pub mod membership_service;
pub mod plan_service;

pub use membership_service::{InstallmentTerms, MembershipService, RenewalOutcome};
pub use plan_service::PlanService;

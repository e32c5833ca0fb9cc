pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Membership, MembershipPlan, MembershipStatus};
pub use repositories::{MembershipRepository, PlanRepository};
pub use services::{InstallmentTerms, MembershipService, PlanService, RenewalOutcome};

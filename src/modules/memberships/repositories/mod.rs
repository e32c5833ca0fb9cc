pub mod membership_repository;
pub mod plan_repository;

pub use membership_repository::MembershipRepository;
pub use plan_repository::PlanRepository;

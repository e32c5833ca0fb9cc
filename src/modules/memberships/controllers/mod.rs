pub mod membership_controller;
pub mod plan_controller;

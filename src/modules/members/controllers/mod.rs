pub mod member_controller;

pub use member_controller::configure;

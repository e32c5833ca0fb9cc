pub mod payment_service;

pub use payment_service::{InstallmentTarget, PaymentOutcome, PaymentService};

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Expense, ExpenseCategory};
pub use repositories::ExpenseRepository;
pub use services::ExpenseService;

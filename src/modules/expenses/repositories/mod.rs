pub mod expense_repository;

pub use expense_repository::{CategoryTotal, ExpenseRepository};

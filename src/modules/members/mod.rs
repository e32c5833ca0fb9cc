pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Member, MemberStatus};
pub use repositories::MemberRepository;
pub use services::MemberService;

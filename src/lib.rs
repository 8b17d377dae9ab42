pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LoanError;
pub use crate::core::services::LoanService;
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;
pub use crate::infrastructure::storage::sqlite::SqliteStorage;

#[cfg(test)]
mod tests;

pub mod handlers;
pub mod models;
pub mod openapi;

use crate::core::services::LoanService;
use crate::infrastructure::storage::sqlite::SqliteStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The service shared by all handlers. Requests take the lock for the whole
/// operation, so each one runs to completion before the next starts.
pub type SharedService = Arc<Mutex<LoanService<SqliteStorage>>>;

pub use handlers::api_routes;
pub use openapi::ApiDoc;

pub mod constants;
pub mod errors;
pub mod models;
pub mod recommendation;
pub mod services;

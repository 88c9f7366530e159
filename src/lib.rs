//! Assumption Validator
//!
//! Upload a business document (Word or PDF) and get back a report on the
//! explicit, hidden and high-risk assumptions behind its decisions, written
//! by a hosted chat-completion model.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::{create_router, AppState};

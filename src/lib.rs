//! Summarize text with an LLM, keep and edit the results, and email them out
//! with per-recipient delivery tracking.

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod tracing_init;

pub use app::App;
pub use config::Config;
pub use error::{AppError, ErrorKind, ErrorReport, Result};

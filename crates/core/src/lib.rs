//! Docent Core Library
//!
//! This crate provides the foundational utilities shared by every Docent crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

#[cfg(feature = "test-support")]
pub mod test_support;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

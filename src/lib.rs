// Core modules
pub mod config;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod models;
pub mod notify;
pub mod risk;
pub mod strategy;
pub mod venue;

// Re-export commonly used types
pub use error::{BotError, Result};
pub use models::*;
pub use strategy::Strategy;

/*!
 * Core Module
 * Fundamental scheduler types, limits, configuration, and error handling
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use config::{ConfigError, ScheduleConfig};
pub use errors::*;
pub use types::*;

/*!
 * Process Core Types
 * Fundamental types for tracked jobs
 */

pub mod types;

// Re-export everything for convenience
pub use types::*;

//! Utilities
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod json;
pub mod paths;

pub use error::*;
pub use json::*;
pub use paths::*;

//! Data Models
//!
//! Contains the configuration data structures used throughout the application.

pub mod language;
pub mod settings;

pub use language::*;
pub use settings::*;

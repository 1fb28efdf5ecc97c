//! Storage Layer
//!
//! Handles persistence of the JSON config. Sessions are never persisted.

pub mod config;

pub use config::*;

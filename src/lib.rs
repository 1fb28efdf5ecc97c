//! Interview Coach - Rust Library
//!
//! AI mock-interview engine. It includes:
//! - Interview services (intent, scoring, termination, summaries, evaluation)
//! - Configuration storage
//! - Data models and utilities

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::{AppConfig, InterviewSettings, Language, ProviderSettings, SettingsUpdate};
pub use services::connection::{test_connection, ConnectionTestResult};
pub use services::interview::{
    InterviewContext, InterviewOrchestrator, InterviewSession, TurnAction, TurnOutcome,
};
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};

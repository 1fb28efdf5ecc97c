//! Integration Tests Module
//!
//! End-to-end tests for the interview coach. A scripted completion provider
//! stands in for the network; no real completions are requested.

// Shared scripted provider
mod support;

// Full interview rounds through the orchestrator
mod interview_flow_test;

// Question bank extraction and drawing
mod question_bank_test;

// Config file round-trips
mod config_test;

//! Scenario Executor
//!
//! Runs planned scenarios and renders their report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ScenarioDef (static registry)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Run scenarios, record failures, time each one
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Scenario execution and report assembly
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;

pub use execution::{Executor, build_report};
pub use formatting::format_human_output;

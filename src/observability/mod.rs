//! Observability subsystem
//!
//! Structured JSON logging for schema registration, transaction boundaries
//! and object insertion.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//!
//! ```ignore
//! use aeroproxy::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("TX_COMMIT", &[("commit_id", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

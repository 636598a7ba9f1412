//! # VideoMeet Diagnostics
//!
//! Debugging and diagnostic tools for VideoMeet.
//! Provides logging initialisation and serialisable session reports.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod debug_logger;
pub mod session_report;

use thiserror::Error;

// Re-export main types
pub use debug_logger::DebugLogger;
pub use session_report::{SessionReport, StreamReport, TrackReport};

/// Errors raised by diagnostics helpers
#[derive(Error, Debug)]
pub enum DiagnosticsError {
    /// A global tracing subscriber could not be installed
    #[error("Logging initialization failed: {reason}")]
    LoggingInit {
        /// Reason reported by tracing-subscriber
        reason: String,
    },

    /// A report could not be serialized
    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

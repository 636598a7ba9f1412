//! Media capture error types and handling
//!
//! This module defines the error types raised at the platform boundary:
//! device enumeration, capture requests and track management.

use crate::tracks::TrackKind;
use thiserror::Error;

/// Main error type for media capture operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// Device enumeration failed
    #[error("Device enumeration failed: {reason}")]
    DeviceEnumerationFailed {
        /// Failure reason
        reason: String,
    },

    /// No device of the requested kind is attached
    #[error("No {kind} input device found")]
    DeviceNotFound {
        /// Kind of device that was requested
        kind: TrackKind,
    },

    /// Permission denied error
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// Operation that was denied
        operation: String,
    },

    /// The platform could not satisfy the requested constraints
    #[error("Constraints cannot be satisfied: {constraints}")]
    ConstraintUnsatisfiable {
        /// Constraints as requested
        constraints: String,
    },

    /// Neither audio nor video was requested
    #[error("No media kinds requested")]
    NoConstraints,

    /// Capture succeeded but delivered no track of the requested kind
    #[error("Capture stream has no {kind} track")]
    TrackMissing {
        /// Kind of the missing track
        kind: TrackKind,
    },

    /// Capture device failed while opening or streaming
    #[error("Capture failed: {reason}")]
    CaptureFailed {
        /// Failure reason
        reason: String,
    },

    /// FFI error from external libraries
    #[error("FFI error: {library} - {message}")]
    FfiError {
        /// Library name
        library: String,
        /// Error message
        message: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::DeviceEnumerationFailed { .. } => ErrorCategory::Device,
            MediaError::DeviceNotFound { .. } => ErrorCategory::Device,
            MediaError::PermissionDenied { .. } => ErrorCategory::Permission,
            MediaError::ConstraintUnsatisfiable { .. } => ErrorCategory::Constraints,
            MediaError::NoConstraints => ErrorCategory::Constraints,
            MediaError::TrackMissing { .. } => ErrorCategory::Device,
            MediaError::CaptureFailed { .. } => ErrorCategory::Device,
            MediaError::FfiError { .. } => ErrorCategory::System,
        }
    }

    /// Whether the failure happened while listing devices rather than capturing
    pub fn is_enumeration_failure(&self) -> bool {
        matches!(self, MediaError::DeviceEnumerationFailed { .. })
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Device and hardware errors
    Device,
    /// User or OS refused access
    Permission,
    /// Invalid or unsatisfiable constraints
    Constraints,
    /// System-level errors
    System,
}

/// Helper trait for converting platform-specific errors
pub trait IntoMediaError {
    /// Wrap `self` into a [`MediaError::FfiError`] with the given context
    fn into_media_error(self, library: &str, context: &str) -> MediaError;
}

impl<E: std::fmt::Display> IntoMediaError for E {
    fn into_media_error(self, library: &str, context: &str) -> MediaError {
        MediaError::FfiError {
            library: library.to_string(),
            message: format!("{}: {}", context, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let denied = MediaError::PermissionDenied {
            operation: "camera".to_string(),
        };
        assert_eq!(denied.category(), ErrorCategory::Permission);
        assert!(!denied.is_enumeration_failure());

        let enumeration = MediaError::DeviceEnumerationFailed {
            reason: "backend offline".to_string(),
        };
        assert_eq!(enumeration.category(), ErrorCategory::Device);
        assert!(enumeration.is_enumeration_failure());

        assert_eq!(
            MediaError::NoConstraints.category(),
            ErrorCategory::Constraints
        );
        assert_eq!(
            "no such symbol".into_media_error("nokhwa", "open").category(),
            ErrorCategory::System
        );
    }

    #[test]
    fn test_error_display() {
        let error = MediaError::DeviceNotFound {
            kind: TrackKind::Video,
        };
        assert_eq!(error.to_string(), "No video input device found");

        let error = MediaError::TrackMissing {
            kind: TrackKind::Audio,
        };
        assert_eq!(error.to_string(), "Capture stream has no audio track");
    }

    #[test]
    fn test_into_media_error() {
        let error = "device busy".into_media_error("cpal", "build input stream");
        match error {
            MediaError::FfiError { library, message } => {
                assert_eq!(library, "cpal");
                assert_eq!(message, "build input stream: device busy");
            }
            other => panic!("Expected FfiError, got {:?}", other),
        }
    }
}

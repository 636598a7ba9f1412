//! Error types for VideoMeet

use crate::messages::MessageKey;
use thiserror::Error;
use videomeet_media::MediaError;

/// Main error type for VideoMeet operations
#[derive(Error, Debug)]
pub enum VideoMeetError {
    /// Platform media error
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Video toggle attempted while no camera was found
    #[error("Camera unavailable")]
    CameraUnavailable,

    /// Identity fields are frozen once the room is joined
    #[error("Already joined room {room_id}")]
    AlreadyJoined {
        /// Room that was joined
        room_id: String,
    },

    /// No bundled catalog for the requested locale
    #[error("Unknown locale: {locale}")]
    UnknownLocale {
        /// Requested locale tag
        locale: String,
    },

    /// Message catalog could not be parsed
    #[error("Failed to load message catalog for {locale}: {source}")]
    CatalogLoad {
        /// Locale being loaded
        locale: String,
        /// Parse error
        source: serde_json::Error,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason the configuration was rejected
        reason: String,
    },
}

/// Result type alias for VideoMeet operations
pub type VideoMeetResult<T> = Result<T, VideoMeetError>;

impl VideoMeetError {
    /// User-facing message for this error, if it is surfaced to the user.
    ///
    /// Enumeration failures map to the device access error, every other
    /// capture failure (including empty constraints) to the generic access
    /// failure.
    pub fn message_key(&self) -> Option<MessageKey> {
        match self {
            VideoMeetError::Media(e) if e.is_enumeration_failure() => {
                Some(MessageKey::DeviceAccessError)
            }
            VideoMeetError::Media(_) => Some(MessageKey::CouldNotAccessDevices),
            VideoMeetError::CameraUnavailable => Some(MessageKey::CameraUnavailable),
            VideoMeetError::AlreadyJoined { .. }
            | VideoMeetError::UnknownLocale { .. }
            | VideoMeetError::CatalogLoad { .. }
            | VideoMeetError::InvalidConfiguration { .. } => None,
        }
    }
}

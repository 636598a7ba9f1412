//! Configuration types and defaults

use crate::error::{VideoMeetError, VideoMeetResult};
use crate::track::StoppedTrackPolicy;
use serde::{Deserialize, Serialize};

/// Length of generated room identifiers
pub const DEFAULT_ROOM_ID_LENGTH: usize = 9;

/// Global VideoMeet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Enable debug logging
    pub debug_logging: bool,
    /// Locale of the bundled message catalog
    pub locale: String,
    /// What happens to a track's slot in the local stream once it is stopped
    pub stopped_tracks: StoppedTrackPolicy,
    /// Length of generated room identifiers
    pub room_id_length: usize,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            debug_logging: false,
            locale: "uk".to_string(),
            stopped_tracks: StoppedTrackPolicy::Retain,
            room_id_length: DEFAULT_ROOM_ID_LENGTH,
            event_capacity: 64,
        }
    }
}

impl GlobalConfig {
    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> VideoMeetResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VideoMeetError::InvalidConfiguration {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> VideoMeetResult<()> {
        if self.room_id_length == 0 {
            return Err(VideoMeetError::InvalidConfiguration {
                reason: "room_id_length must be > 0".to_string(),
            });
        }
        if self.event_capacity == 0 {
            return Err(VideoMeetError::InvalidConfiguration {
                reason: "event_capacity must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Set the catalog locale
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    /// Set the stopped-track policy
    pub fn with_stopped_tracks(mut self, policy: StoppedTrackPolicy) -> Self {
        self.stopped_tracks = policy;
        self
    }

    /// Enable or disable debug logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.locale, "uk");
        assert_eq!(config.room_id_length, 9);
        assert_eq!(config.stopped_tracks, StoppedTrackPolicy::Retain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            GlobalConfig::from_json(r#"{"locale": "en", "stopped_tracks": "remove"}"#).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.stopped_tracks, StoppedTrackPolicy::Remove);
        assert_eq!(config.room_id_length, DEFAULT_ROOM_ID_LENGTH);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(GlobalConfig::from_json(r#"{"room_id_length": 0}"#).is_err());
        assert!(GlobalConfig::from_json(r#"{"locale": 5}"#).is_err());
    }
}

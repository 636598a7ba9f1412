//! Device descriptors and capture constraints

use crate::error::{MediaError, MediaResult};
use crate::tracks::TrackKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification reported for each enumerated device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Camera or other video source
    VideoInput,
    /// Microphone or other audio source
    AudioInput,
    /// Speakers or headphones
    AudioOutput,
}

impl DeviceKind {
    /// Track kind this device produces when captured, if it is an input
    pub fn track_kind(&self) -> Option<TrackKind> {
        match self {
            DeviceKind::VideoInput => Some(TrackKind::Video),
            DeviceKind::AudioInput => Some(TrackKind::Audio),
            DeviceKind::AudioOutput => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::VideoInput => write!(f, "videoinput"),
            DeviceKind::AudioInput => write!(f, "audioinput"),
            DeviceKind::AudioOutput => write!(f, "audiooutput"),
        }
    }
}

/// Device information as reported by enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Backend-specific device identifier
    pub device_id: String,
    /// Input or output kind of the device
    pub kind: DeviceKind,
    /// Human-readable name, may be empty before permission is granted
    pub label: String,
}

impl DeviceInfo {
    /// Create a device entry
    pub fn new(device_id: impl Into<String>, kind: DeviceKind, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
            label: label.into(),
        }
    }

    /// Whether this device is a camera
    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }
}

/// Kinds of media a capture request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// Request a video track
    pub video: bool,
    /// Request an audio track
    pub audio: bool,
}

impl MediaConstraints {
    /// Constraints requesting the given kinds
    pub const fn new(video: bool, audio: bool) -> Self {
        Self { video, audio }
    }

    /// `{video: true, audio: false}`
    pub const fn video_only() -> Self {
        Self::new(true, false)
    }

    /// `{video: false, audio: true}`
    pub const fn audio_only() -> Self {
        Self::new(false, true)
    }

    /// Constraints requesting exactly one kind
    pub const fn for_kind(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Video => Self::video_only(),
            TrackKind::Audio => Self::audio_only(),
        }
    }

    /// Whether neither kind is requested
    pub fn is_empty(&self) -> bool {
        !self.video && !self.audio
    }

    /// Requested kinds, video first
    pub fn kinds(&self) -> Vec<TrackKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.video {
            kinds.push(TrackKind::Video);
        }
        if self.audio {
            kinds.push(TrackKind::Audio);
        }
        kinds
    }

    /// Reject requests that ask for nothing
    pub fn validate(&self) -> MediaResult<()> {
        if self.is_empty() {
            return Err(MediaError::NoConstraints);
        }
        Ok(())
    }
}

impl fmt::Display for MediaConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{video: {}, audio: {}}}", self.video, self.audio)
    }
}

//! Session state snapshots for debugging

use crate::DiagnosticsError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use videomeet_media::{LocalStream, MediaTrack, TrackKind, TrackState};

/// Snapshot of a single track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackReport {
    /// Track ID
    pub id: String,
    /// Audio or video
    pub kind: TrackKind,
    /// Device label
    pub label: String,
    /// Ready state at snapshot time
    pub state: TrackState,
}

impl TrackReport {
    /// Capture the current state of `track`
    pub fn from_track(track: &dyn MediaTrack) -> Self {
        Self {
            id: track.id().to_string(),
            kind: track.kind(),
            label: track.label().to_string(),
            state: track.state(),
        }
    }
}

/// Snapshot of the local stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    /// Stream ID
    pub id: String,
    /// Tracks in stream order
    pub tracks: Vec<TrackReport>,
}

impl StreamReport {
    /// Capture the current state of `stream`
    pub fn from_stream(stream: &LocalStream) -> Self {
        Self {
            id: stream.id().to_string(),
            tracks: stream
                .tracks()
                .iter()
                .map(|track| TrackReport::from_track(track.as_ref()))
                .collect(),
        }
    }

    /// Number of live tracks of `kind`
    pub fn live_count(&self, kind: TrackKind) -> usize {
        self.tracks
            .iter()
            .filter(|track| track.kind == kind && track.state == TrackState::Live)
            .count()
    }
}

/// Media session state at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
    /// Whether a camera was found during probing
    pub has_camera: bool,
    /// Whether the video toggle is on
    pub video_on: bool,
    /// Whether the audio toggle is on
    pub audio_on: bool,
    /// Local stream, if one was created
    pub stream: Option<StreamReport>,
    /// Identifier of the last user-facing error
    pub last_error: Option<String>,
}

impl SessionReport {
    /// Start a report with no active media
    pub fn new(has_camera: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            has_camera,
            video_on: false,
            audio_on: false,
            stream: None,
            last_error: None,
        }
    }

    /// Set the toggle flags
    pub fn with_flags(mut self, video_on: bool, audio_on: bool) -> Self {
        self.video_on = video_on;
        self.audio_on = audio_on;
        self
    }

    /// Attach a stream snapshot
    pub fn with_stream(mut self, stream: Option<&LocalStream>) -> Self {
        self.stream = stream.map(StreamReport::from_stream);
        self
    }

    /// Record the last error identifier
    pub fn with_error(mut self, error: Option<&str>) -> Self {
        self.last_error = error.map(str::to_string);
        self
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DiagnosticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Track abstractions and the local stream they are attached to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Track kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Audio track
    Audio,
    /// Video track
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// Ready state of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// The source is delivering media
    Live,
    /// The track was stopped and its device released
    Ended,
}

/// A single audio or video source produced by a capture request.
///
/// Stopping is irreversible: a stopped track stays [`TrackState::Ended`] and
/// turning the source back on requires a fresh capture request.
pub trait MediaTrack: Send + Sync + fmt::Debug {
    /// Unique track identifier
    fn id(&self) -> &str;

    /// Whether this is an audio or video track
    fn kind(&self) -> TrackKind;

    /// Human readable label, usually the device name
    fn label(&self) -> &str;

    /// Current ready state
    fn state(&self) -> TrackState;

    /// Stop the track and release the underlying device. Calling it twice is a no-op.
    fn stop(&self);

    /// Shorthand for `state() == TrackState::Live`
    fn is_live(&self) -> bool {
        self.state() == TrackState::Live
    }
}

/// Shared handle to a platform track
pub type TrackHandle = Arc<dyn MediaTrack>;

/// Bundle of tracks returned by a single capture request
#[derive(Debug, Clone)]
pub struct CaptureStream {
    id: String,
    tracks: Vec<TrackHandle>,
}

impl CaptureStream {
    /// Create a capture stream from the tracks the platform delivered
    pub fn new(tracks: Vec<TrackHandle>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks,
        }
    }

    /// Stream identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All tracks in delivery order
    pub fn tracks(&self) -> &[TrackHandle] {
        &self.tracks
    }

    /// Video tracks in delivery order
    pub fn video_tracks(&self) -> Vec<TrackHandle> {
        self.tracks_of(TrackKind::Video)
    }

    /// Audio tracks in delivery order
    pub fn audio_tracks(&self) -> Vec<TrackHandle> {
        self.tracks_of(TrackKind::Audio)
    }

    fn tracks_of(&self, kind: TrackKind) -> Vec<TrackHandle> {
        self.tracks
            .iter()
            .filter(|track| track.kind() == kind)
            .cloned()
            .collect()
    }

    /// Remove and return the first track of `kind`
    pub fn take_track(&mut self, kind: TrackKind) -> Option<TrackHandle> {
        let index = self.tracks.iter().position(|track| track.kind() == kind)?;
        Some(self.tracks.remove(index))
    }

    /// Stop every track still held by this capture stream
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// The set of local tracks the preview renders.
///
/// Holds at most one track per [`TrackKind`]. Tracks are kept in insertion
/// order; adding a track of a kind that is already present replaces it in place.
#[derive(Debug, Clone)]
pub struct LocalStream {
    id: String,
    tracks: Vec<TrackHandle>,
}

impl LocalStream {
    /// Create a stream holding a single track
    pub fn new(track: TrackHandle) -> Self {
        let stream = Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks: vec![track],
        };
        debug!("Created local stream {}", stream.id);
        stream
    }

    /// Stream identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All tracks in insertion order, stopped ones included
    pub fn tracks(&self) -> &[TrackHandle] {
        &self.tracks
    }

    /// Number of tracks held
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the stream holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Video tracks (zero or one)
    pub fn video_tracks(&self) -> Vec<TrackHandle> {
        self.tracks_of(TrackKind::Video)
    }

    /// Audio tracks (zero or one)
    pub fn audio_tracks(&self) -> Vec<TrackHandle> {
        self.tracks_of(TrackKind::Audio)
    }

    fn tracks_of(&self, kind: TrackKind) -> Vec<TrackHandle> {
        self.tracks
            .iter()
            .filter(|track| track.kind() == kind)
            .cloned()
            .collect()
    }

    /// The track of `kind`, live or not
    pub fn track(&self, kind: TrackKind) -> Option<&TrackHandle> {
        self.tracks.iter().find(|track| track.kind() == kind)
    }

    /// The track of `kind` if it is still live
    pub fn live_track(&self, kind: TrackKind) -> Option<&TrackHandle> {
        self.track(kind).filter(|track| track.is_live())
    }

    /// Whether a live track of `kind` is attached
    pub fn has_live(&self, kind: TrackKind) -> bool {
        self.live_track(kind).is_some()
    }

    /// Attach a track.
    ///
    /// An existing track of the same kind is stopped and replaced in place and
    /// returned to the caller.
    pub fn add_track(&mut self, track: TrackHandle) -> Option<TrackHandle> {
        let kind = track.kind();
        match self.tracks.iter().position(|t| t.kind() == kind) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.tracks[index], track);
                previous.stop();
                debug!(
                    "Replaced {} track {} with {} in stream {}",
                    kind,
                    previous.id(),
                    self.tracks[index].id(),
                    self.id
                );
                Some(previous)
            }
            None => {
                debug!("Added {} track {} to stream {}", kind, track.id(), self.id);
                self.tracks.push(track);
                None
            }
        }
    }

    /// Detach the track of `kind` without stopping it
    pub fn remove_track(&mut self, kind: TrackKind) -> Option<TrackHandle> {
        let index = self.tracks.iter().position(|track| track.kind() == kind)?;
        Some(self.tracks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::mock::MockTrack;

    fn track(kind: TrackKind) -> Arc<MockTrack> {
        Arc::new(MockTrack::new(kind, "test device"))
    }

    #[test]
    fn test_track_kind_display() {
        assert_eq!(TrackKind::Audio.to_string(), "audio");
        assert_eq!(TrackKind::Video.to_string(), "video");
    }

    #[test]
    fn test_capture_stream_take_track() {
        let video = track(TrackKind::Video);
        let audio = track(TrackKind::Audio);
        let mut stream = CaptureStream::new(vec![video.clone() as TrackHandle, audio.clone()]);

        let taken = stream.take_track(TrackKind::Video).unwrap();
        assert_eq!(taken.id(), video.id());
        assert!(stream.video_tracks().is_empty());
        assert_eq!(stream.audio_tracks().len(), 1);
        assert!(stream.take_track(TrackKind::Video).is_none());
    }

    #[test]
    fn test_local_stream_keeps_insertion_order() {
        let video = track(TrackKind::Video);
        let audio = track(TrackKind::Audio);

        let mut stream = LocalStream::new(video.clone());
        assert!(stream.add_track(audio.clone()).is_none());

        let ids: Vec<_> = stream.tracks().iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec![video.id().to_string(), audio.id().to_string()]);
    }

    #[test]
    fn test_local_stream_replaces_same_kind() {
        let first = track(TrackKind::Video);
        let second = track(TrackKind::Video);

        let mut stream = LocalStream::new(first.clone());
        let replaced = stream.add_track(second.clone()).unwrap();

        assert_eq!(replaced.id(), first.id());
        assert_eq!(first.state(), TrackState::Ended);
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.video_tracks()[0].id(), second.id());
        assert!(stream.has_live(TrackKind::Video));
    }

    #[test]
    fn test_live_track_ignores_stopped() {
        let video = track(TrackKind::Video);
        let stream = LocalStream::new(video.clone());
        assert!(stream.has_live(TrackKind::Video));

        video.stop();
        assert!(stream.track(TrackKind::Video).is_some());
        assert!(stream.live_track(TrackKind::Video).is_none());
    }

    #[test]
    fn test_remove_track_does_not_stop() {
        let audio = track(TrackKind::Audio);
        let mut stream = LocalStream::new(audio.clone());

        let removed = stream.remove_track(TrackKind::Audio).unwrap();
        assert!(removed.is_live());
        assert!(stream.is_empty());
    }
}

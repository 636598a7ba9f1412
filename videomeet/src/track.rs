//! Per-kind toggle state for local tracks

use serde::{Deserialize, Serialize};
use videomeet_media::TrackKind;

/// Toggle state of one track kind.
///
/// `Requesting` is internal: the public on/off flag keeps reporting the
/// previous value until the capture request resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSlot {
    /// No capture active
    #[default]
    Off,
    /// Capture request in flight
    Requesting,
    /// A live track is attached to the local stream
    On,
}

impl TrackSlot {
    /// Publicly visible flag
    pub fn is_on(&self) -> bool {
        matches!(self, TrackSlot::On)
    }
}

/// Toggle state for both kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackSlots {
    /// Video toggle
    pub video: TrackSlot,
    /// Audio toggle
    pub audio: TrackSlot,
}

impl TrackSlots {
    /// Slot for `kind`
    pub fn get(&self, kind: TrackKind) -> TrackSlot {
        match kind {
            TrackKind::Video => self.video,
            TrackKind::Audio => self.audio,
        }
    }

    /// Update the slot for `kind`
    pub fn set(&mut self, kind: TrackKind, slot: TrackSlot) {
        match kind {
            TrackKind::Video => self.video = slot,
            TrackKind::Audio => self.audio = slot,
        }
    }
}

/// What happens to a stopped track's entry in the local stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoppedTrackPolicy {
    /// Keep the ended track enumerable until the next activation replaces it
    #[default]
    Retain,
    /// Detach the track from the stream when it is stopped
    Remove,
}

/// Result of a toggle call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new track was captured and attached
    Started {
        /// Kind of the started track
        kind: TrackKind,
        /// ID of the started track
        track_id: String,
    },
    /// The active track was stopped
    Stopped {
        /// Kind of the stopped track
        kind: TrackKind,
        /// ID of the stopped track, if one was attached
        track_id: Option<String>,
    },
    /// A request for this kind is already in flight; nothing changed
    InFlight {
        /// Kind with the pending request
        kind: TrackKind,
    },
}

impl ToggleOutcome {
    /// Kind this outcome refers to
    pub fn kind(&self) -> TrackKind {
        match self {
            ToggleOutcome::Started { kind, .. }
            | ToggleOutcome::Stopped { kind, .. }
            | ToggleOutcome::InFlight { kind } => *kind,
        }
    }

    /// Whether the toggle turned the kind on
    pub fn is_started(&self) -> bool {
        matches!(self, ToggleOutcome::Started { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_independent() {
        let mut slots = TrackSlots::default();
        slots.set(TrackKind::Video, TrackSlot::Requesting);
        slots.set(TrackKind::Audio, TrackSlot::On);

        assert_eq!(slots.get(TrackKind::Video), TrackSlot::Requesting);
        assert!(!slots.get(TrackKind::Video).is_on());
        assert!(slots.get(TrackKind::Audio).is_on());
    }

    #[test]
    fn test_outcome_kind() {
        let outcome = ToggleOutcome::Stopped {
            kind: TrackKind::Audio,
            track_id: None,
        };
        assert_eq!(outcome.kind(), TrackKind::Audio);
        assert!(!outcome.is_started());
    }
}

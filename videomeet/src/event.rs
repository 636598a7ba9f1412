//! Event system for session state changes

use crate::messages::MessageKey;
use crate::participant::SessionIdentity;
use futures::stream::{self, Stream};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use videomeet_media::TrackKind;

/// Session events a renderer can react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Device probing finished
    DevicesProbed {
        /// Whether a camera was found
        has_camera: bool,
        /// Number of devices reported
        device_count: usize,
    },
    /// A local track was captured and attached
    TrackStarted {
        /// Kind of the track
        kind: TrackKind,
        /// Track ID
        track_id: String,
    },
    /// A local track was stopped
    TrackStopped {
        /// Kind of the track
        kind: TrackKind,
        /// Track ID, if a track was attached
        track_id: Option<String>,
    },
    /// The error state changed
    Error {
        /// Message identifier now shown to the user
        key: MessageKey,
    },
    /// The user joined a room
    Joined {
        /// Identity the room was joined with
        identity: SessionIdentity,
    },
}

impl Event {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DevicesProbed { .. } => "devices_probed",
            Event::TrackStarted { .. } => "track_started",
            Event::TrackStopped { .. } => "track_stopped",
            Event::Error { .. } => "error",
            Event::Joined { .. } => "joined",
        }
    }

    /// Check if this is a track-related event
    pub fn is_track_event(&self) -> bool {
        matches!(self, Event::TrackStarted { .. } | Event::TrackStopped { .. })
    }

    /// Check if this is an error event
    pub fn is_error_event(&self) -> bool {
        matches!(self, Event::Error { .. })
    }

    /// Check if this is a lifecycle event (probing, joining)
    pub fn is_lifecycle_event(&self) -> bool {
        matches!(self, Event::DevicesProbed { .. } | Event::Joined { .. })
    }
}

/// Sending half shared by the session and the app
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub(crate) fn emit(&self, event: Event) {
        debug!("📡 Emitting event: {}", event.event_type());
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    pub(crate) fn subscribe(&self) -> EventStream {
        EventStream::new(self.tx.subscribe())
    }
}

/// Stream of session events for async iteration
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<Event>,
}

impl EventStream {
    /// Create a new event stream with a receiver
    pub fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Get the next event, skipping over any the stream lagged behind on
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to get the next event without waiting
    pub fn try_next(&mut self) -> Option<Event> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(_) => return None,
            }
        }
    }

    /// Drain every event currently buffered
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Convert into a [`futures::Stream`]
    pub fn into_stream(self) -> impl Stream<Item = Event> {
        stream::unfold(self, |mut events| async move {
            events.next().await.map(|event| (event, events))
        })
    }

    /// Only yield events accepted by `filter`
    pub fn filtered(self, filter: EventFilter) -> FilteredEventStream {
        FilteredEventStream {
            stream: self,
            filter,
        }
    }
}

/// Event filter for selective event processing
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Whether to include track events
    pub include_track_events: bool,
    /// Whether to include error events
    pub include_error_events: bool,
    /// Whether to include lifecycle events
    pub include_lifecycle_events: bool,
}

impl EventFilter {
    /// Create a filter that includes all events
    pub fn all() -> Self {
        Self {
            include_track_events: true,
            include_error_events: true,
            include_lifecycle_events: true,
        }
    }

    /// Create a filter that includes only track events
    pub fn track_only() -> Self {
        Self {
            include_track_events: true,
            include_error_events: false,
            include_lifecycle_events: false,
        }
    }

    /// Create a filter that includes only error events
    pub fn errors_only() -> Self {
        Self {
            include_track_events: false,
            include_error_events: true,
            include_lifecycle_events: false,
        }
    }

    /// Check if an event should be included based on this filter
    pub fn should_include(&self, event: &Event) -> bool {
        (self.include_track_events && event.is_track_event())
            || (self.include_error_events && event.is_error_event())
            || (self.include_lifecycle_events && event.is_lifecycle_event())
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Event stream that only yields events matching a filter
#[derive(Debug)]
pub struct FilteredEventStream {
    stream: EventStream,
    filter: EventFilter,
}

impl FilteredEventStream {
    /// Get the next event that matches the filter
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            let event = self.stream.next().await?;
            if self.filter.should_include(&event) {
                return Some(event);
            }
        }
    }

    /// Try to get the next matching event without waiting
    pub fn try_next(&mut self) -> Option<Event> {
        loop {
            let event = self.stream.try_next()?;
            if self.filter.should_include(&event) {
                return Some(event);
            }
        }
    }
}

//! Local media session state machine
//!
//! [`MediaSession`] owns the single local stream and the per-kind toggle
//! state. All state sits in one mutex-guarded cell that is never held across
//! an `.await`: a toggle marks its kind `Requesting` in a first critical
//! section, awaits the capture request, then attaches the track in a second
//! one. Whether the local stream already exists is decided at attachment time,
//! so concurrent first activations of video and audio end up in one stream.

use crate::error::{VideoMeetError, VideoMeetResult};
use crate::event::{Event, EventBus, EventStream};
use crate::messages::MessageKey;
use crate::prober::{Capability, DeviceProber};
use crate::track::{StoppedTrackPolicy, ToggleOutcome, TrackSlot, TrackSlots};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};
use videomeet_media::{
    LocalStream, MediaConstraints, MediaDevices, MediaError, MediaResult, TrackHandle, TrackKind,
};

/// Recorded probe result; the error side keeps the enumeration failure reason
type ProbeOutcome = Result<Capability, String>;

#[derive(Debug, Default)]
struct SessionState {
    capability: Capability,
    slots: TrackSlots,
    stream: Option<LocalStream>,
    error: Option<MessageKey>,
}

impl SessionState {
    /// Slot as the state machine sees it: `On` only while a live track backs it
    fn effective_slot(&self, kind: TrackKind) -> TrackSlot {
        match self.slots.get(kind) {
            TrackSlot::On if !self.has_live(kind) => TrackSlot::Off,
            slot => slot,
        }
    }

    fn has_live(&self, kind: TrackKind) -> bool {
        self.stream
            .as_ref()
            .map_or(false, |stream| stream.has_live(kind))
    }

    fn is_on(&self, kind: TrackKind) -> bool {
        self.effective_slot(kind).is_on()
    }
}

/// Read-only copy of the session state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Whether the probe found a camera
    pub has_camera: bool,
    /// Video toggle flag
    pub video_on: bool,
    /// Audio toggle flag
    pub audio_on: bool,
    /// Local stream, once created
    pub stream: Option<LocalStream>,
    /// Last user-facing error
    pub error: Option<MessageKey>,
}

/// Camera and microphone toggles over a single local stream
#[derive(Clone)]
pub struct MediaSession {
    devices: Arc<dyn MediaDevices>,
    state: Arc<Mutex<SessionState>>,
    probe: Arc<OnceCell<ProbeOutcome>>,
    events: EventBus,
    policy: StoppedTrackPolicy,
}

impl fmt::Debug for MediaSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSession")
            .field("state", &*self.state.lock())
            .field("probe", &self.probe.get())
            .field("policy", &self.policy)
            .finish()
    }
}

impl MediaSession {
    /// Create a session over a devices backend
    pub fn new(devices: Arc<dyn MediaDevices>, policy: StoppedTrackPolicy) -> Self {
        Self::with_bus(devices, policy, EventBus::new(64))
    }

    pub(crate) fn with_bus(
        devices: Arc<dyn MediaDevices>,
        policy: StoppedTrackPolicy,
        events: EventBus,
    ) -> Self {
        Self {
            devices,
            state: Arc::new(Mutex::new(SessionState::default())),
            probe: Arc::new(OnceCell::new()),
            events,
            policy,
        }
    }

    /// Subscribe to session events
    pub fn events(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Enumerate devices and record whether a camera exists.
    ///
    /// Enumerates at most once per session. Callers arriving while the
    /// enumeration runs wait for it; later callers get the recorded outcome,
    /// including a failure. On failure the capability stays at its default
    /// and the device access error is recorded.
    pub async fn probe_devices(&self) -> VideoMeetResult<Capability> {
        match self.probe.get_or_init(|| self.run_probe()).await {
            Ok(capability) => Ok(*capability),
            Err(reason) => Err(VideoMeetError::Media(MediaError::DeviceEnumerationFailed {
                reason: reason.clone(),
            })),
        }
    }

    async fn run_probe(&self) -> ProbeOutcome {
        let result = DeviceProber::new(self.devices.clone()).probe().await;

        let mut state = self.state.lock();
        match result {
            Ok(report) => {
                state.capability = report.capability;
                self.events.emit(Event::DevicesProbed {
                    has_camera: report.capability.has_camera,
                    device_count: report.devices.len(),
                });
                Ok(report.capability)
            }
            Err(e) => {
                error!(category = ?e.category(), "Device enumeration failed: {}", e);
                let reason = match &e {
                    MediaError::DeviceEnumerationFailed { reason } => reason.clone(),
                    other => other.to_string(),
                };
                self.fail(&mut state, e.into());
                Err(reason)
            }
        }
    }

    /// Turn the camera on or off.
    ///
    /// Fails with [`VideoMeetError::CameraUnavailable`] without issuing a
    /// capture request when the probe found no camera.
    pub async fn toggle_video(&self) -> VideoMeetResult<ToggleOutcome> {
        {
            let mut state = self.state.lock();
            if !state.capability.has_camera {
                warn!("Video toggle rejected: camera unavailable");
                return Err(self.fail(&mut state, VideoMeetError::CameraUnavailable));
            }
        }
        self.toggle(TrackKind::Video).await
    }

    /// Turn the microphone on or off
    pub async fn toggle_audio(&self) -> VideoMeetResult<ToggleOutcome> {
        self.toggle(TrackKind::Audio).await
    }

    async fn toggle(&self, kind: TrackKind) -> VideoMeetResult<ToggleOutcome> {
        let has_camera = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            match state.effective_slot(kind) {
                TrackSlot::Requesting => {
                    debug!("{} request already in flight", kind);
                    return Ok(ToggleOutcome::InFlight { kind });
                }
                TrackSlot::On => return Ok(self.stop_track(state, kind)),
                TrackSlot::Off => {
                    state.slots.set(kind, TrackSlot::Requesting);
                    state.error = None;
                    state.capability.has_camera
                }
            }
        };

        let constraints = MediaConstraints::new(
            kind == TrackKind::Video && has_camera,
            kind == TrackKind::Audio,
        );
        info!("🎬 Requesting {} capture with {}", kind, constraints);
        let acquired = self.acquire(kind, constraints).await;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        match acquired {
            Ok(track) => {
                let track_id = track.id().to_string();
                match state.stream {
                    Some(ref mut stream) => {
                        if let Some(previous) = stream.add_track(track) {
                            debug!("Replaced ended {} track {}", kind, previous.id());
                        }
                    }
                    None => state.stream = Some(LocalStream::new(track)),
                }
                state.slots.set(kind, TrackSlot::On);
                info!("✅ {} track {} started", kind, track_id);
                self.events.emit(Event::TrackStarted {
                    kind,
                    track_id: track_id.clone(),
                });
                Ok(ToggleOutcome::Started { kind, track_id })
            }
            Err(e) => {
                state.slots.set(kind, TrackSlot::Off);
                warn!(category = ?e.category(), "❌ {} capture failed: {}", kind, e);
                Err(self.fail(state, e.into()))
            }
        }
    }

    /// Request a capture stream and keep only the track of `kind`
    async fn acquire(
        &self,
        kind: TrackKind,
        constraints: MediaConstraints,
    ) -> MediaResult<TrackHandle> {
        constraints.validate()?;
        let mut captured = self.devices.get_user_media(constraints).await?;
        let track = captured.take_track(kind);
        captured.stop_all();
        track.ok_or(MediaError::TrackMissing { kind })
    }

    fn stop_track(&self, state: &mut SessionState, kind: TrackKind) -> ToggleOutcome {
        let track = match (state.stream.as_mut(), self.policy) {
            (Some(stream), StoppedTrackPolicy::Retain) => stream.track(kind).cloned(),
            (Some(stream), StoppedTrackPolicy::Remove) => stream.remove_track(kind),
            (None, _) => None,
        };
        if let Some(track) = &track {
            track.stop();
        }
        state.slots.set(kind, TrackSlot::Off);

        let track_id = track.map(|t| t.id().to_string());
        info!("🛑 {} turned off", kind);
        self.events.emit(Event::TrackStopped {
            kind,
            track_id: track_id.clone(),
        });
        ToggleOutcome::Stopped { kind, track_id }
    }

    /// Record `error` as the user-facing error and hand it back
    fn fail(&self, state: &mut SessionState, error: VideoMeetError) -> VideoMeetError {
        if let Some(key) = error.message_key() {
            state.error = Some(key);
            self.events.emit(Event::Error { key });
        }
        error
    }

    /// Whether the probe found a camera
    pub fn has_camera(&self) -> bool {
        self.state.lock().capability.has_camera
    }

    /// Whether a live video track is attached
    pub fn video_on(&self) -> bool {
        self.state.lock().is_on(TrackKind::Video)
    }

    /// Whether a live audio track is attached
    pub fn audio_on(&self) -> bool {
        self.state.lock().is_on(TrackKind::Audio)
    }

    /// Last user-facing error
    pub fn error(&self) -> Option<MessageKey> {
        self.state.lock().error
    }

    /// The local stream, once the first capture succeeded
    pub fn local_stream(&self) -> Option<LocalStream> {
        self.state.lock().stream.clone()
    }

    /// Consistent copy of the whole state
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            has_camera: state.capability.has_camera,
            video_on: state.is_on(TrackKind::Video),
            audio_on: state.is_on(TrackKind::Audio),
            stream: state.stream.clone(),
            error: state.error,
        }
    }

    /// Serializable snapshot for debugging
    #[cfg(feature = "diagnostics")]
    pub fn report(&self) -> videomeet_diagnostics::SessionReport {
        let state = self.state.lock();
        videomeet_diagnostics::SessionReport::new(state.capability.has_camera)
            .with_flags(state.is_on(TrackKind::Video), state.is_on(TrackKind::Audio))
            .with_stream(state.stream.as_ref())
            .with_error(state.error.map(|key| key.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use videomeet_media::{MediaTrack, MockMediaDevices};

    fn session() -> (Arc<MockMediaDevices>, MediaSession) {
        let devices = Arc::new(MockMediaDevices::with_default_devices());
        let session = MediaSession::new(devices.clone(), StoppedTrackPolicy::Retain);
        (devices, session)
    }

    #[tokio::test]
    async fn test_probe_runs_once() {
        let (devices, session) = session();
        assert!(session.probe_devices().await.unwrap().has_camera);
        assert!(session.probe_devices().await.unwrap().has_camera);
        assert_eq!(devices.enumerate_calls(), 1);
    }

    #[tokio::test]
    async fn test_video_before_probe_is_rejected() {
        let (devices, session) = session();
        let err = session.toggle_video().await.unwrap_err();
        assert!(matches!(err, VideoMeetError::CameraUnavailable));
        assert!(devices.capture_requests().is_empty());
    }

    #[tokio::test]
    async fn test_new_attempt_clears_error() {
        let (_devices, session) = session();
        let _ = session.toggle_video().await;
        assert_eq!(session.error(), Some(MessageKey::CameraUnavailable));

        session.toggle_audio().await.unwrap();
        assert_eq!(session.error(), None);
    }

    #[tokio::test]
    async fn test_ended_track_reads_as_off() {
        let (_devices, session) = session();
        session.probe_devices().await.unwrap();
        session.toggle_video().await.unwrap();

        let stream = session.local_stream().unwrap();
        stream.track(TrackKind::Video).unwrap().stop();
        assert!(!session.video_on());

        // The next toggle captures again instead of stopping a dead track.
        let outcome = session.toggle_video().await.unwrap();
        assert!(outcome.is_started());
        assert!(session.video_on());
        assert_eq!(session.local_stream().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_failure_leaves_state_off() {
        let (devices, session) = session();
        devices.set_devices(vec![]);
        let err = session.toggle_audio().await.unwrap_err();
        assert_eq!(err.message_key(), Some(MessageKey::CouldNotAccessDevices));
        assert!(!session.audio_on());
        assert!(session.local_stream().is_none());
    }

    #[cfg(feature = "diagnostics")]
    #[tokio::test]
    async fn test_report() {
        let (_devices, session) = session();
        session.probe_devices().await.unwrap();
        session.toggle_audio().await.unwrap();

        let report = session.report();
        assert!(report.has_camera);
        assert!(report.audio_on);
        assert!(!report.video_on);
        assert_eq!(report.stream.unwrap().tracks.len(), 1);
    }
}

//! Scriptable media devices backend
//!
//! Used by tests, demos and builds without the `native` feature. The device
//! list, enumeration failures, per-kind capture failures and per-kind delays
//! can all be changed at runtime through `&self`.

use super::MediaDevices;
use crate::devices::{DeviceInfo, DeviceKind, MediaConstraints};
use crate::error::{MediaError, MediaResult};
use crate::tracks::{CaptureStream, MediaTrack, TrackHandle, TrackKind, TrackState};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Track produced by [`MockMediaDevices`]
#[derive(Debug)]
pub struct MockTrack {
    id: String,
    kind: TrackKind,
    label: String,
    ended: AtomicBool,
}

impl MockTrack {
    /// Create a live mock track
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label: label.into(),
            ended: AtomicBool::new(false),
        }
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> TrackState {
        if self.ended.load(Ordering::SeqCst) {
            TrackState::Ended
        } else {
            TrackState::Live
        }
    }

    fn stop(&self) {
        if !self.ended.swap(true, Ordering::SeqCst) {
            debug!("Stopped mock {} track {}", self.kind, self.id);
        }
    }
}

/// How a capture request for one kind should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave as if the user refused access
    PermissionDenied,
    /// Behave as if the constraints could not be met
    Unsatisfiable,
    /// Generic device failure with a reason
    Device(String),
}

impl MockFailure {
    fn to_error(&self, kind: TrackKind, constraints: MediaConstraints) -> MediaError {
        match self {
            MockFailure::PermissionDenied => MediaError::PermissionDenied {
                operation: format!("{} capture", kind),
            },
            MockFailure::Unsatisfiable => MediaError::ConstraintUnsatisfiable {
                constraints: constraints.to_string(),
            },
            MockFailure::Device(reason) => MediaError::CaptureFailed {
                reason: reason.clone(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    devices: Vec<DeviceInfo>,
    enumeration_error: Option<String>,
    failures: HashMap<TrackKind, MockFailure>,
    delays: HashMap<TrackKind, Duration>,
    enumeration_delay: Option<Duration>,
    enumerate_calls: usize,
    requests: Vec<MediaConstraints>,
    issued: Vec<Arc<MockTrack>>,
}

/// In-memory [`MediaDevices`] implementation
#[derive(Debug, Default)]
pub struct MockMediaDevices {
    state: Mutex<MockState>,
}

impl MockMediaDevices {
    /// Backend with no devices at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with one camera, one microphone and one speaker
    pub fn with_default_devices() -> Self {
        Self::with_devices(vec![
            DeviceInfo::new("mock_camera_0", DeviceKind::VideoInput, "Mock Camera"),
            DeviceInfo::new("mock_microphone_0", DeviceKind::AudioInput, "Mock Microphone"),
            DeviceInfo::new("mock_speaker_0", DeviceKind::AudioOutput, "Mock Speaker"),
        ])
    }

    /// Backend reporting exactly `devices`
    pub fn with_devices(devices: Vec<DeviceInfo>) -> Self {
        let backend = Self::new();
        backend.state.lock().devices = devices;
        backend
    }

    /// Replace the reported device list
    pub fn set_devices(&self, devices: Vec<DeviceInfo>) {
        self.state.lock().devices = devices;
    }

    /// Make every following enumeration fail with `reason`
    pub fn fail_enumeration(&self, reason: impl Into<String>) {
        self.state.lock().enumeration_error = Some(reason.into());
    }

    /// Make capture requests that include `kind` fail
    pub fn fail_capture(&self, kind: TrackKind, failure: MockFailure) {
        self.state.lock().failures.insert(kind, failure);
    }

    /// Let capture requests for `kind` succeed again
    pub fn allow_capture(&self, kind: TrackKind) {
        self.state.lock().failures.remove(&kind);
    }

    /// Delay capture requests that include `kind`
    pub fn set_delay(&self, kind: TrackKind, delay: Duration) {
        self.state.lock().delays.insert(kind, delay);
    }

    /// Delay every following enumeration
    pub fn set_enumeration_delay(&self, delay: Duration) {
        self.state.lock().enumeration_delay = Some(delay);
    }

    /// Number of `enumerate_devices` calls seen
    pub fn enumerate_calls(&self) -> usize {
        self.state.lock().enumerate_calls
    }

    /// Constraints of every `get_user_media` call, in call order
    pub fn capture_requests(&self) -> Vec<MediaConstraints> {
        self.state.lock().requests.clone()
    }

    /// Every track handed out so far
    pub fn issued_tracks(&self) -> Vec<Arc<MockTrack>> {
        self.state.lock().issued.clone()
    }

    fn has_device_for(&self, kind: TrackKind) -> bool {
        self.state
            .lock()
            .devices
            .iter()
            .any(|device| device.kind.track_kind() == Some(kind))
    }
}

#[async_trait]
impl MediaDevices for MockMediaDevices {
    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>> {
        let delay = {
            let mut state = self.state.lock();
            state.enumerate_calls += 1;
            state.enumeration_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock();
        if let Some(reason) = &state.enumeration_error {
            return Err(MediaError::DeviceEnumerationFailed {
                reason: reason.clone(),
            });
        }
        Ok(state.devices.clone())
    }

    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<CaptureStream> {
        let delay = {
            let mut state = self.state.lock();
            state.requests.push(constraints);
            constraints
                .kinds()
                .iter()
                .filter_map(|kind| state.delays.get(kind).copied())
                .max()
        };
        constraints.validate()?;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        for kind in constraints.kinds() {
            if let Some(failure) = self.state.lock().failures.get(&kind).cloned() {
                return Err(failure.to_error(kind, constraints));
            }
            if !self.has_device_for(kind) {
                return Err(MediaError::DeviceNotFound { kind });
            }
        }

        let mut tracks: Vec<TrackHandle> = Vec::new();
        for kind in constraints.kinds() {
            let label = match kind {
                TrackKind::Video => "Mock Camera",
                TrackKind::Audio => "Mock Microphone",
            };
            let track = Arc::new(MockTrack::new(kind, label));
            self.state.lock().issued.push(track.clone());
            tracks.push(track);
        }

        debug!(
            "Mock capture for {} produced {} track(s)",
            constraints,
            tracks.len()
        );
        Ok(CaptureStream::new(tracks))
    }
}

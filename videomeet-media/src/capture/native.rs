//! Native capture backend
//!
//! Cameras are enumerated and opened through nokhwa, microphones and speakers
//! through cpal. Platform capture handles are not `Send`, so every captured
//! track owns a dedicated thread that opens the device, reports readiness and
//! then keeps the device streaming until the track is stopped.

use super::MediaDevices;
use crate::devices::{DeviceInfo, DeviceKind, MediaConstraints};
use crate::error::{IntoMediaError, MediaError, MediaResult};
use crate::tracks::{CaptureStream, MediaTrack, TrackHandle, TrackKind, TrackState};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Track backed by a capture thread
#[derive(Debug)]
pub struct NativeTrack {
    id: String,
    kind: TrackKind,
    label: String,
    ended: Arc<AtomicBool>,
    stop_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl MediaTrack for NativeTrack {
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
        self.ended.store(true, Ordering::SeqCst);
        if let Some(stop_tx) = self.stop_tx.lock().take() {
            // The capture thread may already be gone after a device error.
            let _ = stop_tx.send(());
            info!("🛑 Stopped {} track {} ({})", self.kind, self.id, self.label);
        }
    }
}

impl Drop for NativeTrack {
    fn drop(&mut self) {
        self.stop();
    }
}

/// [`MediaDevices`] implementation over the host's cameras and microphones
#[derive(Debug, Default)]
pub struct NativeMediaDevices;

type ReadySender = oneshot::Sender<MediaResult<String>>;

/// Marks a track ended when its capture thread exits, whatever the exit path
struct EndOnExit(Arc<AtomicBool>);

impl Drop for EndOnExit {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl NativeMediaDevices {
    /// Create a backend over the host's default camera and audio devices
    pub fn new() -> Self {
        Self
    }

    fn list_devices() -> MediaResult<Vec<DeviceInfo>> {
        let mut devices = Vec::new();

        let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| {
            MediaError::DeviceEnumerationFailed {
                reason: format!("camera query failed: {}", e),
            }
        })?;
        for camera in cameras {
            devices.push(DeviceInfo::new(
                camera.index().to_string(),
                DeviceKind::VideoInput,
                camera.human_name(),
            ));
        }

        let host = cpal::default_host();
        let inputs = host
            .input_devices()
            .map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: format!("audio input query failed: {}", e),
            })?;
        for (index, device) in inputs.enumerate() {
            let label = device
                .name()
                .unwrap_or_else(|_| format!("Microphone {}", index));
            devices.push(DeviceInfo::new(
                format!("audioinput:{}", index),
                DeviceKind::AudioInput,
                label,
            ));
        }

        let outputs = host
            .output_devices()
            .map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: format!("audio output query failed: {}", e),
            })?;
        for (index, device) in outputs.enumerate() {
            let label = device
                .name()
                .unwrap_or_else(|_| format!("Speaker {}", index));
            devices.push(DeviceInfo::new(
                format!("audiooutput:{}", index),
                DeviceKind::AudioOutput,
                label,
            ));
        }

        Ok(devices)
    }

    async fn open(kind: TrackKind) -> MediaResult<NativeTrack> {
        Self::open_with(kind, move |ready_tx, stop_rx, ended| match kind {
            TrackKind::Video => run_camera(ready_tx, stop_rx),
            TrackKind::Audio => run_microphone(ready_tx, stop_rx, ended),
        })
        .await
    }

    /// Open a track whose device is driven by `runner` on a dedicated thread.
    ///
    /// The runner reports the device label (or the open failure) on the ready
    /// channel, then streams until the stop channel fires. The track's ended
    /// flag is shared with the thread and set as soon as the thread exits, so
    /// a device lost mid-capture shows up as [`TrackState::Ended`].
    async fn open_with<F>(kind: TrackKind, runner: F) -> MediaResult<NativeTrack>
    where
        F: FnOnce(ReadySender, mpsc::Receiver<()>, Arc<AtomicBool>) + Send + 'static,
    {
        let (ready_tx, ready_rx) = oneshot::channel::<MediaResult<String>>();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let ended = Arc::new(AtomicBool::new(false));
        let thread_ended = ended.clone();

        std::thread::Builder::new()
            .name(format!("videomeet-{}-capture", kind))
            .spawn(move || {
                let _end_on_exit = EndOnExit(thread_ended.clone());
                runner(ready_tx, stop_rx, thread_ended);
            })
            .map_err(|e| e.into_media_error("std", "spawn capture thread"))?;

        let label = ready_rx.await.map_err(|_| MediaError::CaptureFailed {
            reason: format!("{} capture thread exited before opening the device", kind),
        })??;

        let track = NativeTrack {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label,
            ended,
            stop_tx: Mutex::new(Some(stop_tx)),
        };
        info!("🎬 Opened {} track {} ({})", kind, track.id, track.label);
        Ok(track)
    }
}

fn run_camera(ready_tx: ReadySender, stop_rx: mpsc::Receiver<()>) {
    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = match Camera::new(CameraIndex::Index(0), format) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready_tx.send(Err(MediaError::CaptureFailed {
                reason: format!("failed to open camera: {}", e),
            }));
            return;
        }
    };
    if let Err(e) = camera.open_stream() {
        let _ = ready_tx.send(Err(MediaError::CaptureFailed {
            reason: format!("failed to start camera stream: {}", e),
        }));
        return;
    }

    let label = camera.info().human_name();
    if ready_tx.send(Ok(label)).is_err() {
        let _ = camera.stop_stream();
        return;
    }

    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }
        if let Err(e) = camera.frame() {
            warn!("Camera stream failed: {}", e);
            break;
        }
    }

    if let Err(e) = camera.stop_stream() {
        warn!("Failed to stop camera stream: {}", e);
    }
    debug!("Camera capture thread finished");
}

fn run_microphone(ready_tx: ReadySender, stop_rx: mpsc::Receiver<()>, ended: Arc<AtomicBool>) {
    let host = cpal::default_host();
    let Some(device) = host.default_input_device() else {
        let _ = ready_tx.send(Err(MediaError::DeviceNotFound {
            kind: TrackKind::Audio,
        }));
        return;
    };
    let label = device
        .name()
        .unwrap_or_else(|_| "Default microphone".to_string());

    let supported = match device.default_input_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = ready_tx.send(Err(MediaError::ConstraintUnsatisfiable {
                constraints: format!("default input config: {}", e),
            }));
            return;
        }
    };

    let stream_ended = ended.clone();
    let stream = match device.build_input_stream_raw(
        &supported.config(),
        supported.sample_format(),
        |_data: &cpal::Data, _: &cpal::InputCallbackInfo| {},
        move |err| {
            warn!("Microphone stream error: {}", err);
            stream_ended.store(true, Ordering::SeqCst);
        },
        None,
    ) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e.into_media_error("cpal", "build input stream")));
            return;
        }
    };
    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(e.into_media_error("cpal", "start input stream")));
        return;
    }

    if ready_tx.send(Ok(label)).is_err() {
        return;
    }

    // Blocks until the track is stopped or dropped.
    let _ = stop_rx.recv();
    drop(stream);
    debug!("Microphone capture thread finished");
}

#[async_trait]
impl MediaDevices for NativeMediaDevices {
    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>> {
        let devices = tokio::task::spawn_blocking(Self::list_devices)
            .await
            .map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: e.to_string(),
            })??;
        debug!("Enumerated {} native devices", devices.len());
        Ok(devices)
    }

    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<CaptureStream> {
        constraints.validate()?;

        let mut tracks: Vec<TrackHandle> = Vec::new();
        for kind in constraints.kinds() {
            match Self::open(kind).await {
                Ok(track) => tracks.push(Arc::new(track)),
                Err(e) => {
                    for track in &tracks {
                        track.stop();
                    }
                    return Err(e);
                }
            }
        }
        Ok(CaptureStream::new(tracks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_end(track: &NativeTrack) -> bool {
        for _ in 0..100 {
            if track.state() == TrackState::Ended {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_track_ends_when_capture_thread_exits() {
        let track = NativeMediaDevices::open_with(TrackKind::Video, |ready_tx, _stop_rx, _ended| {
            let _ = ready_tx.send(Ok("Fake Camera".to_string()));
        })
        .await
        .unwrap();

        assert_eq!(track.label(), "Fake Camera");
        assert_eq!(track.kind(), TrackKind::Video);
        assert!(wait_for_end(&track).await);
    }

    #[tokio::test]
    async fn test_track_ends_on_stream_error() {
        let (error_tx, error_rx) = mpsc::channel::<()>();
        let track = NativeMediaDevices::open_with(TrackKind::Audio, move |ready_tx, stop_rx, ended| {
            let _ = ready_tx.send(Ok("Fake Microphone".to_string()));
            let _ = error_rx.recv();
            ended.store(true, Ordering::SeqCst);
            let _ = stop_rx.recv();
        })
        .await
        .unwrap();
        assert_eq!(track.state(), TrackState::Live);

        error_tx.send(()).unwrap();
        assert!(wait_for_end(&track).await);
        track.stop();
    }

    #[tokio::test]
    async fn test_track_stays_live_until_stopped() {
        let track = NativeMediaDevices::open_with(TrackKind::Audio, |ready_tx, stop_rx, _ended| {
            let _ = ready_tx.send(Ok("Fake Microphone".to_string()));
            let _ = stop_rx.recv();
        })
        .await
        .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(track.state(), TrackState::Live);

        track.stop();
        assert_eq!(track.state(), TrackState::Ended);
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let result = NativeMediaDevices::open_with(TrackKind::Video, |ready_tx, _stop_rx, _ended| {
            let _ = ready_tx.send(Err(MediaError::CaptureFailed {
                reason: "failed to open camera: busy".to_string(),
            }));
        })
        .await;

        assert!(matches!(
            result,
            Err(MediaError::CaptureFailed { ref reason }) if reason.contains("busy")
        ));
    }

    #[tokio::test]
    async fn test_thread_exit_before_ready_fails_open() {
        let result =
            NativeMediaDevices::open_with(TrackKind::Video, |_ready_tx, _stop_rx, _ended| {}).await;

        assert!(matches!(
            result,
            Err(MediaError::CaptureFailed { ref reason }) if reason.contains("exited before opening")
        ));
    }
}

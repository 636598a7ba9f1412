//! # VideoMeet Media
//!
//! Platform boundary for VideoMeet. This crate describes input devices and
//! capture constraints, defines the tracks and the local stream the preview
//! renders, and provides the [`MediaDevices`] backends: a scriptable mock and,
//! with the `native` feature, cameras through nokhwa and microphones through cpal.

#![warn(clippy::all)]

pub mod capture;
pub mod devices;
pub mod error;
pub mod tracks;

// Re-export main types
pub use capture::mock::{MockFailure, MockMediaDevices, MockTrack};
#[cfg(feature = "native")]
pub use capture::native::{NativeMediaDevices, NativeTrack};
pub use capture::{get_platform_devices, MediaDevices};
pub use devices::{DeviceInfo, DeviceKind, MediaConstraints};
pub use error::{ErrorCategory, IntoMediaError, MediaError, MediaResult};
pub use tracks::{CaptureStream, LocalStream, MediaTrack, TrackHandle, TrackKind, TrackState};

//! # VideoMeet - Local Media Session Shell
//!
//! VideoMeet collects a display name and room label, probes for a camera and
//! toggles local camera and microphone capture over a single local stream.
//! There is no transport: the room id is a display label only.
//!
//! ## Key Features
//!
//! - **Device probing**: one-shot enumeration recording whether a camera exists
//! - **Media session**: independent video/audio toggles with a single error slot
//! - **Lobby and in-call views**: a renderer-agnostic view model with localized labels
//! - **Pluggable backends**: native capture behind the `native` feature, a scriptable mock otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use videomeet::VideoMeet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let videomeet = VideoMeet::init()?;
//!
//!     // Probe devices and show the lobby
//!     let mut app = videomeet.launch().await?;
//!     app.set_name("Alice")?;
//!     app.join_room()?;
//!
//!     // Turn the microphone on
//!     app.toggle_audio().await?;
//!
//!     let mut events = app.events();
//!     while let Some(event) = events.try_next() {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export media types for easy access
pub use videomeet_media::{
    get_platform_devices, CaptureStream, DeviceInfo, DeviceKind, LocalStream, MediaConstraints,
    MediaDevices, MediaError, MediaTrack, MockFailure, MockMediaDevices, MockTrack, TrackHandle,
    TrackKind, TrackState,
};

#[cfg(feature = "native")]
pub use videomeet_media::{NativeMediaDevices, NativeTrack};

#[cfg(feature = "diagnostics")]
pub use videomeet_diagnostics::{DebugLogger, SessionReport, StreamReport, TrackReport};

// Public API modules
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod messages;
pub mod participant;
pub mod prober;
pub mod room;
pub mod session;
pub mod track;
pub mod view;

// Re-export main API types
pub use app::VideoMeetApp;
pub use config::GlobalConfig;
pub use error::{VideoMeetError, VideoMeetResult};
pub use event::{Event, EventFilter, EventStream, FilteredEventStream};
pub use messages::{MessageCatalog, MessageKey};
pub use participant::SessionIdentity;
pub use prober::{Capability, DeviceProber, ProbeReport};
pub use room::{generate_room_id, Lobby};
pub use session::{MediaSession, SessionSnapshot};
pub use track::{StoppedTrackPolicy, ToggleOutcome, TrackSlot};
pub use view::{InCallView, LobbyView, PreviewView, TextRenderer, View, ViewRenderer};

use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Main entry point for VideoMeet
#[derive(Clone)]
pub struct VideoMeet {
    inner: Arc<VideoMeetInner>,
}

struct VideoMeetInner {
    config: GlobalConfig,
    devices: Arc<dyn MediaDevices>,
}

impl fmt::Debug for VideoMeet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoMeet")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl VideoMeet {
    /// Initialize VideoMeet with default settings and the platform backend
    ///
    /// # Example
    /// ```rust,no_run
    /// use videomeet::VideoMeet;
    ///
    /// let videomeet = VideoMeet::init()?;
    /// # Ok::<(), videomeet::VideoMeetError>(())
    /// ```
    pub fn init() -> VideoMeetResult<Self> {
        Self::init_with(GlobalConfig::default())
    }

    /// Initialize with custom global configuration and the platform backend
    pub fn init_with(config: GlobalConfig) -> VideoMeetResult<Self> {
        Self::with_devices(config, get_platform_devices())
    }

    /// Initialize over an explicit devices backend
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use videomeet::{GlobalConfig, MockMediaDevices, VideoMeet};
    ///
    /// let devices = Arc::new(MockMediaDevices::with_default_devices());
    /// let videomeet = VideoMeet::with_devices(GlobalConfig::default(), devices)?;
    /// assert_eq!(videomeet.config().locale, "uk");
    /// # Ok::<(), videomeet::VideoMeetError>(())
    /// ```
    pub fn with_devices(
        config: GlobalConfig,
        devices: Arc<dyn MediaDevices>,
    ) -> VideoMeetResult<Self> {
        config.validate()?;

        #[cfg(feature = "diagnostics")]
        {
            if config.debug_logging {
                if let Err(e) = DebugLogger::init_logging(true) {
                    tracing::debug!("Keeping existing logger: {}", e);
                }
            }
        }

        Ok(Self {
            inner: Arc::new(VideoMeetInner { config, devices }),
        })
    }

    /// Global configuration
    pub fn config(&self) -> &GlobalConfig {
        &self.inner.config
    }

    /// Create an app without probing devices yet
    pub fn app(&self) -> VideoMeetResult<VideoMeetApp> {
        VideoMeetApp::new(self.inner.config.clone(), self.inner.devices.clone())
    }

    /// Create an app and probe devices.
    ///
    /// A failed probe is not fatal: the app starts without a camera and shows
    /// the device access error in the lobby.
    pub async fn launch(&self) -> VideoMeetResult<VideoMeetApp> {
        let app = self.app()?;
        if let Err(e) = app.start().await {
            warn!("Starting without device information: {}", e);
        }
        Ok(app)
    }
}

pub mod mock;
#[cfg(feature = "native")]
pub mod native;

use crate::devices::{DeviceInfo, MediaConstraints};
use crate::error::MediaResult;
use crate::tracks::CaptureStream;
use async_trait::async_trait;
use std::sync::Arc;

/// Host media-device boundary.
///
/// Mirrors the two platform calls the session needs: listing input devices
/// and requesting a capture stream for a set of constraints.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// List the devices currently attached to the host
    async fn enumerate_devices(&self) -> MediaResult<Vec<DeviceInfo>>;

    /// Open the devices matching `constraints` and return their tracks
    async fn get_user_media(&self, constraints: MediaConstraints) -> MediaResult<CaptureStream>;
}

/// Get the appropriate platform devices backend
pub fn get_platform_devices() -> Arc<dyn MediaDevices> {
    #[cfg(feature = "native")]
    {
        Arc::new(native::NativeMediaDevices::new())
    }
    #[cfg(not(feature = "native"))]
    {
        tracing::warn!("Native capture disabled, using mock media devices");
        Arc::new(mock::MockMediaDevices::with_default_devices())
    }
}

//! One-shot input device probe

use std::sync::Arc;
use tracing::{debug, info};
use videomeet_media::{DeviceInfo, MediaDevices, MediaResult};

/// Hardware availability recorded by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability {
    /// At least one video input was reported
    pub has_camera: bool,
}

impl Capability {
    /// Derive capability from an enumerated device list
    pub fn from_devices(devices: &[DeviceInfo]) -> Self {
        Self {
            has_camera: devices.iter().any(DeviceInfo::is_video_input),
        }
    }
}

/// Result of a successful probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Derived capability
    pub capability: Capability,
    /// Devices as enumerated
    pub devices: Vec<DeviceInfo>,
}

/// Enumerates host devices once and derives [`Capability`]
pub struct DeviceProber {
    devices: Arc<dyn MediaDevices>,
}

impl DeviceProber {
    /// Create a prober over a devices backend
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self { devices }
    }

    /// Enumerate devices and derive capability; no retries
    pub async fn probe(&self) -> MediaResult<ProbeReport> {
        let devices = self.devices.enumerate_devices().await?;
        for device in &devices {
            debug!("Found {} device {} ({})", device.kind, device.label, device.device_id);
        }

        let capability = Capability::from_devices(&devices);
        info!(
            "🔍 Probed {} devices, camera {}",
            devices.len(),
            if capability.has_camera { "available" } else { "unavailable" }
        );
        Ok(ProbeReport {
            capability,
            devices,
        })
    }
}

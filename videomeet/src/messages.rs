//! User-facing message identifiers and the locale catalogs that resolve them

use crate::error::{VideoMeetError, VideoMeetResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const UK_CATALOG: &str = include_str!("../locales/uk.json");
const EN_CATALOG: &str = include_str!("../locales/en.json");

/// Identifier of a piece of user-facing text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    /// Application name shown on both screens
    AppTitle,
    /// Tagline under the lobby title
    AppSubtitle,
    /// Placeholder of the name input
    NamePlaceholder,
    /// Placeholder of the room id input
    RoomPlaceholder,
    /// Join button label when a room id was entered
    JoinRoom,
    /// Join button label when the room id is blank
    CreateRoom,
    /// Video toggle attempted without a camera
    CameraUnavailable,
    /// Device enumeration failed
    DeviceAccessError,
    /// A capture request failed
    CouldNotAccessDevices,
    /// Marker appended to the local participant's name
    SelfMarker,
    /// Prefix of the room id line
    RoomLabel,
    /// Video toggle label while video is off
    TurnVideoOn,
    /// Video toggle label while video is on
    TurnVideoOff,
    /// Microphone toggle label while audio is off
    TurnMicrophoneOn,
    /// Microphone toggle label while audio is on
    TurnMicrophoneOff,
}

impl MessageKey {
    /// Every key, in declaration order
    pub const ALL: [MessageKey; 15] = [
        MessageKey::AppTitle,
        MessageKey::AppSubtitle,
        MessageKey::NamePlaceholder,
        MessageKey::RoomPlaceholder,
        MessageKey::JoinRoom,
        MessageKey::CreateRoom,
        MessageKey::CameraUnavailable,
        MessageKey::DeviceAccessError,
        MessageKey::CouldNotAccessDevices,
        MessageKey::SelfMarker,
        MessageKey::RoomLabel,
        MessageKey::TurnVideoOn,
        MessageKey::TurnVideoOff,
        MessageKey::TurnMicrophoneOn,
        MessageKey::TurnMicrophoneOff,
    ];

    /// Stable identifier used as the catalog key
    pub fn id(&self) -> &'static str {
        match self {
            MessageKey::AppTitle => "app_title",
            MessageKey::AppSubtitle => "app_subtitle",
            MessageKey::NamePlaceholder => "name_placeholder",
            MessageKey::RoomPlaceholder => "room_placeholder",
            MessageKey::JoinRoom => "join_room",
            MessageKey::CreateRoom => "create_room",
            MessageKey::CameraUnavailable => "camera_unavailable",
            MessageKey::DeviceAccessError => "device_access_error",
            MessageKey::CouldNotAccessDevices => "could_not_access_devices",
            MessageKey::SelfMarker => "self_marker",
            MessageKey::RoomLabel => "room_label",
            MessageKey::TurnVideoOn => "turn_video_on",
            MessageKey::TurnVideoOff => "turn_video_off",
            MessageKey::TurnMicrophoneOn => "turn_microphone_on",
            MessageKey::TurnMicrophoneOff => "turn_microphone_off",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Text for every [`MessageKey`] in one locale.
///
/// Keys missing from a catalog resolve to their identifier, so a partial
/// translation still renders.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    /// Locales compiled into the crate
    pub const BUNDLED_LOCALES: [&'static str; 2] = ["uk", "en"];

    /// Load one of the bundled locales
    pub fn bundled(locale: &str) -> VideoMeetResult<Self> {
        let source = match locale {
            "uk" => UK_CATALOG,
            "en" => EN_CATALOG,
            other => {
                return Err(VideoMeetError::UnknownLocale {
                    locale: other.to_string(),
                })
            }
        };
        Self::from_json(locale, source)
    }

    /// Parse a catalog from a flat JSON object of `id -> text`
    pub fn from_json(locale: &str, json: &str) -> VideoMeetResult<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(|source| VideoMeetError::CatalogLoad {
                locale: locale.to_string(),
                source,
            })?;
        Ok(Self {
            locale: locale.to_string(),
            entries,
        })
    }

    /// Locale tag this catalog was loaded for
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve `key`, falling back to its identifier
    pub fn text(&self, key: MessageKey) -> &str {
        self.entries
            .get(key.id())
            .map(String::as_str)
            .unwrap_or_else(|| key.id())
    }

    /// Keys this catalog has no text for
    pub fn missing_keys(&self) -> Vec<MessageKey> {
        MessageKey::ALL
            .iter()
            .copied()
            .filter(|key| !self.entries.contains_key(key.id()))
            .collect()
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            locale: String::new(),
            entries: HashMap::new(),
        }
    }
}

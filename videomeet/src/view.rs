//! View model for the two screens
//!
//! [`View`] is computed from application state with every label already
//! resolved through the [`MessageCatalog`]. Rendering is left to a
//! [`ViewRenderer`]; [`TextRenderer`] draws a plain-text card for logs and
//! tests.

use crate::messages::{MessageCatalog, MessageKey};
use crate::participant::SessionIdentity;
use crate::room::Lobby;
use crate::session::SessionSnapshot;
use serde::Serialize;
use std::fmt::Write;
use videomeet_media::TrackKind;

/// Screen to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum View {
    /// Not yet joined
    Lobby(LobbyView),
    /// Joined
    InCall(InCallView),
}

impl View {
    /// Whether this is the in-call screen
    pub fn is_in_call(&self) -> bool {
        matches!(self, View::InCall(_))
    }
}

/// Lobby screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyView {
    /// Application title
    pub title: String,
    /// Tagline
    pub subtitle: String,
    /// Name input value
    pub name: String,
    /// Name input placeholder
    pub name_placeholder: String,
    /// Room id input value
    pub room_id: String,
    /// Room id input placeholder
    pub room_placeholder: String,
    /// Join button label
    pub join_label: String,
    /// Whether the join button is enabled
    pub join_enabled: bool,
    /// Current error text
    pub error: Option<String>,
    /// Notice shown when no camera was found
    pub camera_notice: Option<String>,
}

impl LobbyView {
    /// Build the lobby screen
    pub fn new(
        lobby: &Lobby,
        has_camera: bool,
        error: Option<MessageKey>,
        catalog: &MessageCatalog,
    ) -> Self {
        let join_key = if lobby.creates_new_room() {
            MessageKey::CreateRoom
        } else {
            MessageKey::JoinRoom
        };

        Self {
            title: catalog.text(MessageKey::AppTitle).to_string(),
            subtitle: catalog.text(MessageKey::AppSubtitle).to_string(),
            name: lobby.name().to_string(),
            name_placeholder: catalog.text(MessageKey::NamePlaceholder).to_string(),
            room_id: lobby.room_id().to_string(),
            room_placeholder: catalog.text(MessageKey::RoomPlaceholder).to_string(),
            join_label: catalog.text(join_key).to_string(),
            join_enabled: lobby.can_join(),
            error: error.map(|key| catalog.text(key).to_string()),
            camera_notice: (!has_camera)
                .then(|| catalog.text(MessageKey::CameraUnavailable).to_string()),
        }
    }
}

/// Local video preview, present only while video is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    /// ID of the local stream being shown
    pub stream_id: String,
    /// ID of the live video track
    pub track_id: String,
    /// Device label of the video track
    pub label: String,
}

/// In-call screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InCallView {
    /// Avatar letter
    pub avatar: String,
    /// Name with the self marker, e.g. `Alice (You)`
    pub display_name: String,
    /// Room line, e.g. `Room: ABC123`
    pub room_line: String,
    /// Current error text
    pub error: Option<String>,
    /// Local preview
    pub preview: Option<PreviewView>,
    /// Video toggle label
    pub video_toggle: String,
    /// Microphone toggle label
    pub audio_toggle: String,
    /// Video flag the labels were computed from
    pub video_on: bool,
    /// Audio flag the labels were computed from
    pub audio_on: bool,
}

impl InCallView {
    /// Build the in-call screen
    pub fn new(
        identity: &SessionIdentity,
        snapshot: &SessionSnapshot,
        catalog: &MessageCatalog,
    ) -> Self {
        let preview = if snapshot.video_on {
            snapshot.stream.as_ref().and_then(|stream| {
                stream
                    .live_track(TrackKind::Video)
                    .map(|track| PreviewView {
                        stream_id: stream.id().to_string(),
                        track_id: track.id().to_string(),
                        label: track.label().to_string(),
                    })
            })
        } else {
            None
        };

        let video_toggle = if snapshot.video_on {
            MessageKey::TurnVideoOff
        } else {
            MessageKey::TurnVideoOn
        };
        let audio_toggle = if snapshot.audio_on {
            MessageKey::TurnMicrophoneOff
        } else {
            MessageKey::TurnMicrophoneOn
        };

        Self {
            avatar: identity.initial(),
            display_name: format!(
                "{} ({})",
                identity.name(),
                catalog.text(MessageKey::SelfMarker)
            ),
            room_line: format!(
                "{}: {}",
                catalog.text(MessageKey::RoomLabel),
                identity.room_id()
            ),
            error: snapshot.error.map(|key| catalog.text(key).to_string()),
            preview,
            video_toggle: catalog.text(video_toggle).to_string(),
            audio_toggle: catalog.text(audio_toggle).to_string(),
            video_on: snapshot.video_on,
            audio_on: snapshot.audio_on,
        }
    }
}

/// Something that can draw a [`View`]
pub trait ViewRenderer {
    /// What a render produces
    type Output;

    /// Draw the lobby screen
    fn render_lobby(&mut self, view: &LobbyView) -> Self::Output;

    /// Draw the in-call screen
    fn render_in_call(&mut self, view: &InCallView) -> Self::Output;

    /// Draw whichever screen `view` is
    fn render(&mut self, view: &View) -> Self::Output {
        match view {
            View::Lobby(lobby) => self.render_lobby(lobby),
            View::InCall(in_call) => self.render_in_call(in_call),
        }
    }
}

/// Renders a view as a plain-text card
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Create a text renderer
    pub fn new() -> Self {
        Self
    }
}

fn field(out: &mut String, value: &str, placeholder: &str) {
    if value.is_empty() {
        let _ = writeln!(out, "[ {} ]", placeholder);
    } else {
        let _ = writeln!(out, "[ {} ]", value);
    }
}

impl ViewRenderer for TextRenderer {
    type Output = String;

    fn render_lobby(&mut self, view: &LobbyView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", view.title);
        let _ = writeln!(out, "{}", view.subtitle);
        if let Some(error) = &view.error {
            let _ = writeln!(out, "! {}", error);
        }
        field(&mut out, &view.name, &view.name_placeholder);
        field(&mut out, &view.room_id, &view.room_placeholder);
        let state = if view.join_enabled { "" } else { " (disabled)" };
        let _ = writeln!(out, "<{}>{}", view.join_label, state);
        if let Some(notice) = &view.camera_notice {
            let _ = writeln!(out, "{}", notice);
        }
        out
    }

    fn render_in_call(&mut self, view: &InCallView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "({})", view.avatar);
        let _ = writeln!(out, "{}", view.display_name);
        let _ = writeln!(out, "{}", view.room_line);
        if let Some(error) = &view.error {
            let _ = writeln!(out, "! {}", error);
        }
        if let Some(preview) = &view.preview {
            let _ = writeln!(out, "[preview {} {}]", preview.label, preview.track_id);
        }
        let _ = writeln!(out, "<{}>", view.video_toggle);
        let _ = writeln!(out, "<{}>", view.audio_toggle);
        out
    }
}

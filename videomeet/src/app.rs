//! Application shell tying the lobby, the media session and the view together

use crate::config::GlobalConfig;
use crate::error::{VideoMeetError, VideoMeetResult};
use crate::event::{Event, EventBus, EventStream};
use crate::messages::MessageCatalog;
use crate::participant::SessionIdentity;
use crate::prober::Capability;
use crate::room::Lobby;
use crate::session::MediaSession;
use crate::track::ToggleOutcome;
use crate::view::{InCallView, LobbyView, View, ViewRenderer};
use std::sync::Arc;
use tracing::{debug, info};
use videomeet_media::MediaDevices;

/// One user's session: lobby form first, then the in-call screen.
///
/// The lobby to in-call transition is one-way. Media toggles work on either
/// screen.
#[derive(Debug)]
pub struct VideoMeetApp {
    config: GlobalConfig,
    catalog: MessageCatalog,
    events: EventBus,
    session: MediaSession,
    lobby: Lobby,
    identity: Option<SessionIdentity>,
}

impl VideoMeetApp {
    /// Create an app over a devices backend
    pub fn new(config: GlobalConfig, devices: Arc<dyn MediaDevices>) -> VideoMeetResult<Self> {
        config.validate()?;
        let catalog = MessageCatalog::bundled(&config.locale)?;
        let events = EventBus::new(config.event_capacity);
        let session = MediaSession::with_bus(devices, config.stopped_tracks, events.clone());

        debug!("Created app with locale {}", catalog.locale());
        Ok(Self {
            lobby: Lobby::new(config.room_id_length),
            config,
            catalog,
            events,
            session,
            identity: None,
        })
    }

    /// Probe devices. Later calls reuse the first result.
    pub async fn start(&self) -> VideoMeetResult<Capability> {
        self.session.probe_devices().await
    }

    /// Update the name input
    pub fn set_name(&mut self, name: &str) -> VideoMeetResult<()> {
        self.ensure_in_lobby()?;
        self.lobby.set_name(name);
        Ok(())
    }

    /// Update the room id input
    pub fn set_room_id(&mut self, room_id: &str) -> VideoMeetResult<()> {
        self.ensure_in_lobby()?;
        self.lobby.set_room_id(room_id);
        Ok(())
    }

    /// Join the entered room, or a freshly generated one.
    ///
    /// Returns `Ok(None)` and stays in the lobby when the name is blank.
    pub fn join_room(&mut self) -> VideoMeetResult<Option<SessionIdentity>> {
        self.ensure_in_lobby()?;
        let identity = match self.lobby.join() {
            Some(identity) => identity,
            None => return Ok(None),
        };

        info!("📞 In call as {} in room {}", identity.name(), identity.room_id());
        self.identity = Some(identity.clone());
        self.events.emit(Event::Joined {
            identity: identity.clone(),
        });
        Ok(Some(identity))
    }

    fn ensure_in_lobby(&self) -> VideoMeetResult<()> {
        match &self.identity {
            Some(identity) => Err(VideoMeetError::AlreadyJoined {
                room_id: identity.room_id().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Turn the camera on or off
    pub async fn toggle_video(&self) -> VideoMeetResult<ToggleOutcome> {
        self.session.toggle_video().await
    }

    /// Turn the microphone on or off
    pub async fn toggle_audio(&self) -> VideoMeetResult<ToggleOutcome> {
        self.session.toggle_audio().await
    }

    /// Whether the room was joined
    pub fn is_in_call(&self) -> bool {
        self.identity.is_some()
    }

    /// Identity the room was joined with
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    /// Lobby form state
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Compute the current screen
    pub fn view(&self) -> View {
        let snapshot = self.session.snapshot();
        match &self.identity {
            Some(identity) => View::InCall(InCallView::new(identity, &snapshot, &self.catalog)),
            None => View::Lobby(LobbyView::new(
                &self.lobby,
                snapshot.has_camera,
                snapshot.error,
                &self.catalog,
            )),
        }
    }

    /// Draw the current screen with `renderer`
    pub fn render<R: ViewRenderer>(&self, renderer: &mut R) -> R::Output {
        renderer.render(&self.view())
    }

    /// Subscribe to session and join events
    pub fn events(&self) -> EventStream {
        self.events.subscribe()
    }

    /// The media session
    pub fn session(&self) -> &MediaSession {
        &self.session
    }

    /// Message catalog used for labels
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Configuration this app was built with
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use videomeet_media::MockMediaDevices;

    fn app() -> VideoMeetApp {
        VideoMeetApp::new(
            GlobalConfig::default(),
            Arc::new(MockMediaDevices::with_default_devices()),
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let result = VideoMeetApp::new(
            GlobalConfig::default().with_locale("fr"),
            Arc::new(MockMediaDevices::new()),
        );
        assert!(matches!(result, Err(VideoMeetError::UnknownLocale { .. })));
    }

    #[test]
    fn test_identity_frozen_after_join() {
        let mut app = app();
        app.set_name("Alice").unwrap();
        app.set_room_id("abc").unwrap();
        let identity = app.join_room().unwrap().unwrap();
        assert_eq!(identity.room_id(), "ABC");

        assert!(matches!(
            app.set_name("Mallory"),
            Err(VideoMeetError::AlreadyJoined { .. })
        ));
        assert!(matches!(
            app.join_room(),
            Err(VideoMeetError::AlreadyJoined { .. })
        ));
        assert_eq!(app.identity().unwrap().name(), "Alice");
    }

    #[test]
    fn test_blank_name_stays_in_lobby() {
        let mut app = app();
        app.set_name("  ").unwrap();
        assert!(app.join_room().unwrap().is_none());
        assert!(!app.is_in_call());
        assert!(!app.view().is_in_call());
    }
}

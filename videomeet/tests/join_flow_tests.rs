//! Tests for the lobby, the join transition and the rendered views
//!
//! This module drives [`VideoMeetApp`] through the mock backend: name and
//! room input, room id generation, the one-way switch to the in-call screen
//! and the labels each screen shows.

use std::sync::Arc;
use videomeet::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("videomeet=debug")
        .try_init();
}

async fn launch(locale: &str) -> (Arc<MockMediaDevices>, VideoMeetApp) {
    init_logging();
    let devices = Arc::new(MockMediaDevices::with_default_devices());
    let videomeet =
        VideoMeet::with_devices(GlobalConfig::default().with_locale(locale), devices.clone())
            .unwrap();
    let app = videomeet.launch().await.unwrap();
    (devices, app)
}

fn is_room_token(id: &str) -> bool {
    id.len() == 9
        && id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

// ============================================================================
// JOIN TESTS
// ============================================================================

#[tokio::test]
async fn test_blank_name_does_not_join() {
    let (_devices, mut app) = launch("en").await;

    for name in ["", " ", "\t\n  "] {
        app.set_name(name).unwrap();
        assert_eq!(app.join_room().unwrap(), None);
        assert!(!app.is_in_call());
    }
    assert!(matches!(app.view(), View::Lobby(_)));
    assert_eq!(app.lobby().room_id(), "");
}

#[tokio::test]
async fn test_join_generates_room_id() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("Alice").unwrap();
    app.set_room_id("").unwrap();

    let identity = app.join_room().unwrap().unwrap();
    assert!(is_room_token(identity.room_id()), "bad room id {}", identity.room_id());
    assert!(app.is_in_call());
    assert_eq!(app.identity(), Some(&identity));
}

#[tokio::test]
async fn test_join_keeps_entered_room_id() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("Bob").unwrap();
    app.set_room_id("abc123").unwrap();

    let identity = app.join_room().unwrap().unwrap();
    assert_eq!(identity.room_id(), "ABC123");
    assert_eq!(identity.name(), "Bob");
}

#[tokio::test]
async fn test_join_trims_name() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("  Carol ").unwrap();

    let identity = app.join_room().unwrap().unwrap();
    assert_eq!(identity.name(), "Carol");
}

#[tokio::test]
async fn test_join_is_one_way() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("Dave").unwrap();
    let identity = app.join_room().unwrap().unwrap();

    let err = app.set_room_id("other").unwrap_err();
    assert!(matches!(
        err,
        VideoMeetError::AlreadyJoined { ref room_id } if room_id == identity.room_id()
    ));
    assert!(app.join_room().is_err());
    assert!(app.is_in_call());
}

#[tokio::test]
async fn test_join_emits_event() {
    let (_devices, mut app) = launch("en").await;
    let mut events = app.events();
    app.set_name("Erin").unwrap();
    app.set_room_id("room1").unwrap();

    let identity = app.join_room().unwrap().unwrap();
    let joined: Vec<Event> = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, Event::Joined { .. }))
        .collect();
    assert_eq!(joined, vec![Event::Joined { identity }]);
}

// ============================================================================
// VIEW TESTS
// ============================================================================

#[tokio::test]
async fn test_lobby_view_in_ukrainian() {
    let (_devices, mut app) = launch("uk").await;

    let lobby = match app.view() {
        View::Lobby(lobby) => lobby,
        other => panic!("expected lobby, got {:?}", other),
    };
    assert_eq!(lobby.title, "VideoMeet");
    assert_eq!(lobby.join_label, "Створити нову кімнату");
    assert!(!lobby.join_enabled);
    assert!(lobby.camera_notice.is_none());

    app.set_name("Олена").unwrap();
    app.set_room_id("kyiv").unwrap();
    let lobby = match app.view() {
        View::Lobby(lobby) => lobby,
        other => panic!("expected lobby, got {:?}", other),
    };
    assert_eq!(lobby.room_id, "KYIV");
    assert_eq!(lobby.join_label, "Приєднатися до кімнати");
    assert!(lobby.join_enabled);
}

#[tokio::test]
async fn test_lobby_shows_camera_notice_and_device_error() {
    init_logging();
    let devices = Arc::new(MockMediaDevices::new());
    devices.fail_enumeration("no media permission");
    let videomeet =
        VideoMeet::with_devices(GlobalConfig::default().with_locale("en"), devices).unwrap();
    let app = videomeet.launch().await.unwrap();

    match app.view() {
        View::Lobby(lobby) => {
            assert_eq!(lobby.error.as_deref(), Some("Device access error"));
            assert_eq!(lobby.camera_notice.as_deref(), Some("Camera unavailable"));
        }
        other => panic!("expected lobby, got {:?}", other),
    }
}

#[tokio::test]
async fn test_in_call_view_follows_toggles() {
    let (devices, mut app) = launch("en").await;
    app.set_name("frank").unwrap();
    app.set_room_id("abc123").unwrap();
    app.join_room().unwrap();

    let view = match app.view() {
        View::InCall(view) => view,
        other => panic!("expected in-call, got {:?}", other),
    };
    assert_eq!(view.avatar, "F");
    assert_eq!(view.display_name, "frank (You)");
    assert_eq!(view.room_line, "Room: ABC123");
    assert_eq!(view.video_toggle, "Turn on video");
    assert_eq!(view.audio_toggle, "Turn on microphone");
    assert!(view.preview.is_none());

    app.toggle_video().await.unwrap();
    app.toggle_audio().await.unwrap();
    let view = match app.view() {
        View::InCall(view) => view,
        other => panic!("expected in-call, got {:?}", other),
    };
    assert_eq!(view.video_toggle, "Turn off video");
    assert_eq!(view.audio_toggle, "Turn off microphone");
    let preview = view.preview.unwrap();
    assert_eq!(preview.track_id, devices.issued_tracks()[0].id());
    assert_eq!(preview.label, "Mock Camera");

    app.toggle_video().await.unwrap();
    match app.view() {
        View::InCall(view) => {
            assert!(view.preview.is_none());
            assert!(!view.video_on);
            assert!(view.audio_on);
        }
        other => panic!("expected in-call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_in_call_error_text() {
    let (devices, mut app) = launch("uk").await;
    app.set_name("Ігор").unwrap();
    app.join_room().unwrap();

    devices.fail_capture(TrackKind::Audio, MockFailure::PermissionDenied);
    assert!(app.toggle_audio().await.is_err());

    match app.view() {
        View::InCall(view) => {
            assert_eq!(
                view.error.as_deref(),
                Some("Не вдалося отримати доступ до пристроїв")
            );
            assert_eq!(view.avatar, "І");
            assert_eq!(view.display_name, "Ігор (Ви)");
        }
        other => panic!("expected in-call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_text_renderer_output() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("Grace").unwrap();
    app.set_room_id("xyz").unwrap();

    let mut renderer = TextRenderer::new();
    let lobby = app.render(&mut renderer);
    assert!(lobby.contains("<Join room>"));
    assert!(lobby.contains("[ Grace ]"));

    app.join_room().unwrap();
    let in_call = app.render(&mut renderer);
    assert!(in_call.contains("Grace (You)"));
    assert!(in_call.contains("Room: XYZ"));
    assert!(in_call.contains("<Turn on video>"));
}

#[tokio::test]
async fn test_view_serializes_with_screen_tag() {
    let (_devices, app) = launch("en").await;
    let json = serde_json::to_value(app.view()).unwrap();
    assert_eq!(json["screen"], "lobby");
    assert_eq!(json["join_label"], "Create new room");
}

#[cfg(feature = "diagnostics")]
#[tokio::test]
async fn test_session_report_after_join() {
    let (_devices, mut app) = launch("en").await;
    app.set_name("Heidi").unwrap();
    app.join_room().unwrap();
    app.toggle_video().await.unwrap();

    let report = app.session().report();
    assert!(report.has_camera);
    assert!(report.video_on);
    let json = report.to_json().unwrap();
    assert!(json.contains("\"video_on\": true"));
}

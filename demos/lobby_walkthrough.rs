//! Lobby walkthrough for VideoMeet
//!
//! This demo walks through the whole flow on the mock backend: probe, lobby,
//! join, camera and microphone toggles, a scripted capture failure and the
//! session report.

use std::sync::Arc;
use std::time::Duration;
use videomeet::{
    DebugLogger, GlobalConfig, MockFailure, MockMediaDevices, TextRenderer, TrackKind, VideoMeet,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    DebugLogger::init_logging(true)?;

    println!("🔄 Starting VideoMeet walkthrough");
    let devices = Arc::new(MockMediaDevices::with_default_devices());
    devices.set_delay(TrackKind::Video, Duration::from_millis(150));

    let config = GlobalConfig::default().with_locale("en");
    let videomeet = VideoMeet::with_devices(config, devices.clone())?;
    let mut app = videomeet.launch().await?;
    let mut renderer = TextRenderer::new();
    let mut events = app.events();

    println!("\n--- Lobby ---");
    print!("{}", app.render(&mut renderer));

    app.set_name("Alice")?;
    app.set_room_id("demo42")?;
    print!("{}", app.render(&mut renderer));

    match app.join_room()? {
        Some(identity) => println!("✅ Joined room {} as {}", identity.room_id(), identity.name()),
        None => {
            println!("❌ Name is empty, staying in the lobby");
            return Ok(());
        }
    }

    println!("\n--- In call ---");
    let (video, audio) = tokio::join!(app.toggle_video(), app.toggle_audio());
    println!("🎥 Video: {:?}", video?);
    println!("🎤 Audio: {:?}", audio?);
    print!("{}", app.render(&mut renderer));

    app.toggle_video().await?;
    println!("🛑 Camera off");
    print!("{}", app.render(&mut renderer));

    devices.fail_capture(TrackKind::Video, MockFailure::PermissionDenied);
    if let Err(e) = app.toggle_video().await {
        println!("⚠️  Camera refused: {}", e);
    }
    print!("{}", app.render(&mut renderer));

    println!("\n--- Events ---");
    for event in events.drain() {
        println!("📡 {:?}", event);
    }

    println!("\n--- Session report ---");
    println!("{}", app.session().report().to_json()?);

    Ok(())
}

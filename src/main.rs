use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_chat::audio::{AudioBackend, AudioRecorder, ScriptedBackend, ScriptedRecorder};
use voice_chat::config::ChatConfig;
use voice_chat::platform::DesktopPermissions;
use voice_chat::ui::{ChatApp, ChatScreen};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voice_chat=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChatConfig::load_or_default().context("Failed to load configuration")?;
    info!(
        "Starting {} (recordings in {})",
        config.title,
        config.recording.dir.display()
    );

    let title = config.title.clone();
    let permissions = DesktopPermissions::new(config.recording.dir.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 720.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let screen = ChatScreen::new(
                config,
                open_recorder(),
                open_backend(),
                Box::new(permissions),
            );
            Ok(Box::new(ChatApp::new(cc, screen)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}

#[cfg(feature = "audio-io")]
fn open_recorder() -> Box<dyn AudioRecorder> {
    match voice_chat::audio::CpalRecorder::new() {
        Ok(recorder) => Box::new(recorder),
        Err(e) => {
            warn!("[AUDIO] No microphone, recording disabled: {}", e);
            Box::new(unavailable_recorder(e))
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn open_recorder() -> Box<dyn AudioRecorder> {
    warn!("[AUDIO] Built without audio-io, recording disabled");
    Box::new(unavailable_recorder(voice_chat::ChatError::AudioDeviceError(
        "built without audio-io".into(),
    )))
}

/// A recorder whose every start fails with `reason`, so the mic shows an error
fn unavailable_recorder(reason: voice_chat::ChatError) -> ScriptedRecorder {
    let recorder = ScriptedRecorder::new();
    recorder.fail_every_start(reason.to_string());
    recorder
}

#[cfg(feature = "audio-io")]
fn open_backend() -> Box<dyn AudioBackend> {
    match voice_chat::audio::RodioBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("[PLAYBACK] No output device, playback disabled: {}", e);
            Box::new(unavailable_backend(e))
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn open_backend() -> Box<dyn AudioBackend> {
    warn!("[PLAYBACK] Built without audio-io, playback disabled");
    Box::new(unavailable_backend(voice_chat::ChatError::AudioDeviceError(
        "built without audio-io".into(),
    )))
}

/// A backend whose every load fails with `reason`, so voice messages show a device error
fn unavailable_backend(reason: voice_chat::ChatError) -> ScriptedBackend {
    let backend = ScriptedBackend::new();
    backend.fail_every_load(reason.to_string());
    backend
}

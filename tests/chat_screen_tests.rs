//! Chat screen behavior tests
//!
//! Drive `ChatScreen` with the scripted recorder, backend and permission
//! authority, advancing time with explicit instants.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use voice_chat::audio::{ScriptedBackend, ScriptedRecorder};
use voice_chat::config::ChatConfig;
use voice_chat::messages::{MessageContent, MessageKind, Sender};
use voice_chat::platform::{Permission, PermissionStatus, Platform, StaticPermissions};
use voice_chat::session::LoadState;
use voice_chat::ui::ChatScreen;
use voice_chat::ChatError;

struct Fixture {
    screen: ChatScreen,
    recorder: ScriptedRecorder,
    backend: ScriptedBackend,
}

fn fixture_with(config: ChatConfig, permissions: StaticPermissions) -> Fixture {
    let recorder = ScriptedRecorder::new();
    let backend = ScriptedBackend::with_default_duration(5.0);
    let screen = ChatScreen::new(
        config,
        Box::new(recorder.clone()),
        Box::new(backend.clone()),
        Box::new(permissions),
    );
    Fixture {
        screen,
        recorder,
        backend,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        ChatConfig::default().with_recording_dir("/tmp/voice-chat-tests/takes"),
        StaticPermissions::granting_all(),
    )
}

/// Record a take and stop it, returning its path
fn record_take(f: &mut Fixture, now: Instant) -> PathBuf {
    f.screen.start_recording(now).unwrap();
    f.screen.stop_recording().unwrap()
}

#[test]
fn test_text_message_is_appended_and_draft_cleared() {
    let mut f = fixture();
    f.screen.set_draft("hello");

    assert_eq!(f.screen.send_message(), 1);

    let messages = f.screen.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Me);
    assert_eq!(messages[0].kind(), MessageKind::Text);
    assert_eq!(messages[0].body(), "hello");
    assert_eq!(f.screen.draft(), "");
}

#[test]
fn test_text_is_stored_as_typed() {
    let mut f = fixture();
    f.screen.set_draft("  hi there \n");
    assert_eq!(f.screen.send_message(), 1);
    assert_eq!(
        f.screen.messages()[0].content,
        MessageContent::Text("  hi there \n".into())
    );
    assert_eq!(f.screen.draft(), "");
}

#[test]
fn test_empty_send_is_noop() {
    let mut f = fixture();
    assert_eq!(f.screen.send_message(), 0);

    f.screen.set_draft("   ");
    assert_eq!(f.screen.send_message(), 0);
    assert!(f.screen.messages().is_empty());
    assert_eq!(f.screen.draft(), "   ");
}

#[test]
fn test_start_stop_produces_pending_and_stops_timer() {
    let mut f = fixture();
    let now = Instant::now();

    f.screen.start_recording(now).unwrap();
    assert!(f.screen.recording().is_recording());

    f.screen.update(now + Duration::from_secs(1));
    f.screen.update(now + Duration::from_secs(2));
    assert_eq!(f.screen.recording().elapsed_secs(), 2);

    let path = f.screen.stop_recording().unwrap();
    assert_eq!(f.screen.recording().pending_path(), Some(path.as_path()));
    assert_eq!(f.recorder.start_calls(), vec![path.clone()]);
    assert!(!f.screen.recording().is_ticking());

    // The counter does not move once stopped
    f.screen.update(now + Duration::from_secs(30));
    assert_eq!(f.screen.recording().elapsed_secs(), 2);
}

#[test]
fn test_pending_path_is_what_the_recorder_returned() {
    let mut f = fixture();
    f.recorder.return_path("/tmp/voice-chat-tests/takes/converted.m4a");

    let path = record_take(&mut f, Instant::now());
    assert_eq!(path, PathBuf::from("/tmp/voice-chat-tests/takes/converted.m4a"));
    assert_eq!(f.screen.recording().pending_path(), Some(path.as_path()));
}

#[test]
fn test_preview_is_mounted_for_pending_take() {
    let mut f = fixture();
    let path = record_take(&mut f, Instant::now());

    let preview = f.screen.preview_player().unwrap();
    assert_eq!(preview.path(), path.as_path());
    assert_eq!(preview.duration_secs(), Some(5.0));
}

#[test]
fn test_sending_pending_take_appends_audio_message() {
    let mut f = fixture();
    let path = record_take(&mut f, Instant::now());

    assert_eq!(f.screen.send_message(), 1);

    let messages = f.screen.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind(), MessageKind::Audio);
    assert_eq!(messages[0].audio_path(), Some(path.as_path()));
    assert!(f.screen.recording().is_idle());
    assert!(f.screen.player(messages[0].id).is_some());
}

#[test]
fn test_text_and_take_sent_together() {
    let mut f = fixture();
    record_take(&mut f, Instant::now());
    f.screen.set_draft("listen to this");

    assert_eq!(f.screen.send_message(), 2);

    let kinds: Vec<_> = f.screen.messages().iter().map(|m| m.kind()).collect();
    assert_eq!(kinds, vec![MessageKind::Text, MessageKind::Audio]);
}

#[test]
fn test_text_sent_while_recording_leaves_take_alone() {
    let mut f = fixture();
    f.screen.start_recording(Instant::now()).unwrap();
    f.screen.set_draft("one sec");

    assert_eq!(f.screen.send_message(), 1);
    assert!(f.screen.recording().is_recording());
    assert_eq!(f.screen.messages()[0].kind(), MessageKind::Text);
}

#[test]
fn test_discard_appends_nothing() {
    let mut f = fixture();
    record_take(&mut f, Instant::now());

    f.screen.discard_pending().unwrap();

    assert!(f.screen.recording().is_idle());
    assert!(f.screen.recording().pending_path().is_none());
    assert!(f.screen.preview_player().is_none());
    assert_eq!(f.screen.send_message(), 0);
    assert!(f.screen.messages().is_empty());
    assert_eq!(f.backend.live_handles(), 0);
}

#[test]
fn test_discard_can_delete_file() {
    let dir = tempfile::tempdir().unwrap();
    let take = dir.path().join("take.wav");
    std::fs::write(&take, b"not really audio").unwrap();

    let mut config = ChatConfig::default().with_recording_dir(dir.path());
    config.recording.delete_discarded = true;
    let mut f = fixture_with(config, StaticPermissions::granting_all());
    f.recorder.return_path(&take);

    record_take(&mut f, Instant::now());
    f.screen.discard_pending().unwrap();
    assert!(!take.exists());
}

#[test]
fn test_discard_keeps_file_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let take = dir.path().join("take.wav");
    std::fs::write(&take, b"not really audio").unwrap();

    let mut f = fixture_with(
        ChatConfig::default().with_recording_dir(dir.path()),
        StaticPermissions::granting_all(),
    );
    f.recorder.return_path(&take);

    record_take(&mut f, Instant::now());
    f.screen.discard_pending().unwrap();
    assert!(take.exists());
}

#[test]
fn test_second_start_is_rejected() {
    let mut f = fixture();
    let now = Instant::now();
    f.screen.start_recording(now).unwrap();

    let result = f.screen.start_recording(now + Duration::from_millis(100));
    assert!(matches!(result, Err(ChatError::InvalidState(_))));
    assert_eq!(f.recorder.start_calls().len(), 1);
    assert!(f.screen.recorder_error().is_none());
}

#[test]
fn test_start_rejected_while_pending() {
    let mut f = fixture();
    record_take(&mut f, Instant::now());

    assert!(matches!(
        f.screen.start_recording(Instant::now()),
        Err(ChatError::InvalidState(_))
    ));
    assert!(f.screen.recording().pending_path().is_some());
}

#[test]
fn test_stop_and_discard_need_the_right_state() {
    let mut f = fixture();
    assert!(matches!(
        f.screen.stop_recording(),
        Err(ChatError::InvalidState(_))
    ));
    assert!(matches!(
        f.screen.discard_pending(),
        Err(ChatError::InvalidState(_))
    ));
    assert_eq!(f.recorder.stop_calls(), 0);
}

#[test]
fn test_start_failure_is_surfaced() {
    let mut f = fixture();
    f.recorder.fail_next_start("microphone busy");

    let result = f.screen.start_recording(Instant::now());

    assert!(result.is_err());
    assert!(f.screen.recording().is_idle());
    assert!(!f.screen.recording().is_ticking());
    assert_eq!(
        f.screen.recorder_error(),
        Some(&ChatError::RecorderError("microphone busy".into()))
    );

    // A later successful start clears it
    f.screen.start_recording(Instant::now()).unwrap();
    assert!(f.screen.recorder_error().is_none());
}

#[test]
fn test_stop_failure_returns_to_idle() {
    let mut f = fixture();
    f.screen.start_recording(Instant::now()).unwrap();
    f.recorder.fail_next_stop("could not finalize");

    assert!(f.screen.stop_recording().is_err());
    assert!(f.screen.recording().is_idle());
    assert!(f.screen.preview_player().is_none());
    assert!(f.screen.recorder_error().is_some());

    f.screen.clear_recorder_error();
    assert!(f.screen.recorder_error().is_none());
}

#[test]
fn test_permission_denial_does_not_block_recording() {
    let mut f = fixture_with(
        ChatConfig::default().with_recording_dir("/tmp/voice-chat-tests/takes"),
        StaticPermissions::denying_all(),
    );

    assert!(matches!(
        f.screen.permission_error(),
        Some(ChatError::PermissionError(_))
    ));
    assert!(f.screen.start_recording(Instant::now()).is_ok());
    assert!(f.screen.recording().is_recording());
}

#[test]
fn test_permissions_requested_for_configured_platform() {
    let config = ChatConfig::default()
        .with_recording_dir("/tmp/voice-chat-tests/takes")
        .with_platform(Platform::Android { api_level: 33 });
    let permissions = StaticPermissions::granting_all()
        .with(Permission::WriteExternalStorage, PermissionStatus::Denied);

    // Storage write is not part of the API 33 set
    let f = fixture_with(config, permissions);
    assert!(f.screen.permission_error().is_none());
    let grants = f.screen.permission_grants().unwrap();
    assert_eq!(
        grants.status(Permission::ReadMediaAudio),
        Some(PermissionStatus::Granted)
    );
}

#[test]
fn test_older_android_needs_storage() {
    let config = ChatConfig::default()
        .with_recording_dir("/tmp/voice-chat-tests/takes")
        .with_platform(Platform::Android { api_level: 30 });
    let permissions = StaticPermissions::granting_all()
        .with(Permission::WriteExternalStorage, PermissionStatus::Denied);

    let f = fixture_with(config, permissions);
    assert!(f.screen.permission_error().is_some());
}

#[test]
fn test_message_ids_are_unique() {
    let mut f = fixture();
    for i in 0..5 {
        f.screen.set_draft(format!("message {}", i));
        f.screen.send_message();
        record_take(&mut f, Instant::now());
        f.screen.send_message();
    }

    let messages = f.screen.messages();
    assert_eq!(messages.len(), 10);
    let ids: HashSet<_> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn test_each_voice_message_gets_its_own_take() {
    let mut f = fixture();
    let first = record_take(&mut f, Instant::now());
    f.screen.send_message();
    let second = record_take(&mut f, Instant::now());
    f.screen.send_message();

    assert_ne!(first, second);
    assert_eq!(f.backend.live_handles(), 2);
}

#[test]
fn test_dropping_screen_releases_every_player() {
    let mut f = fixture();
    record_take(&mut f, Instant::now());
    f.screen.send_message();
    record_take(&mut f, Instant::now());
    assert_eq!(f.backend.live_handles(), 2);

    let backend = f.backend.clone();
    drop(f);
    assert_eq!(backend.live_handles(), 0);
    assert_eq!(backend.releases(), 2);
}

#[test]
fn test_players_update_with_the_screen() {
    let mut f = fixture();
    let path = record_take(&mut f, Instant::now());
    f.screen.send_message();
    let id = f.screen.messages()[0].id;

    let now = Instant::now();
    f.screen.player_mut(id).unwrap().toggle_play(now).unwrap();
    f.backend.set_position(&path, 2.0);
    f.screen.update(now + Duration::from_secs(1));

    assert_eq!(f.screen.player(id).unwrap().countdown(), "00:03");
    assert!(f.screen.next_repaint().is_some());
}

#[test]
fn test_missing_output_device_fails_loads_with_device_error() {
    let mut f = fixture();
    f.backend.fail_every_load("no output device");
    let now = Instant::now();

    record_take(&mut f, now);
    let preview = f.screen.preview_player().unwrap();
    assert!(matches!(
        preview.load_state(),
        LoadState::Failed(ChatError::AudioDeviceError(_))
    ));

    assert_eq!(f.screen.send_message(), 1);
    let id = f.screen.messages()[0].id;
    assert!(matches!(
        f.screen.player(id).unwrap().load_state(),
        LoadState::Failed(ChatError::AudioDeviceError(_))
    ));
    assert_eq!(f.screen.loaded_players(), 0);
    assert_eq!(f.backend.loads(), 0);
}

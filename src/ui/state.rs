//! Chat screen state
//!
//! Everything the chat screen does lives here, independent of rendering:
//! the conversation, the draft, the recording session and one player per
//! voice message. The egui components only read this state and call its
//! operations.

use crate::audio::{AudioBackend, AudioRecorder};
use crate::config::ChatConfig;
use crate::messages::{Message, MessageStorage, Sender};
use crate::platform::{request_capabilities, PermissionAuthority, PermissionGrants};
use crate::session::{AudioMessage, RecordingSession, Variant};
use crate::{ChatError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ChatScreen {
    config: ChatConfig,
    messages: MessageStorage,
    draft: String,
    recording: RecordingSession,
    recorder: Box<dyn AudioRecorder>,
    backend: Box<dyn AudioBackend>,
    permissions: Box<dyn PermissionAuthority>,
    /// One player per voice message, keyed by message id
    players: HashMap<Uuid, AudioMessage>,
    /// Player for the pending take
    preview: Option<AudioMessage>,
    recorder_error: Option<ChatError>,
    permission_error: Option<ChatError>,
    grants: Option<PermissionGrants>,
}

impl ChatScreen {
    /// Build the screen and request the platform's permissions
    pub fn new(
        config: ChatConfig,
        recorder: Box<dyn AudioRecorder>,
        backend: Box<dyn AudioBackend>,
        permissions: Box<dyn PermissionAuthority>,
    ) -> Self {
        let recording =
            RecordingSession::new(config.recording.dir.clone(), config.timing.recording_tick());
        let mut screen = Self {
            config,
            messages: MessageStorage::new(),
            draft: String::new(),
            recording,
            recorder,
            backend,
            permissions,
            players: HashMap::new(),
            preview: None,
            recorder_error: None,
            permission_error: None,
            grants: None,
        };
        screen.request_permissions();
        screen
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Ask for every capability the platform needs in one batch
    ///
    /// A denial is kept for the banner; it never blocks recording.
    pub fn request_permissions(&mut self) {
        match request_capabilities(self.permissions.as_ref(), self.config.platform) {
            Ok(grants) => {
                self.grants = Some(grants);
                self.permission_error = None;
            }
            Err(e) => {
                self.grants = None;
                self.permission_error = Some(e);
            }
        }
    }

    pub fn permission_error(&self) -> Option<&ChatError> {
        self.permission_error.as_ref()
    }

    pub fn permission_grants(&self) -> Option<&PermissionGrants> {
        self.grants.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub(crate) fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.get_all()
    }

    pub fn storage(&self) -> &MessageStorage {
        &self.messages
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    /// Whether the send control does anything right now
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty() || self.recording.pending_path().is_some()
    }

    /// Send the draft and the pending take, returning how many messages were added
    ///
    /// A take still being recorded is not sent.
    pub fn send_message(&mut self) -> usize {
        let mut sent = 0;

        if !self.draft.trim().is_empty() {
            let message = Message::text(Sender::Me, std::mem::take(&mut self.draft));
            debug!("[CHAT] Sending text message {}", message.id);
            self.messages.add(message);
            sent += 1;
        }

        if let Some(path) = self.recording.take_pending() {
            if let Some(mut preview) = self.preview.take() {
                preview.teardown();
            }
            let message = Message::audio(Sender::Me, path.clone());
            debug!("[CHAT] Sending voice message {}", message.id);
            let player = self.mount_player(path, Variant::Sent);
            self.players.insert(message.id, player);
            self.messages.add(message);
            sent += 1;
        }

        if sent > 0 {
            info!("[CHAT] Sent {} message(s)", sent);
        }
        sent
    }

    /// Start recording a new take
    ///
    /// Only valid while idle. A recorder failure is kept for rendering and
    /// also returned.
    pub fn start_recording(&mut self, now: Instant) -> Result<()> {
        match self.recording.start(self.recorder.as_mut(), now) {
            Ok(_) => {
                self.recorder_error = None;
                Ok(())
            }
            Err(e @ ChatError::InvalidState(_)) => Err(e),
            Err(e) => {
                self.recorder_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Stop recording; the take becomes pending with a preview player
    pub fn stop_recording(&mut self) -> Result<PathBuf> {
        match self.recording.stop(self.recorder.as_mut()) {
            Ok(path) => {
                self.preview = Some(self.mount_player(path.clone(), Variant::Preview));
                self.recorder_error = None;
                Ok(path)
            }
            Err(e @ ChatError::InvalidState(_)) => Err(e),
            Err(e) => {
                self.recorder_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Throw away the pending take without sending it
    pub fn discard_pending(&mut self) -> Result<()> {
        let path = self.recording.discard()?;
        if let Some(mut preview) = self.preview.take() {
            preview.teardown();
        }

        if self.config.recording.delete_discarded {
            match fs::remove_file(&path) {
                Ok(()) => debug!("[CHAT] Deleted discarded take {}", path.display()),
                Err(e) => warn!(
                    "[CHAT] Could not delete discarded take {}: {}",
                    path.display(),
                    e
                ),
            }
        }
        Ok(())
    }

    pub fn recorder_error(&self) -> Option<&ChatError> {
        self.recorder_error.as_ref()
    }

    pub fn clear_recorder_error(&mut self) {
        self.recorder_error = None;
    }

    pub fn player(&self, id: Uuid) -> Option<&AudioMessage> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: Uuid) -> Option<&mut AudioMessage> {
        self.players.get_mut(&id)
    }

    pub fn preview_player(&self) -> Option<&AudioMessage> {
        self.preview.as_ref()
    }

    pub fn preview_player_mut(&mut self) -> Option<&mut AudioMessage> {
        self.preview.as_mut()
    }

    /// Number of players currently holding a loaded resource
    pub fn loaded_players(&self) -> usize {
        self.players
            .values()
            .chain(self.preview.iter())
            .filter(|p| p.is_loaded())
            .count()
    }

    /// Advance timers and playback state
    pub fn update(&mut self, now: Instant) {
        self.recording.tick(now);
        for player in self.players.values_mut() {
            player.update(now);
        }
        if let Some(preview) = self.preview.as_mut() {
            preview.update(now);
        }
    }

    /// The earliest instant any timer needs another frame
    pub fn next_repaint(&self) -> Option<Instant> {
        self.players
            .values()
            .chain(self.preview.iter())
            .filter_map(|p| p.next_poll())
            .chain(self.recording.next_tick())
            .min()
    }

    fn mount_player(&self, path: PathBuf, variant: Variant) -> AudioMessage {
        AudioMessage::mount(
            path,
            variant,
            self.backend.as_ref(),
            self.config.timing.playback_poll(),
            self.config.waveform.bars,
        )
    }
}

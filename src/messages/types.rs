use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// Sent from this device
    Me,
    /// Received from the other side of the conversation
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    /// A recorded take, referenced by its file path
    Audio { path: PathBuf },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Sender, content: MessageContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self::new(sender, MessageContent::Text(text.into()))
    }

    pub fn audio(sender: Sender, path: impl Into<PathBuf>) -> Self {
        Self::new(sender, MessageContent::Audio { path: path.into() })
    }

    pub fn kind(&self) -> MessageKind {
        match self.content {
            MessageContent::Text(_) => MessageKind::Text,
            MessageContent::Audio { .. } => MessageKind::Audio,
        }
    }

    /// The text content, or the file reference for audio messages
    pub fn body(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Audio { path } => path.display().to_string(),
        }
    }

    pub fn audio_path(&self) -> Option<&Path> {
        match &self.content {
            MessageContent::Audio { path } => Some(path),
            MessageContent::Text(_) => None,
        }
    }

    pub fn is_mine(&self) -> bool {
        self.sender == Sender::Me
    }

    /// `HH:MM` the message was sent, on the local clock
    pub fn local_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Message::text(Sender::Me, "hi");
        let b = Message::text(Sender::Me, "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_kind_and_body() {
        let text = Message::text(Sender::Other, "hello");
        assert_eq!(text.kind(), MessageKind::Text);
        assert_eq!(text.body(), "hello");
        assert!(text.audio_path().is_none());
        assert!(!text.is_mine());

        let audio = Message::audio(Sender::Me, "/tmp/take.wav");
        assert_eq!(audio.kind(), MessageKind::Audio);
        assert_eq!(audio.body(), "/tmp/take.wav");
        assert_eq!(audio.audio_path(), Some(Path::new("/tmp/take.wav")));
        assert!(audio.is_mine());
    }

    #[test]
    fn test_local_time_uses_local_clock() {
        use chrono::TimeZone;

        let mut message = Message::text(Sender::Me, "hi");
        message.timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 23, 45, 0).unwrap();

        let expected = Local
            .from_utc_datetime(&message.timestamp.naive_utc())
            .format("%H:%M")
            .to_string();
        assert_eq!(message.local_time(), expected);
    }
}

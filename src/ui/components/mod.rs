//! Chat screen widgets

pub mod audio_message;
pub mod header;
pub mod input_bar;
pub mod message_list;
pub mod waveform;

pub use audio_message::AudioMessageView;
pub use header::Header;
pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use waveform::Waveform;

//! egui front end for the chat screen

mod app;
pub mod components;
pub mod state;
mod theme;

pub use app::ChatApp;
pub use components::{AudioMessageView, Header, InputBar, MessageList, Waveform};
pub use state::ChatScreen;
pub use theme::Theme;

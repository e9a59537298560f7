pub mod storage;
pub mod types;

pub use storage::MessageStorage;
pub use types::{Message, MessageContent, MessageKind, Sender};

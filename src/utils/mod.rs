pub mod format;
pub mod ticker;

pub use format::{format_mmss, remaining_secs};
pub use ticker::Ticker;

//! Transcript pane: scroll state and message rendering.

mod state;
mod widget;

pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::TranscriptWidget;

//! Shared widgets for the confab TUI.

pub mod input_bar;
pub mod select;
pub mod text_input;

pub use input_bar::{InputBar, INPUT_BAR_HEIGHT};
pub use select::SelectButtons;
pub use text_input::{TextInput, TextInputState};

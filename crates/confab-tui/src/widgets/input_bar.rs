//! Bottom input bar hosting the active input control.
//!
//! Hidden entirely while no input is active; the conversation pane only
//! allocates it space when the sequencer has surfaced a control.

use confab_engine::ActiveInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widgets::select::SelectButtons;
use crate::widgets::text_input::{TextInput, TextInputState};

/// Height of the input bar including its border, in lines.
pub const INPUT_BAR_HEIGHT: u16 = 3;

/// Full-width bar rendering whichever input control is active.
pub struct InputBar<'a> {
    active: &'a ActiveInput,
    text_state: &'a TextInputState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    /// Create an input bar for the active control.
    pub fn new(active: &'a ActiveInput, text_state: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            active,
            text_state,
            theme,
        }
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        match self.active {
            ActiveInput::Text { placeholder, .. } => {
                TextInput::new(self.text_state, self.theme)
                    .placeholder(placeholder.as_deref())
                    .render(inner, buf);
            }
            ActiveInput::Select {
                options, focused, ..
            } => {
                SelectButtons::new(options, self.theme)
                    .focused(*focused)
                    .render(inner, buf);
            }
            ActiveInput::Custom { .. } => {
                let line = Line::from(Span::styled(
                    "Waiting for input...",
                    Style::default().fg(self.theme.muted),
                ));
                Paragraph::new(line).render(inner, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_engine::SelectOption;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(active: &ActiveInput, text_state: &TextInputState) -> String {
        let theme = Theme::default();
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let widget = InputBar::new(active, text_state, &theme);
                frame.render_widget(widget, frame.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_text_variant_shows_prompt() {
        let active = ActiveInput::Text {
            index: 0,
            placeholder: Some("Type here".to_string()),
        };
        let content = render_to_string(&active, &TextInputState::new());
        assert!(content.contains("Type here"));
    }

    #[test]
    fn test_select_variant_shows_options() {
        let active = ActiveInput::Select {
            index: 0,
            options: vec![SelectOption::new("Yes", 1), SelectOption::new("No", 0)],
            focused: 0,
        };
        let content = render_to_string(&active, &TextInputState::new());
        assert!(content.contains("Yes"));
        assert!(content.contains("No"));
    }

    #[test]
    fn test_custom_variant_shows_waiting() {
        let active = ActiveInput::Custom { index: 0 };
        let content = render_to_string(&active, &TextInputState::new());
        assert!(content.contains("Waiting for input"));
    }
}

//! Select input widget: one button per option, rendered in a row.

use confab_engine::SelectOption;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Horizontal row of option buttons. The focused option is highlighted;
/// digits pick options directly, so each button carries its ordinal hint.
pub struct SelectButtons<'a> {
    options: &'a [SelectOption],
    focused: usize,
    theme: &'a Theme,
}

impl<'a> SelectButtons<'a> {
    /// Create a select widget over the given options.
    pub fn new(options: &'a [SelectOption], theme: &'a Theme) -> Self {
        Self {
            options,
            focused: 0,
            theme,
        }
    }

    /// Set which option has focus.
    #[must_use]
    pub fn focused(mut self, focused: usize) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SelectButtons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let mut spans: Vec<Span<'_>> = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }

            let style = if i == self.focused {
                Style::default()
                    .fg(self.theme.base)
                    .bg(self.theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text).bg(self.theme.surface)
            };

            let hint = if i < 9 {
                format!("{} ", i + 1)
            } else {
                String::new()
            };
            spans.push(Span::styled(format!(" {hint}{} ", option.label), style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(options: &[SelectOption], focused: usize) -> String {
        let theme = Theme::default();
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let widget = SelectButtons::new(options, &theme).focused(focused);
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
    fn test_renders_every_option_with_hints() {
        let options = vec![SelectOption::new("Yes", 1), SelectOption::new("No", 0)];
        let content = render_to_string(&options, 0);
        assert!(content.contains("1 Yes"));
        assert!(content.contains("2 No"));
    }

    #[test]
    fn test_focused_option_uses_highlight_style() {
        let options = vec![SelectOption::new("Yes", 1), SelectOption::new("No", 0)];
        let theme = Theme::default();
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let widget = SelectButtons::new(&options, &theme).focused(1);
                frame.render_widget(widget, frame.area());
            })
            .unwrap();

        // Find the cell holding the 'N' of "No" and check its background.
        let buffer = terminal.backend().buffer();
        let row: String = (0..60)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect::<Vec<_>>()
            .join("");
        let no_col = row.find("No").expect("No rendered") as u16;
        assert_eq!(buffer[(no_col, 0)].bg, theme.primary);
    }
}

//! Frame composition: scroll bookkeeping, pane layout, help overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::app::App;
use crate::conversation::ConversationPane;
use crate::theme::Theme;
use crate::transcript::TranscriptWidget;

/// Center a fixed-size rect within `area`.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render a full frame of the app.
///
/// Updates the transcript scroll extent for the current layout before
/// drawing, so follow mode tracks content growth within the same frame.
pub fn render(app: &mut App, frame: &mut Frame<'_>) {
    let area = frame.area();

    // The pane draws a border; the content area is two cells smaller.
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    let transcript_height = ConversationPane::transcript_height(&app.sequencer, inner_height);
    let total_lines = TranscriptWidget::new(&app.sequencer, &app.transcript, &app.theme)
        .line_count(inner_width);
    app.transcript
        .set_extent(total_lines, transcript_height as usize);

    let pane = ConversationPane::new(&app.sequencer, &app.transcript, &app.input_state, &app.theme)
        .tick(app.tick);
    frame.render_widget(pane, area);

    if app.show_help {
        render_help_overlay(&app.theme, area, frame.buffer_mut());
    }
}

/// Render the help overlay on top of the current frame.
pub fn render_help_overlay(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Keys
    Type + Enter      Answer a text prompt
    1-9 or Enter      Pick an option
    Left/Right, Tab   Move between options
    j/k or Up/Down    Scroll the transcript
    f                 Toggle auto-scroll
    r                 Restart the sequence
    q / Ctrl+C        Quit
    ?                 Toggle this help

  [Press Esc to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 14.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(theme.text))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface));

    Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(theme.text).bg(theme.surface))
        .render(overlay_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_engine::{MessageSpec, Script};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_centered_fixed() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_fixed(50, 10, area);
        assert_eq!(rect, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn test_centered_fixed_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_fixed(50, 10, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 5);
    }

    #[test]
    fn test_render_frame_with_help() {
        let script = Script::from_messages(vec![MessageSpec::app("Hi")]);
        let mut app = App::new(script).unwrap();
        app.show_help = true;

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("Help"));
        assert!(text.contains("Restart the sequence"));
    }
}

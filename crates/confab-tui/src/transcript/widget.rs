//! Transcript widget for rendering revealed messages.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use confab_engine::Sequencer;

use super::state::TranscriptState;
use crate::theme::Theme;

/// Animation frames for the typing indicator.
const TYPING_FRAMES: [&str; 3] = ["\u{b7}", "\u{b7}\u{b7}", "\u{b7}\u{b7}\u{b7}"];

/// Ticks per typing-indicator frame.
const TYPING_TICK_DIV: usize = 4;

/// Transcript pane widget.
///
/// Renders every visible unit of the sequence as a column of messages,
/// app messages on the left and user messages on the right, with a
/// typing indicator while a unit's reveal is still pending. Borderless;
/// the surrounding block belongs to `ConversationPane`.
pub struct TranscriptWidget<'a> {
    sequencer: &'a Sequencer,
    state: &'a TranscriptState,
    theme: &'a Theme,
    /// Frame counter driving the typing animation.
    tick: usize,
}

impl<'a> TranscriptWidget<'a> {
    /// Create a new transcript widget.
    pub fn new(sequencer: &'a Sequencer, state: &'a TranscriptState, theme: &'a Theme) -> Self {
        Self {
            sequencer,
            state,
            theme,
            tick: 0,
        }
    }

    /// Set the animation tick.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Number of lines the transcript occupies at `width`, for scroll
    /// bookkeeping before rendering.
    pub fn line_count(&self, width: u16) -> usize {
        self.build_lines(width).len()
    }

    fn typing_frame(&self) -> &'static str {
        TYPING_FRAMES[(self.tick / TYPING_TICK_DIV) % TYPING_FRAMES.len()]
    }

    /// Build the full transcript as styled lines.
    fn build_lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = width as usize;
        let wrap_width = width.saturating_sub(4).max(1);
        let mut lines: Vec<Line<'static>> = Vec::new();

        for index in 0..self.sequencer.total_steps() {
            if !self.sequencer.is_visible(index) {
                continue;
            }
            let spec = &self.sequencer.script().messages[index];
            let pending = self
                .sequencer
                .unit(index)
                .is_some_and(|unit| unit.pending);

            if !lines.is_empty() {
                lines.push(Line::default());
            }

            if pending {
                // Typing indicator in place of the message body.
                let frame = self.typing_frame();
                let line = Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        frame.to_string(),
                        Style::default()
                            .fg(self.theme.muted)
                            .add_modifier(Modifier::DIM),
                    ),
                ]);
                if spec.is_user {
                    lines.push(line.alignment(Alignment::Right));
                } else {
                    lines.push(line);
                }
                continue;
            }

            let text = self.sequencer.display_text(index).unwrap_or_default();
            if spec.is_user {
                let style = Style::default().fg(self.theme.user);
                for wrapped in textwrap::wrap(&text, wrap_width) {
                    lines.push(
                        Line::from(Span::styled(format!("{wrapped}  "), style))
                            .alignment(Alignment::Right),
                    );
                }
            } else {
                let style = Style::default().fg(self.theme.text);
                for (i, wrapped) in textwrap::wrap(&text, wrap_width).iter().enumerate() {
                    let marker = if i == 0 { "\u{25cf} " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(
                            marker.to_string(),
                            Style::default().fg(self.theme.app),
                        ),
                        Span::styled(wrapped.to_string(), style),
                    ]));
                }
            }
        }

        lines
    }
}

impl Widget for TranscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let lines = self.build_lines(area.width);
        if lines.is_empty() {
            // The placeholder is indented two cells on each side; skip it
            // entirely when the viewport has no room for that.
            let width = area.width.saturating_sub(4);
            if width == 0 {
                return;
            }
            let empty = Line::from(Span::styled(
                "Waiting for messages",
                Style::default().fg(self.theme.muted),
            ));
            Paragraph::new(empty).render(
                Rect::new(area.x + 2, area.y + area.height / 2, width, 1),
                buf,
            );
            return;
        }

        #[allow(clippy::cast_possible_truncation)]
        let offset = self.state.scroll_offset().min(u16::MAX as usize) as u16;
        Paragraph::new(lines).scroll((offset, 0)).render(area, buf);
    }
}

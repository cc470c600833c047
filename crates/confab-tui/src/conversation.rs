//! Conversation pane widget.
//!
//! Combines the transcript (scrollable message history) with the input bar
//! that appears while a message is waiting for input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use confab_engine::Sequencer;

use crate::theme::Theme;
use crate::transcript::{TranscriptState, TranscriptWidget};
use crate::widgets::{InputBar, TextInputState, INPUT_BAR_HEIGHT};

/// Height of the completion footer line.
const FOOTER_HEIGHT: u16 = 1;

/// Conversation pane combining transcript and input bar.
///
/// ```text
/// ┌─ Conversation ──────────────────────┐
/// │ ● Welcome! What's your name?        │
/// │                                     │
/// │                              Ada    │
/// │ ● Nice to meet you, Ada.            │
/// │┌───────────────────────────────────┐│
/// ││ > Type here...                    ││
/// │└───────────────────────────────────┘│
/// └─────────────────────────────────────┘
/// ```
///
/// The input bar is present only while the sequencer has an active input;
/// otherwise the transcript takes the full height. Once the sequence is
/// complete a footer line replaces the bar.
pub struct ConversationPane<'a> {
    sequencer: &'a Sequencer,
    transcript: &'a TranscriptState,
    text_state: &'a TextInputState,
    theme: &'a Theme,
    tick: usize,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane.
    pub fn new(
        sequencer: &'a Sequencer,
        transcript: &'a TranscriptState,
        text_state: &'a TextInputState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            sequencer,
            transcript,
            text_state,
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

    /// Height in lines that the transcript gets inside an inner area of
    /// `inner_height` lines.
    ///
    /// Mirrors the layout done in `render` so the caller can update scroll
    /// extents before drawing.
    pub fn transcript_height(sequencer: &Sequencer, inner_height: u16) -> u16 {
        if sequencer.active_input().is_some() {
            inner_height.saturating_sub(INPUT_BAR_HEIGHT)
        } else if sequencer.is_complete() {
            inner_height.saturating_sub(FOOTER_HEIGHT)
        } else {
            inner_height
        }
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(
                " Sequence complete ",
                Style::default().fg(self.theme.success),
            ),
            Span::styled(
                "(r to restart, q to quit)",
                Style::default().fg(self.theme.muted),
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

impl Widget for ConversationPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let transcript_height = Self::transcript_height(self.sequencer, inner.height);
        let transcript_area = Rect::new(inner.x, inner.y, inner.width, transcript_height);

        TranscriptWidget::new(self.sequencer, self.transcript, self.theme)
            .tick(self.tick)
            .render(transcript_area, buf);

        if let Some(active) = self.sequencer.active_input() {
            if inner.height > INPUT_BAR_HEIGHT {
                let bar_area = Rect::new(
                    inner.x,
                    inner.y + transcript_height,
                    inner.width,
                    INPUT_BAR_HEIGHT,
                );
                InputBar::new(active, self.text_state, self.theme).render(bar_area, buf);
            }
        } else if self.sequencer.is_complete() && inner.height > FOOTER_HEIGHT {
            let footer_area = Rect::new(
                inner.x,
                inner.y + transcript_height,
                inner.width,
                FOOTER_HEIGHT,
            );
            self.render_footer(footer_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_engine::{InputSpec, MessageSpec, Script, SequencerConfig};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn run_out(seq: &mut Sequencer) {
        for _ in 0..200 {
            seq.tick(Duration::from_millis(50));
        }
    }

    #[test]
    fn test_pane_renders_title_and_messages() {
        let script = Script::from_messages(vec![MessageSpec::app("Hello")]);
        let mut seq = Sequencer::new(script, SequencerConfig::default()).unwrap();
        run_out(&mut seq);

        let transcript = TranscriptState::new();
        let text_state = TextInputState::new();
        let theme = Theme::default();
        let mut terminal = create_test_terminal(50, 12);

        terminal
            .draw(|frame| {
                frame.render_widget(
                    ConversationPane::new(&seq, &transcript, &text_state, &theme),
                    frame.area(),
                );
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Conversation"));
        assert!(text.contains("Hello"));
    }

    #[test]
    fn test_input_bar_present_while_input_active() {
        let script = Script::from_messages(vec![MessageSpec::prompt(
            "Your name?",
            InputSpec::text_with_placeholder("Type here"),
        )
        .with_event("name")]);
        let mut seq = Sequencer::new(script, SequencerConfig::default()).unwrap();
        run_out(&mut seq);
        assert!(seq.active_input().is_some());

        let transcript = TranscriptState::new();
        let text_state = TextInputState::new();
        let theme = Theme::default();
        let mut terminal = create_test_terminal(50, 12);

        terminal
            .draw(|frame| {
                frame.render_widget(
                    ConversationPane::new(&seq, &transcript, &text_state, &theme),
                    frame.area(),
                );
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Type here"));
    }

    #[test]
    fn test_footer_after_completion() {
        let script = Script::from_messages(vec![MessageSpec::app("Done soon")]);
        let mut seq = Sequencer::new(script, SequencerConfig::default()).unwrap();
        run_out(&mut seq);
        assert!(seq.is_complete());

        let transcript = TranscriptState::new();
        let text_state = TextInputState::new();
        let theme = Theme::default();
        let mut terminal = create_test_terminal(50, 12);

        terminal
            .draw(|frame| {
                frame.render_widget(
                    ConversationPane::new(&seq, &transcript, &text_state, &theme),
                    frame.area(),
                );
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Sequence complete"));
    }

    #[test]
    fn test_pane_minimum_size() {
        let script = Script::from_messages(vec![MessageSpec::app("Hi")]);
        let seq = Sequencer::new(script, SequencerConfig::default()).unwrap();
        let transcript = TranscriptState::new();
        let text_state = TextInputState::new();
        let theme = Theme::default();

        // Very small terminal, must not panic.
        let mut terminal = create_test_terminal(12, 3);
        terminal
            .draw(|frame| {
                frame.render_widget(
                    ConversationPane::new(&seq, &transcript, &text_state, &theme),
                    frame.area(),
                );
            })
            .unwrap();
    }

    #[test]
    fn test_pane_narrow_terminal_with_empty_script() {
        let seq = Sequencer::new(Script::new(), SequencerConfig::default()).unwrap();
        let transcript = TranscriptState::new();
        let text_state = TextInputState::new();
        let theme = Theme::default();

        // Inner width of 1 leaves no room for the empty-transcript
        // placeholder; must not panic.
        let mut terminal = create_test_terminal(3, 5);
        terminal
            .draw(|frame| {
                frame.render_widget(
                    ConversationPane::new(&seq, &transcript, &text_state, &theme),
                    frame.area(),
                );
            })
            .unwrap();
    }
}

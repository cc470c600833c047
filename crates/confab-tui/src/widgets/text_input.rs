//! Single-line text input widget for answer prompts.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// A focused single-line text field with a prompt prefix.
pub struct TextInput<'a> {
    state: &'a TextInputState,
    theme: &'a Theme,
    placeholder: Option<&'a str>,
}

impl<'a> TextInput<'a> {
    /// Create a text input widget over the given state.
    pub fn new(state: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            placeholder: None,
        }
    }

    /// Set placeholder text shown while the field is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Option<&'a str>) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let prompt = "> ";
        let mut spans = vec![Span::styled(prompt, Style::default().fg(self.theme.primary))];

        if self.state.is_empty() {
            spans.push(Span::styled("█", Style::default().fg(self.theme.text)));
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(
                    placeholder,
                    Style::default().fg(self.theme.muted),
                ));
            }
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let content = self.state.content();
        let chars: Vec<char> = content.chars().collect();
        let cursor = self.state.cursor.min(chars.len());
        let before: String = chars[..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();

        spans.push(Span::styled(
            before.clone(),
            Style::default().fg(self.theme.text),
        ));
        spans.push(Span::styled("█", Style::default().fg(self.theme.text)));
        if !after.is_empty() {
            spans.push(Span::styled(after, Style::default().fg(self.theme.text)));
        }

        // Keep the cursor in view when the content outgrows the area.
        let used = prompt.width() + before.width() + 1;
        let visible = area.width as usize;
        let scroll = used.saturating_sub(visible);

        #[allow(clippy::cast_possible_truncation)]
        Paragraph::new(Line::from(spans))
            .scroll((0, scroll as u16))
            .render(area, buf);
    }
}

/// State for a single-line text input.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content, clearing the state.
    pub fn take(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        content
    }

    /// Insert a character at the cursor position. Newlines are ignored;
    /// answers are single-line.
    pub fn insert(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let byte_idx = self.byte_index(self.cursor);
        self.content.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let byte_idx = self.byte_index(self.cursor);
        self.content.insert_str(byte_idx, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.byte_index(self.cursor);
            self.content.remove(byte_idx);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let byte_idx = self.byte_index(self.cursor);
            self.content.remove(byte_idx);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

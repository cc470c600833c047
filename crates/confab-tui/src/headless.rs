//! Headless mode for the confab TUI.
//!
//! Runs the full UI against a [`TestBackend`] with no real terminal,
//! enabling E2E testing and scripted automation. Playback runs on the
//! sequencer's logical clock, so time is advanced explicitly and every
//! run is deterministic.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use confab_engine::{Script, ScriptError, Sequencer};

use crate::app::App;
use crate::event::Action;
use crate::ui;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Tick used when advancing the logical clock.
const TICK: Duration = Duration::from_millis(50);

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Drives the app loop synchronously against a test backend.
///
/// # Example
///
/// ```
/// use confab_tui::confab_engine::{MessageSpec, Script};
/// use confab_tui::headless::HeadlessRunner;
/// use std::time::Duration;
///
/// let script = Script::from_messages(vec![MessageSpec::app("Hello")]);
/// let mut runner = HeadlessRunner::new(script).unwrap();
/// runner.advance(Duration::from_secs(5));
/// assert!(runner.contents().contains("Hello"));
/// ```
pub struct HeadlessRunner {
    app: App,
    terminal: Terminal<TestBackend>,
}

impl HeadlessRunner {
    /// Create a runner with default dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error when the script fails validation.
    pub fn new(script: Script) -> Result<Self, ScriptError> {
        Self::with_config(script, &HeadlessConfig::default())
    }

    /// Create a runner with explicit dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error when the script fails validation.
    pub fn with_config(script: Script, config: &HeadlessConfig) -> Result<Self, ScriptError> {
        let app = App::new(script)?;
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend).map_err(ScriptError::Io)?;
        let mut runner = Self { app, terminal };
        runner.draw();
        Ok(runner)
    }

    /// Advance the logical clock by `elapsed`, rendering along the way.
    pub fn advance(&mut self, elapsed: Duration) {
        let mut remaining = elapsed;
        while remaining > Duration::ZERO {
            let step = remaining.min(TICK);
            self.app.tick(step);
            remaining -= step;
        }
        self.draw();
    }

    /// Advance until the sequence completes or `limit` elapses.
    ///
    /// Returns `true` when completion was reached.
    pub fn advance_until_complete(&mut self, limit: Duration) -> bool {
        let mut spent = Duration::ZERO;
        while spent < limit {
            if self.app.sequencer.is_complete() {
                self.draw();
                return true;
            }
            self.app.tick(TICK);
            spent += TICK;
        }
        self.draw();
        self.app.sequencer.is_complete()
    }

    /// Send a decoded action.
    pub fn send_action(&mut self, action: Action) {
        self.app.handle_action(action);
        self.draw();
    }

    /// Send a raw key event through the normal key routing.
    pub fn send_key(&mut self, code: KeyCode) {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        self.draw();
    }

    /// Type a string into the active text input.
    pub fn type_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.app
                .handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        self.draw();
    }

    /// Current screen contents as text.
    pub fn contents(&self) -> String {
        buffer_to_string(self.terminal.backend().buffer())
    }

    /// The sequencer, for asserting on playback state.
    pub fn sequencer(&self) -> &Sequencer {
        &self.app.sequencer
    }

    /// Whether the UI has quit.
    pub fn has_quit(&self) -> bool {
        self.app.should_quit
    }

    fn draw(&mut self) {
        // Drawing to a TestBackend cannot fail.
        let _ = self.terminal.draw(|frame| ui::render(&mut self.app, frame));
    }
}

/// Convert a terminal buffer to a string representation.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_engine::{InputSpec, MessageSpec, SelectOption};
    use serde_json::json;

    const LIMIT: Duration = Duration::from_secs(30);

    #[test]
    fn test_plain_sequence_plays_to_completion() {
        let script = Script::from_messages(vec![
            MessageSpec::app("First"),
            MessageSpec::app("Second"),
        ]);
        let mut runner = HeadlessRunner::new(script).unwrap();

        assert!(runner.advance_until_complete(LIMIT));
        let contents = runner.contents();
        assert!(contents.contains("First"));
        assert!(contents.contains("Second"));
        assert!(contents.contains("Sequence complete"));
    }

    #[test]
    fn test_text_prompt_round_trip() {
        let script = Script::from_messages(vec![
            MessageSpec::prompt("What's your name?", InputSpec::text()).with_event("name"),
            MessageSpec::user_bound("name"),
            MessageSpec::app("Welcome aboard."),
        ]);
        let mut runner = HeadlessRunner::new(script).unwrap();

        runner.advance(Duration::from_secs(5));
        assert!(runner.sequencer().active_input().is_some());

        runner.type_str("Ada");
        runner.send_key(KeyCode::Enter);
        assert!(runner.advance_until_complete(LIMIT));

        assert_eq!(runner.sequencer().value("name"), Some(&json!("Ada")));
        // The bound message echoes the submitted text.
        assert!(runner.contents().contains("Ada"));
        assert!(runner.contents().contains("Welcome aboard."));
    }

    #[test]
    fn test_select_prompt_with_digit_key() {
        let script = Script::from_messages(vec![MessageSpec::prompt(
            "Continue?",
            InputSpec::select(vec![
                SelectOption {
                    label: "Yes".into(),
                    value: json!("yes"),
                },
                SelectOption {
                    label: "No".into(),
                    value: json!("no"),
                },
            ]),
        )
        .with_event("continue")]);
        let mut runner = HeadlessRunner::new(script).unwrap();

        runner.advance(Duration::from_secs(5));
        runner.send_key(KeyCode::Char('2'));
        assert!(runner.advance_until_complete(LIMIT));
        assert_eq!(runner.sequencer().value("continue"), Some(&json!("no")));
    }

    #[test]
    fn test_restart_action_replays() {
        let script = Script::from_messages(vec![MessageSpec::app("Once more")]);
        let mut runner = HeadlessRunner::new(script).unwrap();
        assert!(runner.advance_until_complete(LIMIT));

        runner.send_action(Action::Restart);
        assert!(!runner.sequencer().is_complete());
        assert!(runner.advance_until_complete(LIMIT));
    }

    #[test]
    fn test_quit_action() {
        let script = Script::from_messages(vec![MessageSpec::app("Bye")]);
        let mut runner = HeadlessRunner::new(script).unwrap();
        runner.send_action(Action::Quit);
        assert!(runner.has_quit());
    }
}

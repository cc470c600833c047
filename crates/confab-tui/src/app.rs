//! Application state for the confab TUI.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tracing::debug;

use confab_engine::{ActiveInput, Script, ScriptError, Sequencer, SequencerConfig, SequencerEvent};

use crate::event::{key_to_action, Action};
use crate::theme::Theme;
use crate::transcript::{TranscriptState, SCROLL_SPEED};
use crate::widgets::TextInputState;

/// Top-level application state.
///
/// Owns the sequencer and the UI-side state that the engine does not track:
/// the text field being edited, scroll position, and overlay flags.
pub struct App {
    /// Message sequencer (playback state machine).
    pub sequencer: Sequencer,
    /// Text field state while a text input is active.
    pub input_state: TextInputState,
    /// Transcript scroll state.
    pub transcript: TranscriptState,
    /// Color theme.
    pub theme: Theme,
    /// Frame counter for animations.
    pub tick: usize,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the app around a script.
    ///
    /// # Errors
    ///
    /// Returns an error when the script fails validation.
    pub fn new(script: Script) -> Result<Self, ScriptError> {
        let sequencer = Sequencer::new(script, SequencerConfig::default())?;
        Ok(Self {
            sequencer,
            input_state: TextInputState::new(),
            transcript: TranscriptState::new(),
            theme: Theme::default(),
            tick: 0,
            show_help: false,
            should_quit: false,
        })
    }

    /// Advance playback by `elapsed` and apply the resulting events.
    pub fn tick(&mut self, elapsed: Duration) {
        self.tick = self.tick.wrapping_add(1);
        self.sequencer.tick(elapsed);
        self.apply_events();
    }

    /// Drain sequencer events into UI state changes.
    fn apply_events(&mut self) {
        for event in self.sequencer.drain_events() {
            match event {
                SequencerEvent::ScrollToBottom => self.transcript.request_bottom(),
                SequencerEvent::Complete => {
                    debug!("sequence complete");
                }
                SequencerEvent::InputSubmitted { event, value, .. } => {
                    debug!(%event, %value, "input submitted");
                }
                SequencerEvent::StepStarted { .. } | SequencerEvent::InputShown { .. } => {}
            }
        }
    }

    /// Handle a key event, routing text keys to the input field when a
    /// text input has focus.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if matches!(self.sequencer.active_input(), Some(ActiveInput::Text { .. })) {
            match key.code {
                KeyCode::Char(c) => self.input_state.insert(c),
                KeyCode::Backspace => self.input_state.backspace(),
                KeyCode::Delete => self.input_state.delete(),
                KeyCode::Left => self.input_state.move_left(),
                KeyCode::Right => self.input_state.move_right(),
                KeyCode::Home => self.input_state.move_home(),
                KeyCode::End => self.input_state.move_end(),
                KeyCode::Enter => self.submit(),
                KeyCode::Up => self.transcript.scroll_up(SCROLL_SPEED),
                KeyCode::Down => self.transcript.scroll_down(SCROLL_SPEED),
                _ => {}
            }
            return;
        }

        self.handle_action(key_to_action(key));
    }

    /// Handle a decoded action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::Back => self.show_help = false,
            Action::Restart => self.restart(),
            Action::Submit => self.submit(),
            Action::Up => self.transcript.scroll_up(SCROLL_SPEED),
            Action::Down => self.transcript.scroll_down(SCROLL_SPEED),
            Action::Left => self.sequencer.focus_prev_option(),
            Action::Right => self.sequencer.focus_next_option(),
            Action::Option(n) => {
                if self.sequencer.choose(n) {
                    self.apply_events();
                }
            }
            Action::ToggleFollow => self.transcript.toggle_follow(),
            Action::None => {}
        }
    }

    /// Submit the active input, if any.
    fn submit(&mut self) {
        match self.sequencer.active_input().cloned() {
            Some(ActiveInput::Text { .. }) => {
                let value = Value::String(self.input_state.take());
                self.sequencer.submit(value);
                self.apply_events();
            }
            Some(ActiveInput::Select { focused, .. }) => {
                if self.sequencer.choose(focused) {
                    self.apply_events();
                }
            }
            // Custom inputs are satisfied by the embedder, not this UI.
            Some(ActiveInput::Custom { .. }) | None => {}
        }
    }

    /// Restart playback from the first message.
    fn restart(&mut self) {
        debug!("restarting sequence");
        self.input_state.clear();
        self.transcript.reset();
        self.sequencer.init();
        self.apply_events();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_engine::{InputSpec, MessageSpec, SelectOption};
    use serde_json::json;

    const TICK: Duration = Duration::from_millis(50);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tick_until_input(app: &mut App) {
        for _ in 0..100 {
            app.tick(TICK);
            if app.sequencer.active_input().is_some() {
                return;
            }
        }
        panic!("no input surfaced");
    }

    fn text_script() -> Script {
        Script::from_messages(vec![
            MessageSpec::prompt("Name?", InputSpec::text()).with_event("name"),
            MessageSpec::app("Thanks!"),
        ])
    }

    fn select_script() -> Script {
        Script::from_messages(vec![MessageSpec::prompt(
            "Pick one",
            InputSpec::select(vec![
                SelectOption {
                    label: "Yes".into(),
                    value: json!(true),
                },
                SelectOption {
                    label: "No".into(),
                    value: json!(false),
                },
            ]),
        )
        .with_event("answer")])
    }

    #[test]
    fn test_typed_chars_go_to_text_field() {
        let mut app = App::new(text_script()).unwrap();
        tick_until_input(&mut app);

        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(key(KeyCode::Char('!')));

        // 'q' must not quit while typing.
        assert!(!app.should_quit);
        assert_eq!(app.input_state.content(), "q!");
    }

    #[test]
    fn test_enter_submits_text_and_advances() {
        let mut app = App::new(text_script()).unwrap();
        tick_until_input(&mut app);

        app.handle_key(key(KeyCode::Char('A')));
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.input_state.is_empty());
        assert!(app.sequencer.active_input().is_none());
        assert_eq!(app.sequencer.value("name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_select_navigation_and_submit() {
        let mut app = App::new(select_script()).unwrap();
        tick_until_input(&mut app);

        app.handle_action(Action::Right);
        app.handle_action(Action::Submit);

        assert_eq!(app.sequencer.value("answer"), Some(&json!(false)));
    }

    #[test]
    fn test_digit_picks_select_option() {
        let mut app = App::new(select_script()).unwrap();
        tick_until_input(&mut app);

        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.sequencer.value("answer"), Some(&json!(true)));
    }

    #[test]
    fn test_quit_and_help_keys() {
        let mut app = App::new(Script::from_messages(vec![MessageSpec::app("Hi")])).unwrap();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        // 'q' closes help instead of quitting.
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_even_while_typing() {
        let mut app = App::new(text_script()).unwrap();
        tick_until_input(&mut app);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_restart_replays_from_start() {
        let mut app = App::new(text_script()).unwrap();
        tick_until_input(&mut app);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));
        for _ in 0..100 {
            app.tick(TICK);
        }
        assert!(app.sequencer.is_complete());

        app.handle_action(Action::Restart);
        assert!(!app.sequencer.is_complete());
        assert_eq!(app.sequencer.step(), Some(0));
        assert!(app.input_state.is_empty());
    }

    #[test]
    fn test_completion_reached_by_ticking() {
        let mut app =
            App::new(Script::from_messages(vec![MessageSpec::app("One")])).unwrap();
        for _ in 0..100 {
            app.tick(TICK);
        }
        assert!(app.sequencer.is_complete());
    }
}

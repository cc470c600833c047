//! confab-tui: Terminal UI for scripted conversations
//!
//! This crate provides the TUI layer for confab, including:
//! - Transcript pane with timed message reveal and auto-scroll
//! - Input bar for text and select prompts
//! - Help overlay and restart handling
//! - Headless mode for testing and automation

mod app;
mod conversation;
mod event;
pub mod headless;
mod theme;
mod transcript;
mod ui;
mod widgets;

pub use app::App;
pub use confab_engine;
pub use conversation::ConversationPane;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use theme::Theme;
pub use transcript::{TranscriptState, TranscriptWidget};
pub use widgets::{InputBar, SelectButtons, TextInput, TextInputState};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

use confab_engine::Script;

/// Tick rate of the playback clock. All sequencer delays are multiples
/// of this.
const TICK_RATE_MS: u64 = 50;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application over a script.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop until the user quits, and restores the terminal
/// on exit.
///
/// # Errors
///
/// Returns an error when the script fails validation or terminal setup
/// fails.
pub async fn run_tui(script: Script) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(script)?;

    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;
    app.sequencer.shutdown();

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(TICK_RATE_MS);

    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_action(Action::Up),
                    MouseEventKind::ScrollDown => app.handle_action(Action::Down),
                    _ => {}
                },
                Event::Tick => app.tick(tick),
                Event::Resize(_, _) => {
                    // Terminal handles resize automatically; scroll extents
                    // are recomputed on the next draw.
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

//! confab-engine: Headless sequencing core for scripted conversations
//!
//! This crate provides the playback logic for confab, including:
//! - Script and input-descriptor data model with construction-time validation
//! - The step-sequencing state machine (reveal, input, pacing, completion)
//! - A deterministic cancelable timer queue driven by embedder ticks

pub mod script;
pub mod sequencer;
pub mod timers;

// Re-export commonly used types
pub use script::{InputSpec, MessageSpec, Script, ScriptError, SelectOption, TEMPLATE_PLACEHOLDER};
pub use sequencer::{
    ActiveInput, Sequencer, SequencerConfig, SequencerEvent, UnitState, ADVANCE_PACING, APP_FADE,
    INPUT_DELAY, REVEAL_DELAY, SCROLL_SETTLE_DELAY, STEP_DELAY, USER_FADE,
};
pub use timers::{TimerId, TimerQueue};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}

//! The step-sequencing state machine.
//!
//! The [`Sequencer`] owns an ordered collection of message units and plays
//! them one at a time: it activates the unit at the current step, lets it
//! run its reveal timers, surfaces the unit's input control when one is
//! declared, and advances on the unit's completion signal (pacing timer or
//! input submission). All timing lives on the logical-clock
//! [`TimerQueue`], driven by [`Sequencer::tick`]; observable effects are
//! queued as [`SequencerEvent`]s for the embedder to drain.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::script::{InputSpec, MessageSpec, Script, ScriptError, SelectOption};
use crate::timers::TimerQueue;

/// Delay before an app-authored message's text reveals ("typing").
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);
/// Delay before an active unit's input control is surfaced.
pub const INPUT_DELAY: Duration = Duration::from_millis(500);
/// Delay applied inside `next()` before the step actually changes.
pub const STEP_DELAY: Duration = Duration::from_millis(500);
/// Pacing between consecutive auto-played messages.
pub const ADVANCE_PACING: Duration = Duration::from_millis(1500);
/// Settle delay after the reveal transition before scroll-to-bottom fires.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(100);
/// Reveal transition duration for user messages.
pub const USER_FADE: Duration = Duration::from_millis(50);
/// Reveal transition duration for app messages.
pub const APP_FADE: Duration = Duration::from_millis(600);

/// Construction-time options for the sequencer.
#[derive(Debug, Clone, Copy)]
pub struct SequencerConfig {
    /// Start playing immediately on construction. When false the embedder
    /// calls [`Sequencer::init`] itself.
    pub auto_run: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self { auto_run: true }
    }
}

/// Run state of a single message unit.
#[derive(Debug, Clone)]
pub struct UnitState {
    /// The unit has been activated by the sequencer.
    pub enabled: bool,
    /// Reveal animation still in progress ("typing" indicator).
    pub pending: bool,
    /// Value submitted through this unit's input, if any.
    pub value: Option<Value>,
}

impl Default for UnitState {
    fn default() -> Self {
        Self {
            enabled: false,
            pending: true,
            value: None,
        }
    }
}

/// The input control currently displayed in the input slot.
///
/// At most one input is active at a time; it is cleared whenever the step
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveInput {
    /// Free-text field.
    Text {
        index: usize,
        placeholder: Option<String>,
    },
    /// Option buttons; `focused` starts at 0 (first option).
    Select {
        index: usize,
        options: Vec<SelectOption>,
        focused: usize,
    },
    /// Embedder-supplied control; the sequencer only tracks that it is up.
    Custom { index: usize },
}

impl ActiveInput {
    /// Index of the unit this input belongs to.
    pub fn index(&self) -> usize {
        match self {
            Self::Text { index, .. } | Self::Select { index, .. } | Self::Custom { index } => {
                *index
            }
        }
    }
}

/// Observable effects, drained by the embedder each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// The step changed and the unit at `index` was activated.
    StepStarted { index: usize },
    /// An input control was surfaced for the unit at `index`.
    InputShown { index: usize },
    /// A value was submitted through the active input.
    InputSubmitted {
        index: usize,
        event: String,
        value: Value,
    },
    /// The viewport should scroll to the bottom (reveal settled).
    ScrollToBottom,
    /// All messages are exhausted. Emitted exactly once per sequence end.
    Complete,
}

/// Tasks the sequencer schedules against its own timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerTask {
    ShowInput { index: usize },
    Reveal { index: usize },
    Advance { index: usize },
    StepTo { index: usize },
    ScrollSettle,
}

/// Container that owns step progression and the active input slot.
#[derive(Debug)]
pub struct Sequencer {
    script: Script,
    units: Vec<UnitState>,
    step: Option<usize>,
    input: Option<ActiveInput>,
    /// Submitted values keyed by event name (model bindings).
    values: HashMap<String, Value>,
    timers: TimerQueue<TimerTask>,
    events: VecDeque<SequencerEvent>,
    completed: bool,
}

impl Sequencer {
    /// Validate the script and build a sequencer. With `auto_run` (the
    /// default) the sequence starts immediately.
    pub fn new(script: Script, config: SequencerConfig) -> Result<Self, ScriptError> {
        script.validate()?;
        let units = vec![UnitState::default(); script.len()];
        let mut sequencer = Self {
            script,
            units,
            step: None,
            input: None,
            values: HashMap::new(),
            timers: TimerQueue::new(),
            events: VecDeque::new(),
            completed: false,
        };
        if config.auto_run {
            sequencer.init();
        }
        Ok(sequencer)
    }

    /// (Re)start the sequence from the first message.
    ///
    /// Resets every unit, cancels outstanding timers, and activates unit 0.
    /// An empty script completes immediately.
    pub fn init(&mut self) {
        self.timers.clear();
        self.events.clear();
        self.units = vec![UnitState::default(); self.script.len()];
        self.values.clear();
        self.input = None;
        self.completed = false;

        if self.script.is_empty() {
            self.emit_complete();
            return;
        }
        self.step = Some(0);
        self.events.push_back(SequencerEvent::StepStarted { index: 0 });
        self.run_unit(0);
    }

    /// Advance the logical clock and process every timer that came due.
    pub fn tick(&mut self, elapsed: Duration) {
        for task in self.timers.advance(elapsed) {
            self.handle_task(task);
        }
    }

    /// Drain queued events.
    pub fn drain_events(&mut self) -> Vec<SequencerEvent> {
        self.events.drain(..).collect()
    }

    /// Clear the active input and move to the next step after [`STEP_DELAY`],
    /// or emit [`SequencerEvent::Complete`] when no further steps exist.
    pub fn next(&mut self) {
        if self.completed {
            return;
        }
        self.input = None;

        if self.script.is_empty() {
            self.emit_complete();
            return;
        }

        let next_step = self.step.map_or(0, |s| s + 1);
        if next_step < self.script.len() {
            self.timers
                .schedule(STEP_DELAY, TimerTask::StepTo { index: next_step });
        } else {
            self.emit_complete();
        }
    }

    /// Submit a value through the active input.
    ///
    /// Stores the value on the unit, records it under the unit's event name,
    /// emits exactly one [`SequencerEvent::InputSubmitted`], and triggers
    /// exactly one advancement. Returns false (and does nothing) when no
    /// input is active.
    pub fn submit(&mut self, value: Value) -> bool {
        let Some(active) = self.input.take() else {
            warn!("submit with no active input ignored");
            return false;
        };
        let index = active.index();
        let event = self.script.messages[index].event.clone();
        debug!(index, %event, "input submitted");

        self.units[index].value = Some(value.clone());
        self.values.insert(event.clone(), value.clone());
        self.events
            .push_back(SequencerEvent::InputSubmitted { index, event, value });
        self.next();
        true
    }

    /// Pick a select option by position. Returns false when the active
    /// input is not a select or the position is out of range.
    pub fn choose(&mut self, option: usize) -> bool {
        let value = match &self.input {
            Some(ActiveInput::Select { options, .. }) => {
                options.get(option).map(|o| o.value.clone())
            }
            _ => None,
        };
        match value {
            Some(value) => self.submit(value),
            None => false,
        }
    }

    /// Move select focus to the next option (wrapping).
    pub fn focus_next_option(&mut self) {
        if let Some(ActiveInput::Select {
            options, focused, ..
        }) = &mut self.input
        {
            *focused = (*focused + 1) % options.len();
        }
    }

    /// Move select focus to the previous option (wrapping).
    pub fn focus_prev_option(&mut self) {
        if let Some(ActiveInput::Select {
            options, focused, ..
        }) = &mut self.input
        {
            *focused = (*focused + options.len() - 1) % options.len();
        }
    }

    /// Append a message to the owned collection.
    ///
    /// Re-opens a completed sequence: the next sequence end emits another
    /// `Complete`. The embedder resumes with [`Sequencer::next`].
    pub fn append(&mut self, message: MessageSpec) -> Result<(), ScriptError> {
        message.validate()?;
        self.script.push(message);
        self.units.push(UnitState::default());
        if self.completed {
            self.completed = false;
        }
        Ok(())
    }

    /// Cancel all outstanding timers. Call on teardown so no stale
    /// callback fires against a dead sequence.
    pub fn shutdown(&mut self) {
        self.timers.clear();
    }

    // === Accessors ===

    /// Current step index, unset before the first run.
    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// Number of message units.
    pub fn total_steps(&self) -> usize {
        self.script.len()
    }

    /// The currently displayed input control, if any.
    pub fn active_input(&self) -> Option<&ActiveInput> {
        self.input.as_ref()
    }

    /// Whether the sequence has ended.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// The script being played.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Run state of the unit at `index`.
    pub fn unit(&self, index: usize) -> Option<&UnitState> {
        self.units.get(index)
    }

    /// Value recorded under an event name (model binding).
    pub fn value(&self, event: &str) -> Option<&Value> {
        self.values.get(event)
    }

    /// Whether any timers are outstanding (teardown diagnostics).
    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Whether the unit at `index` should be rendered: activated, and
    /// either it resolves to some text or it is a user message.
    pub fn is_visible(&self, index: usize) -> bool {
        let Some(unit) = self.units.get(index) else {
            return false;
        };
        let Some(spec) = self.script.messages.get(index) else {
            return false;
        };
        unit.enabled && (self.resolve_text(spec).is_some() || spec.is_user)
    }

    /// Rendered display text for the unit at `index`: the message text (or
    /// its bound value) substituted into the template.
    pub fn display_text(&self, index: usize) -> Option<String> {
        let spec = self.script.messages.get(index)?;
        let text = self.resolve_text(spec)?;
        Some(spec.render(&text))
    }

    // === Internals ===

    fn resolve_text(&self, spec: &MessageSpec) -> Option<String> {
        if let Some(text) = &spec.text {
            return Some(text.clone());
        }
        let bound = self.values.get(spec.bind.as_deref()?)?;
        Some(match bound {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn emit_complete(&mut self) {
        if !self.completed {
            self.completed = true;
            debug!("sequence complete");
            self.events.push_back(SequencerEvent::Complete);
        }
    }

    /// Activate the unit at `index`: schedule its input display and text
    /// reveal. User messages reveal with zero delay, app messages after
    /// [`REVEAL_DELAY`].
    fn run_unit(&mut self, index: usize) {
        let spec = &self.script.messages[index];
        let is_user = spec.is_user;
        let has_input = spec.has_input();
        debug!(index, is_user, has_input, "unit activated");

        self.units[index].enabled = true;

        if has_input {
            self.timers
                .schedule(INPUT_DELAY, TimerTask::ShowInput { index });
        }

        if is_user {
            self.reveal(index);
        } else {
            self.timers
                .schedule(REVEAL_DELAY, TimerTask::Reveal { index });
        }
    }

    /// Clear the pending state. Schedules the post-transition scroll and,
    /// for units with no input requirement, the pacing advancement.
    fn reveal(&mut self, index: usize) {
        let spec = &self.script.messages[index];
        let fade = if spec.is_user { USER_FADE } else { APP_FADE };
        let has_input = spec.has_input();

        self.units[index].pending = false;
        self.timers
            .schedule(fade + SCROLL_SETTLE_DELAY, TimerTask::ScrollSettle);
        if !has_input {
            self.timers
                .schedule(ADVANCE_PACING, TimerTask::Advance { index });
        }
    }

    fn apply_step(&mut self, index: usize) {
        // Clear the input and any timers still scoped to the previous unit
        // before the newly active unit runs.
        self.input = None;
        self.timers.clear();
        self.step = Some(index);
        self.events
            .push_back(SequencerEvent::StepStarted { index });
        self.run_unit(index);
    }

    fn show_input(&mut self, index: usize) {
        let spec = &self.script.messages[index];
        let active = if spec.custom {
            ActiveInput::Custom { index }
        } else {
            match &spec.input {
                Some(InputSpec::Text { placeholder, .. }) => ActiveInput::Text {
                    index,
                    placeholder: placeholder.clone(),
                },
                Some(InputSpec::Select { options }) => ActiveInput::Select {
                    index,
                    options: options.clone(),
                    focused: 0,
                },
                // run_unit only schedules ShowInput when has_input is true.
                None => return,
            }
        };
        self.input = Some(active);
        self.events.push_back(SequencerEvent::InputShown { index });
    }

    fn handle_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::ShowInput { index } if self.step == Some(index) => {
                self.show_input(index);
            }
            TimerTask::Reveal { index } if self.step == Some(index) => {
                self.reveal(index);
            }
            TimerTask::Advance { index } if self.step == Some(index) => {
                self.next();
            }
            TimerTask::StepTo { index } => {
                self.apply_step(index);
            }
            TimerTask::ScrollSettle => {
                self.events.push_back(SequencerEvent::ScrollToBottom);
            }
            // Task scoped to a unit that is no longer current.
            TimerTask::ShowInput { .. } | TimerTask::Reveal { .. } | TimerTask::Advance { .. } => {}
        }
    }
}

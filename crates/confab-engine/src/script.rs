//! Script data model for confab conversations.
//!
//! A script is an ordered list of message specs. Each message carries its
//! display text (or a binding to a previously submitted value), an optional
//! input descriptor, and a render template. Validation happens at
//! construction time; an invalid descriptor is a hard error, never a
//! silently dropped input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Placeholder that every message template must contain.
pub const TEMPLATE_PLACEHOLDER: &str = "{text}";

/// Default event name under which submitted values are reported.
fn default_event() -> String {
    "input".to_string()
}

fn default_template() -> String {
    TEMPLATE_PLACEHOLDER.to_string()
}

/// Error type for script construction and validation.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("unsupported input tag: {0:?}")]
    UnsupportedInputTag(String),

    #[error("select input requires at least one option")]
    EmptySelectOptions,

    #[error("template {0:?} is missing the {{text}} placeholder")]
    MissingPlaceholder(String),

    #[error("message {index}: {source}")]
    Message {
        index: usize,
        #[source]
        source: Box<ScriptError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One selectable option of a `select` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Label rendered on the option button.
    pub label: String,
    /// Value reported when this option is picked.
    pub value: Value,
}

impl SelectOption {
    /// Create an option from a label and any JSON-representable value.
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Declarative descriptor for an input control.
///
/// Only two variants exist; anything else is refused at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum InputSpec {
    /// Free-text field. Extra attributes (placeholder text and the like)
    /// ride along for the renderer.
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(flatten)]
        attrs: BTreeMap<String, String>,
    },
    /// Multiple choice: one button per option, first one focused.
    Select { options: Vec<SelectOption> },
}

impl InputSpec {
    /// Build a text input descriptor.
    pub fn text() -> Self {
        Self::Text {
            placeholder: None,
            attrs: BTreeMap::new(),
        }
    }

    /// Build a text input descriptor with a placeholder.
    pub fn text_with_placeholder(placeholder: impl Into<String>) -> Self {
        Self::Text {
            placeholder: Some(placeholder.into()),
            attrs: BTreeMap::new(),
        }
    }

    /// Build a select input descriptor.
    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::Select { options }
    }

    /// Parse a descriptor from a raw JSON value.
    ///
    /// Unlike plain deserialization this reports an unsupported `tag` as
    /// [`ScriptError::UnsupportedInputTag`] and runs validation, so a bad
    /// descriptor fails loudly at construction time.
    pub fn from_value(value: &Value) -> Result<Self, ScriptError> {
        let tag = value.get("tag").and_then(Value::as_str).unwrap_or("");
        match tag {
            "text" | "select" => {
                let spec: Self = serde_json::from_value(value.clone())?;
                spec.validate()?;
                Ok(spec)
            }
            other => Err(ScriptError::UnsupportedInputTag(other.to_string())),
        }
    }

    /// Validate the descriptor.
    pub fn validate(&self) -> Result<(), ScriptError> {
        match self {
            Self::Text { .. } => Ok(()),
            Self::Select { options } => {
                if options.is_empty() {
                    Err(ScriptError::EmptySelectOptions)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A single message in the played sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSpec {
    /// Display text. May be absent when `bind` supplies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Render template; must contain the `{text}` placeholder.
    #[serde(default = "default_template")]
    pub template: String,

    /// Whether this message is authored by the user (right side, instant
    /// reveal) rather than the app.
    #[serde(default)]
    pub is_user: bool,

    /// Input descriptor, if this message pauses for input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputSpec>,

    /// True when the embedder supplies its own input control for this
    /// message instead of a descriptor.
    #[serde(default)]
    pub custom: bool,

    /// Event name whose submitted value supplies the text when `text` is
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// Name under which this message's submitted value is reported.
    #[serde(default = "default_event")]
    pub event: String,
}

impl Default for MessageSpec {
    fn default() -> Self {
        Self {
            text: None,
            template: default_template(),
            is_user: false,
            input: None,
            custom: false,
            bind: None,
            event: default_event(),
        }
    }
}

impl MessageSpec {
    /// An app-authored message with the given text.
    pub fn app(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A user-authored message with the given text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_user: true,
            ..Self::default()
        }
    }

    /// A user-authored message that echoes a previously submitted value.
    pub fn user_bound(event: impl Into<String>) -> Self {
        Self {
            is_user: true,
            bind: Some(event.into()),
            ..Self::default()
        }
    }

    /// An app-authored message that pauses for the given input.
    pub fn prompt(text: impl Into<String>, input: InputSpec) -> Self {
        Self {
            text: Some(text.into()),
            input: Some(input),
            ..Self::default()
        }
    }

    /// Set the render template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the event name for reported values.
    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    /// Whether this message has any input requirement (descriptor or
    /// embedder-supplied control).
    pub fn has_input(&self) -> bool {
        self.custom || self.input.is_some()
    }

    /// Validate template and input descriptor.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if !self.template.contains(TEMPLATE_PLACEHOLDER) {
            return Err(ScriptError::MissingPlaceholder(self.template.clone()));
        }
        if let Some(input) = &self.input {
            input.validate()?;
        }
        Ok(())
    }

    /// Render the template with the given text substituted for `{text}`.
    pub fn render(&self, text: &str) -> String {
        self.template.replace(TEMPLATE_PLACEHOLDER, text)
    }
}

/// An ordered script of messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub messages: Vec<MessageSpec>,
}

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a script from a list of messages.
    pub fn from_messages(messages: Vec<MessageSpec>) -> Self {
        Self { messages }
    }

    /// Load and validate a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        let script: Self = serde_json::from_str(&content)?;
        script.validate()?;
        Ok(script)
    }

    /// Append a message.
    pub fn push(&mut self, message: MessageSpec) {
        self.messages.push(message);
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the script has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Validate every message, reporting the index of the first offender.
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, message) in self.messages.iter().enumerate() {
            message.validate().map_err(|source| ScriptError::Message {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_render() {
        let msg = MessageSpec::app("Bob").with_template("Hi {text}!");
        assert_eq!(msg.render("Bob"), "Hi Bob!");
    }

    #[test]
    fn test_default_template_is_passthrough() {
        let msg = MessageSpec::app("hello");
        assert_eq!(msg.render("hello"), "hello");
    }

    #[test]
    fn test_template_without_placeholder_fails() {
        let msg = MessageSpec::app("x").with_template("no placeholder");
        assert!(matches!(
            msg.validate(),
            Err(ScriptError::MissingPlaceholder(_))
        ));
    }

    #[test]
    fn test_select_with_empty_options_fails() {
        let input = InputSpec::select(vec![]);
        assert!(matches!(
            input.validate(),
            Err(ScriptError::EmptySelectOptions)
        ));
    }

    #[test]
    fn test_select_with_options_succeeds() {
        let input = InputSpec::select(vec![
            SelectOption::new("Yes", 1),
            SelectOption::new("No", 0),
        ]);
        assert!(input.validate().is_ok());
        let InputSpec::Select { options } = input else {
            panic!("expected select");
        };
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Yes");
        assert_eq!(options[0].value, json!(1));
    }

    #[test]
    fn test_unsupported_tag_fails() {
        let raw = json!({ "tag": "checkbox" });
        assert!(matches!(
            InputSpec::from_value(&raw),
            Err(ScriptError::UnsupportedInputTag(tag)) if tag == "checkbox"
        ));
    }

    #[test]
    fn test_from_value_parses_text_with_placeholder() {
        let raw = json!({ "tag": "text", "placeholder": "Your name" });
        let spec = InputSpec::from_value(&raw).expect("parse text input");
        let InputSpec::Text { placeholder, .. } = spec else {
            panic!("expected text");
        };
        assert_eq!(placeholder.as_deref(), Some("Your name"));
    }

    #[test]
    fn test_from_value_rejects_empty_select() {
        let raw = json!({ "tag": "select", "options": [] });
        assert!(matches!(
            InputSpec::from_value(&raw),
            Err(ScriptError::EmptySelectOptions)
        ));
    }

    #[test]
    fn test_script_json_round_trip() {
        let script = Script::from_messages(vec![
            MessageSpec::app("Welcome!"),
            MessageSpec::prompt("What's your name?", InputSpec::text()).with_event("name"),
            MessageSpec::user_bound("name").with_template("I'm {text}"),
        ]);
        let json = serde_json::to_string(&script).expect("serialize script");
        let restored: Script = serde_json::from_str(&json).expect("deserialize script");
        assert_eq!(script, restored);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn test_script_validate_reports_index() {
        let script = Script::from_messages(vec![
            MessageSpec::app("fine"),
            MessageSpec::app("broken").with_template("oops"),
        ]);
        match script.validate() {
            Err(ScriptError::Message { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected message error, got {other:?}"),
        }
    }

    #[test]
    fn test_script_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.json");
        let content = r#"{
            "messages": [
                { "text": "Hello" },
                { "text": "Pick one", "input": { "tag": "select", "options": [
                    { "label": "A", "value": "a" }
                ] } }
            ]
        }"#;
        std::fs::write(&path, content).expect("write script");

        let script = Script::load(&path).expect("load script");
        assert_eq!(script.len(), 2);
        assert!(script.messages[1].has_input());
    }

    #[test]
    fn test_script_load_rejects_bad_descriptor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        let content = r#"{
            "messages": [
                { "text": "Pick", "input": { "tag": "select", "options": [] } }
            ]
        }"#;
        std::fs::write(&path, content).expect("write script");

        assert!(Script::load(&path).is_err());
    }

    #[test]
    fn test_has_input() {
        assert!(!MessageSpec::app("x").has_input());
        assert!(MessageSpec::prompt("x", InputSpec::text()).has_input());
        let custom = MessageSpec {
            custom: true,
            ..MessageSpec::default()
        };
        assert!(custom.has_input());
    }
}

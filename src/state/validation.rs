//! Per-field rules and the validation pass that turns them into messages

use std::fmt;
use std::rc::Rc;

use super::value::FormValue;

/// What a custom validator has to say about a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Valid; the built-in rules are skipped
    Pass,
    /// Invalid with a user-facing message
    Fail(String),
    /// No opinion; the built-in rules still run
    Abstain,
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Abstain
        }
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Verdict::Fail(message.to_string())
    }
}

impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Verdict::Fail(message)
    }
}

impl From<Option<String>> for Verdict {
    fn from(message: Option<String>) -> Self {
        message.map_or(Verdict::Abstain, Verdict::Fail)
    }
}

/// Custom predicate: `(value, whole tree) -> verdict`
pub type Validator = Rc<dyn Fn(&FormValue, &FormValue) -> Verdict>;
/// Side effect run with the freshly written value
pub type ChangeHook = Rc<dyn Fn(&FormValue)>;
/// Side effect run on blur or layout
pub type EventHook = Rc<dyn Fn()>;

/// Validation rules and pass-through hooks for one field
#[derive(Clone, Default)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub validate: Option<Validator>,
    pub on_change: Option<ChangeHook>,
    pub on_blur: Option<EventHook>,
    pub on_layout: Option<EventHook>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn validate<F, V>(mut self, f: F) -> Self
    where
        F: Fn(&FormValue, &FormValue) -> V + 'static,
        V: Into<Verdict>,
    {
        self.validate = Some(Rc::new(move |value: &FormValue, all: &FormValue| -> Verdict {
            f(value, all).into()
        }));
        self
    }

    pub fn on_change(mut self, f: impl Fn(&FormValue) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl Fn() + 'static) -> Self {
        self.on_blur = Some(Rc::new(f));
        self
    }

    pub fn on_layout(mut self, f: impl Fn() + 'static) -> Self {
        self.on_layout = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("validate", &self.validate.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_layout", &self.on_layout.is_some())
            .finish()
    }
}

/// Check `value` for field `key` against `rules`.
///
/// The custom validator runs first. A `Pass` from it ends the check, a
/// non-empty `Fail` becomes the message, anything else falls through to
/// `required`, then `min_length`, then `max_length`. The first failure wins.
/// Lengths count characters of the value's text rendering.
pub fn validate(
    key: &str,
    rules: &FieldRules,
    value: &FormValue,
    all: &FormValue,
) -> Option<String> {
    if let Some(validator) = &rules.validate {
        match validator(value, all) {
            Verdict::Pass => return None,
            Verdict::Fail(message) if !message.is_empty() => return Some(message),
            Verdict::Fail(_) | Verdict::Abstain => {}
        }
    }

    if rules.required && !value.is_truthy() {
        return Some(format!("{key} is required"));
    }

    let len = value.to_text().chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            return Some(format!("{key} should be more than {min}"));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Some(format!("{key} should be less than {max}"));
        }
    }

    None
}

//! Field binders: ready-to-attach wiring for one input
//!
//! A binding snapshots what an input needs to render (value, hints, return
//! key) and routes the input's events back into the owning [`Form`]:
//! change, blur, layout, submit-editing and element attachment.

mod hints;

pub use hints::{Capitalize, FieldKind, InputHints, KeyboardType};

use std::rc::Rc;

use crate::focus::{ElementHandle, FocusOutcome, FormContext, FormIndex, Ordinal};
use crate::form::Form;
use crate::state::{FieldRules, FormValue};

/// Label of the return key on a text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnKey {
    /// Platform default; submitting falls through to the form's own submit
    #[default]
    Default,
    /// Moves focus to the next field
    Next,
}

/// Submit-editing handler of a field that is not last in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChainHandler {
    form_index: FormIndex,
    key: String,
}

impl FocusChainHandler {
    pub fn fire(&self, context: &FormContext) -> FocusOutcome {
        debug_assert_eq!(
            context.form_index(),
            self.form_index,
            "focus chain handler fired through another form's context"
        );
        context.focus_next(&self.key)
    }
}

/// Binding for a text-shaped input
#[derive(Debug, Clone)]
pub struct TextField {
    pub key: String,
    pub kind: FieldKind,
    pub test_id: String,
    pub value: String,
    pub hints: InputHints,
    pub return_key: ReturnKey,
    pub blur_on_submit: bool,
    /// `None` for the last live field of the tree
    pub focus_chain: Option<FocusChainHandler>,
    rules: Rc<FieldRules>,
}

impl TextField {
    pub(crate) fn new(form: &Form, kind: FieldKind, key: &str, rules: FieldRules) -> Self {
        let context = form.context();
        let last = context.is_last(key);
        let value = form
            .value(key)
            .map(|v| v.to_text().into_owned())
            .unwrap_or_default();

        Self {
            key: key.to_string(),
            kind,
            test_id: key.to_string(),
            value,
            hints: kind.hints(),
            return_key: if last { ReturnKey::Default } else { ReturnKey::Next },
            blur_on_submit: last,
            focus_chain: (!last).then(|| FocusChainHandler {
                form_index: context.form_index(),
                key: key.to_string(),
            }),
            rules: Rc::new(rules),
        }
    }

    /// Report the input element, or `None` once it is gone
    pub fn attach(&self, form: &Form, element: Option<ElementHandle>) -> Option<Ordinal> {
        form.context().attach(&self.key, element)
    }

    /// Feed new input text into the form.
    ///
    /// Numeric kinds ignore empty or unparseable text and keep the last
    /// stored number.
    pub fn change_text(&self, form: &mut Form, text: &str) {
        let value = if self.kind.is_numeric() {
            match text.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => FormValue::Number(n),
                _ => {
                    tracing::trace!("`{}` ignoring non-numeric input {text:?}", self.key);
                    return;
                }
            }
        } else {
            FormValue::Text(text.to_string())
        };
        form.store_mut()
            .change_value(&self.key, value, Some(&self.rules));
    }

    pub fn blur(&self, form: &mut Form) {
        if let Some(hook) = &self.rules.on_blur {
            hook();
        }
        form.set_touched(&self.key, true);
    }

    /// Re-check the field once its input has been laid out
    pub fn layout(&self, form: &mut Form) {
        if let Some(hook) = &self.rules.on_layout {
            hook();
        }
        form.store_mut().recheck(&self.key, Some(&self.rules));
    }

    /// Return key pressed. `None` when no focus-chain handler is attached.
    pub fn submit_editing(&self, form: &Form) -> Option<FocusOutcome> {
        self.focus_chain
            .as_ref()
            .map(|handler| handler.fire(form.context()))
    }
}

/// Binding for a non-text control such as a select or a toggle
#[derive(Debug, Clone)]
pub struct RawField {
    pub key: String,
    pub value: FormValue,
    rules: Rc<FieldRules>,
}

impl RawField {
    pub(crate) fn new(form: &Form, key: &str, rules: FieldRules) -> Self {
        Self {
            key: key.to_string(),
            value: form.value(key).cloned().unwrap_or_default(),
            rules: Rc::new(rules),
        }
    }

    /// Store `value` as-is and mark the field touched
    pub fn change(&self, form: &mut Form, value: impl Into<FormValue>) {
        form.set_touched(&self.key, true);
        form.store_mut()
            .change_value(&self.key, value.into(), Some(&self.rules));
    }
}

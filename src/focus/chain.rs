//! Focus chain resolution: which field "submit" on a field moves focus to

use std::cell::RefCell;

use super::registry::{FieldRegistry, FormIndex, LiveField};

/// What happened when focus was advanced from a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus moved to this field and the current field was blurred
    Moved { form_index: FormIndex, key: String },
    /// No eligible field follows; the current field was blurred
    Exhausted,
    /// The current field is not registered; nothing was touched
    Unknown,
}

/// Whether `(form_index, key)` is the last live field of the whole tree.
///
/// "Last" follows chain order (form index, then ordinal), so a root field
/// registered after a nested form's fields is not last.
pub fn is_last(registry: &FieldRegistry, form_index: FormIndex, key: &str) -> bool {
    registry.last_live() == Some((form_index, key))
}

/// First enabled, editable live field after `(form_index, key)` in chain order.
///
/// The current field does not have to be attached, only registered.
pub fn resolve_next(
    registry: &FieldRegistry,
    form_index: FormIndex,
    key: &str,
) -> Option<LiveField> {
    let ordinal = registry.ordinal(form_index, key)?;
    let current = (form_index, ordinal);

    registry
        .live_fields()
        .into_iter()
        .skip_while(|f| (f.form_index, f.ordinal) <= current)
        .find(|f| !f.element.is_disabled() && f.element.is_editable())
}

/// Focus the next eligible field, then blur the current one.
///
/// The registry borrow is released before any element is called so element
/// callbacks can safely reach back into the form tree.
pub fn advance(
    registry: &RefCell<FieldRegistry>,
    form_index: FormIndex,
    key: &str,
) -> FocusOutcome {
    let (next, current) = {
        let registry = registry.borrow();
        if registry.ordinal(form_index, key).is_none() {
            tracing::debug!("focus chain: `{key}` in form {form_index} is not registered");
            return FocusOutcome::Unknown;
        }
        (
            resolve_next(&registry, form_index, key),
            registry.element(form_index, key),
        )
    };

    let outcome = match next {
        Some(next) => {
            tracing::debug!(
                "focus chain: `{key}` -> `{}` (form {})",
                next.key,
                next.form_index
            );
            next.element.focus();
            FocusOutcome::Moved {
                form_index: next.form_index,
                key: next.key,
            }
        }
        None => FocusOutcome::Exhausted,
    };
    if let Some(current) = current {
        current.blur();
    }
    outcome
}

//! Form state store: values, errors, touch state and submit gating

use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::path;
use super::scheduler::TaskQueue;
use super::validation::{validate, FieldRules};
use super::value::FormValue;

type Callback = Box<dyn Fn(&FormValue)>;

/// Callbacks supplied when a form is created
#[derive(Default)]
pub struct FormOptions {
    on_change: Option<Callback>,
    on_submit: Option<Callback>,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the full tree after every accepted value change, one turn later
    pub fn on_change(mut self, f: impl Fn(&FormValue) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Called with the full tree when `submit` finds no outstanding errors
    pub fn on_submit(mut self, f: impl Fn(&FormValue) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("on_change", &self.on_change.is_some())
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

/// Error messages by field key.
///
/// An entry of `None` means the field was checked and found valid; a missing
/// entry means it was never checked. Both read as "no error". Empty messages
/// are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<String, Option<String>>,
}

impl ErrorMap {
    /// The active message for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|e| e.as_deref())
    }

    /// Number of fields with an active message
    pub fn outstanding(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }

    /// Iterate over `(key, message)` for fields with an active message
    pub fn messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, e)| e.as_deref().map(|m| (k.as_str(), m)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `error` for `key`, returning whether anything changed
    fn set(&mut self, key: &str, error: Option<String>) -> bool {
        let error = error.filter(|m| !m.is_empty());
        if self.entries.get(key) == Some(&error) {
            return false;
        }
        self.entries.insert(key.to_string(), error);
        true
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// `on_submit` was called
    Submitted,
    /// Errors were outstanding; `on_submit` was not called
    Blocked { outstanding: usize },
}

/// State owned by one mounted form instance
pub struct FormStore {
    values: FormValue,
    errors: ErrorMap,
    touched: BTreeMap<String, bool>,
    was_submitted: bool,
    options: Rc<FormOptions>,
    tasks: TaskQueue,
}

impl FormStore {
    /// Seed a store from `initial`. Change notifications go through `tasks`.
    pub fn new(initial: FormValue, options: FormOptions, tasks: TaskQueue) -> Self {
        Self {
            values: initial,
            errors: ErrorMap::default(),
            touched: BTreeMap::new(),
            was_submitted: false,
            options: Rc::new(options),
            tasks,
        }
    }

    pub fn values(&self) -> &FormValue {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&FormValue> {
        path::get(&self.values, key)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    pub fn touched(&self) -> &BTreeMap<String, bool> {
        &self.touched
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.get(key).copied().unwrap_or(false)
    }

    pub fn was_submitted(&self) -> bool {
        self.was_submitted
    }

    /// Write `value` at `key` unless it is already stored there
    pub fn set_field(&mut self, key: &str, value: impl Into<FormValue>) {
        let value = value.into();
        if self.value(key) == Some(&value) {
            return;
        }
        self.change_value(key, value, None);
    }

    /// Replace the whole tree. No validation, no change notification.
    pub fn set_values(&mut self, values: FormValue) {
        if values != self.values {
            self.values = values;
        }
    }

    /// Accept a new value for `key`.
    ///
    /// Writes the tree, runs the field's change hook, re-validates `key`
    /// against the tree as it was before this write, then queues `on_change`
    /// with the new tree.
    pub fn change_value(&mut self, key: &str, value: FormValue, rules: Option<&FieldRules>) {
        let next = match path::set(&self.values, key, value.clone()) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!("rejected write to `{key}`: {err}");
                return;
            }
        };

        if let Some(hook) = rules.and_then(|r| r.on_change.as_ref()) {
            hook(&value);
        }

        let previous = std::mem::replace(&mut self.values, next);
        self.check_error(key, rules, &value, &previous);
        self.notify_change();
    }

    /// Re-validate `key` against the current tree
    pub fn recheck(&mut self, key: &str, rules: Option<&FieldRules>) {
        let missing = FormValue::Null;
        let value = self.value(key).unwrap_or(&missing);
        let error = rules.and_then(|r| validate(key, r, value, &self.values));
        self.set_error(key, error);
    }

    fn check_error(
        &mut self,
        key: &str,
        rules: Option<&FieldRules>,
        value: &FormValue,
        all: &FormValue,
    ) {
        let error = rules.and_then(|r| validate(key, r, value, all));
        self.set_error(key, error);
    }

    fn notify_change(&self) {
        if self.options.on_change.is_none() {
            return;
        }
        let options: Weak<FormOptions> = Rc::downgrade(&self.options);
        let snapshot = self.values.clone();
        self.tasks.defer(move || match options.upgrade() {
            Some(options) => {
                if let Some(on_change) = &options.on_change {
                    on_change(&snapshot);
                }
            }
            None => tracing::trace!("form dropped before change notification ran"),
        });
    }

    pub fn set_touched(&mut self, key: &str, touched: bool) {
        if self.touched.get(key) == Some(&touched) {
            return;
        }
        self.touched.insert(key.to_string(), touched);
    }

    /// Set or clear the message for `key`. `None` and `""` mean "no error".
    pub fn set_error(&mut self, key: &str, error: Option<String>) {
        self.errors.set(key, error);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Mark the form submitted and call `on_submit` if no errors are outstanding
    pub fn submit(&mut self) -> SubmitOutcome {
        self.was_submitted = true;

        let outstanding = self.errors.outstanding();
        if outstanding > 0 {
            tracing::debug!("submit blocked by {outstanding} field error(s)");
            return SubmitOutcome::Blocked { outstanding };
        }

        if let Some(on_submit) = &self.options.on_submit {
            on_submit(&self.values);
        }
        SubmitOutcome::Submitted
    }

    /// Whether an error for `key` should be shown.
    ///
    /// Errors stay hidden until the field is touched or the form was submitted.
    pub fn has_error(&self, key: &str) -> bool {
        if !(self.is_touched(key) || self.was_submitted) {
            return false;
        }
        self.errors.get(key).is_some()
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormStore")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("touched", &self.touched)
            .field("was_submitted", &self.was_submitted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::validation::Verdict;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<FormValue>>>;

    fn initial() -> FormValue {
        FormValue::from_json(json!({
            "email": "",
            "password": "",
            "nested": { "objectProperty": "" }
        }))
        .unwrap()
    }

    fn store_with_logs() -> (FormStore, TaskQueue, Log, Log) {
        let changes: Log = Rc::default();
        let submits: Log = Rc::default();
        let (c, s) = (changes.clone(), submits.clone());
        let options = FormOptions::new()
            .on_change(move |v| c.borrow_mut().push(v.clone()))
            .on_submit(move |v| s.borrow_mut().push(v.clone()));
        let tasks = TaskQueue::new();
        let store = FormStore::new(initial(), options, tasks.clone());
        (store, tasks, changes, submits)
    }

    mod has_error {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_hidden_until_touched_or_submitted() {
            let (mut store, ..) = store_with_logs();
            store.set_error("email", Some("email is required".into()));
            assert!(!store.has_error("email"));
            assert!(!store.has_error("password"));
        }

        #[test]
        fn test_visible_after_touch() {
            let (mut store, ..) = store_with_logs();
            store.set_error("email", Some("bad".into()));
            store.set_touched("email", true);
            assert!(store.has_error("email"));

            store.set_touched("password", true);
            assert!(!store.has_error("password"));
        }

        #[test]
        fn test_visible_after_submit() {
            let (mut store, ..) = store_with_logs();
            store.set_error("email", Some("bad".into()));
            store.submit();
            assert!(store.has_error("email"));
        }

        #[test]
        fn test_empty_message_is_no_error() {
            let (mut store, ..) = store_with_logs();
            store.set_touched("email", true);
            store.set_error("email", Some(String::new()));
            assert!(!store.has_error("email"));
            assert_eq!(store.errors().outstanding(), 0);
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_calls_on_submit_without_errors() {
            let (mut store, _, _, submits) = store_with_logs();
            assert_eq!(store.submit(), SubmitOutcome::Submitted);
            assert!(store.was_submitted());
            assert_eq!(*submits.borrow(), vec![initial()]);
        }

        #[test]
        fn test_blocked_by_outstanding_errors() {
            let (mut store, _, _, submits) = store_with_logs();
            store.set_error("email", Some("email is required".into()));
            store.set_error("password", None);

            assert_eq!(store.submit(), SubmitOutcome::Blocked { outstanding: 1 });
            assert!(store.was_submitted());
            assert!(submits.borrow().is_empty());
        }

        #[test]
        fn test_clear_errors_unblocks() {
            let (mut store, _, _, submits) = store_with_logs();
            store.set_error("email", Some("bad".into()));
            store.clear_errors();
            assert!(store.errors().is_empty());
            assert_eq!(store.submit(), SubmitOutcome::Submitted);
            assert_eq!(submits.borrow().len(), 1);
        }
    }

    mod change_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_writes_nested_key() {
            let (mut store, ..) = store_with_logs();
            store.set_field("nested.objectProperty", "inner");
            assert_eq!(
                store.value("nested.objectProperty"),
                Some(&FormValue::from("inner"))
            );
        }

        #[test]
        fn test_on_change_is_deferred() {
            let (mut store, tasks, changes, _) = store_with_logs();
            store.set_field("email", "a@b.co");

            assert!(changes.borrow().is_empty());
            tasks.run_pending();
            assert_eq!(changes.borrow().len(), 1);
            assert_eq!(
                changes.borrow()[0].get_path("email"),
                Some(&FormValue::from("a@b.co"))
            );
        }

        #[test]
        fn test_notification_skipped_after_drop() {
            let (mut store, tasks, changes, _) = store_with_logs();
            store.set_field("email", "a@b.co");
            drop(store);
            assert_eq!(tasks.run_pending(), 1);
            assert!(changes.borrow().is_empty());
        }

        #[test]
        fn test_validates_and_runs_hook() {
            let (mut store, ..) = store_with_logs();
            let seen = Rc::new(RefCell::new(Vec::new()));
            let s = seen.clone();
            let rules = FieldRules::new()
                .min_length(3)
                .on_change(move |v| s.borrow_mut().push(v.clone()));

            store.change_value("password", "ab".into(), Some(&rules));
            assert_eq!(store.error("password"), Some("password should be more than 3"));
            assert_eq!(*seen.borrow(), vec![FormValue::from("ab")]);

            store.change_value("password", "abcd".into(), Some(&rules));
            assert_eq!(store.error("password"), None);
        }

        #[test]
        fn test_validator_sees_previous_tree() {
            let (mut store, ..) = store_with_logs();
            let rules = FieldRules::new().validate(|_: &FormValue, all: &FormValue| {
                match all.get_path("email") {
                    Some(FormValue::Text(s)) if s.is_empty() => Verdict::Fail("stale".into()),
                    _ => Verdict::Pass,
                }
            });

            // The validator observes the tree from before this write
            store.change_value("email", "first".into(), Some(&rules));
            assert_eq!(store.error("email"), Some("stale"));
            store.change_value("email", "second".into(), Some(&rules));
            assert_eq!(store.error("email"), None);
        }

        #[test]
        fn test_change_without_rules_clears_error() {
            let (mut store, ..) = store_with_logs();
            store.set_error("email", Some("bad".into()));
            store.set_field("email", "x");
            assert_eq!(store.error("email"), None);
        }

        #[test]
        fn test_write_through_scalar_is_dropped() {
            let (mut store, tasks, changes, _) = store_with_logs();
            store.set_field("email.local", "x");
            assert_eq!(store.values(), &initial());
            assert_eq!(tasks.run_pending(), 0);
            assert!(changes.borrow().is_empty());
        }
    }

    mod idempotence {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_field_same_value_is_noop() {
            let (mut store, tasks, changes, _) = store_with_logs();
            store.set_error("email", Some("keep me".into()));
            let errors = store.errors().clone();
            let touched = store.touched().clone();

            store.set_field("email", "");

            assert_eq!(store.errors(), &errors);
            assert_eq!(store.touched(), &touched);
            assert_eq!(tasks.run_pending(), 0);
            assert!(changes.borrow().is_empty());
        }

        #[test]
        fn test_set_touched_twice_is_stable() {
            let (mut store, ..) = store_with_logs();
            store.set_touched("email", true);
            store.set_touched("email", true);
            assert!(store.is_touched("email"));
            assert_eq!(store.touched().len(), 1);
        }
    }

    #[test]
    fn test_set_values_replaces_tree_without_notifying() {
        let (mut store, tasks, changes, _) = store_with_logs();
        let replacement: FormValue = [("email", "x@y.zz")].into_iter().collect();
        store.set_values(replacement.clone());
        assert_eq!(store.values(), &replacement);
        assert_eq!(tasks.run_pending(), 0);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_recheck_of_missing_key_measures_as_empty() {
        let (mut store, tasks, ..) = store_with_logs();
        let rules = FieldRules::new().min_length(3);
        store.recheck("nick", Some(&rules));
        assert_eq!(store.error("nick"), Some("nick should be more than 3"));
        assert!(store.value("nick").is_none());
        assert_eq!(tasks.run_pending(), 0);
    }

    #[test]
    fn test_recheck_uses_current_value() {
        let (mut store, ..) = store_with_logs();
        let rules = FieldRules::new().required();
        store.recheck("email", Some(&rules));
        assert_eq!(store.error("email"), Some("email is required"));
        store.recheck("missing", Some(&rules));
        assert_eq!(store.error("missing"), Some("missing is required"));
    }
}

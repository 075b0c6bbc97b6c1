//! One mounted form instance
//!
//! A [`Form`] pairs a [`FormStore`] with the [`FormContext`] it was mounted
//! in. Nested forms are created from a parent's context so that all fields of
//! the tree share one focus chain.

use std::collections::BTreeMap;

use crate::binder::{FieldKind, RawField, TextField};
use crate::focus::{FormContext, FormIndex};
use crate::state::{ErrorMap, FieldRules, FormOptions, FormStore, FormValue, SubmitOutcome};

#[derive(Debug)]
pub struct Form {
    store: FormStore,
    context: FormContext,
}

impl Form {
    /// Mount a root form with its own registry
    pub fn new(initial: FormValue, options: FormOptions) -> Self {
        Self::mount(FormContext::root(), initial, options)
    }

    /// Mount a form nested under `parent`, sharing its focus chain
    pub fn nested(parent: &FormContext, initial: FormValue, options: FormOptions) -> Self {
        Self::mount(parent.nested(), initial, options)
    }

    fn mount(context: FormContext, initial: FormValue, options: FormOptions) -> Self {
        let store = FormStore::new(initial, options, context.tasks().clone());
        Self { store, context }
    }

    /// Context to hand to nested forms
    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn form_index(&self) -> FormIndex {
        self.context.form_index()
    }

    /// Run change notifications queued by this form tree
    pub fn run_pending(&self) -> usize {
        self.context.tasks().run_pending()
    }

    pub(crate) fn store_mut(&mut self) -> &mut FormStore {
        &mut self.store
    }

    pub fn values(&self) -> &FormValue {
        self.store.values()
    }

    pub fn value(&self, key: &str) -> Option<&FormValue> {
        self.store.value(key)
    }

    pub fn errors(&self) -> &ErrorMap {
        self.store.errors()
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.store.error(key)
    }

    pub fn touched(&self) -> &BTreeMap<String, bool> {
        self.store.touched()
    }

    pub fn was_submitted(&self) -> bool {
        self.store.was_submitted()
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<FormValue>) {
        self.store.set_field(key, value);
    }

    pub fn set_values(&mut self, values: FormValue) {
        self.store.set_values(values);
    }

    pub fn set_touched(&mut self, key: &str, touched: bool) {
        self.store.set_touched(key, touched);
    }

    pub fn set_error(&mut self, key: &str, error: Option<String>) {
        self.store.set_error(key, error);
    }

    pub fn clear_errors(&mut self) {
        self.store.clear_errors();
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        self.store.submit()
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.store.has_error(key)
    }

    /// Bind a text-shaped input of any kind
    pub fn bind(&self, kind: FieldKind, key: &str, rules: FieldRules) -> TextField {
        TextField::new(self, kind, key, rules)
    }

    pub fn text(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Text, key, rules)
    }

    pub fn number(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Number, key, rules)
    }

    pub fn decimal(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Decimal, key, rules)
    }

    pub fn number_text(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::NumberText, key, rules)
    }

    pub fn decimal_text(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::DecimalText, key, rules)
    }

    pub fn email(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Email, key, rules)
    }

    pub fn username(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Username, key, rules)
    }

    pub fn password(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Password, key, rules)
    }

    pub fn postal_code(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::PostalCode, key, rules)
    }

    pub fn street_address(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::StreetAddress, key, rules)
    }

    pub fn telephone(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Telephone, key, rules)
    }

    pub fn name(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::Name, key, rules)
    }

    pub fn city(&self, key: &str, rules: FieldRules) -> TextField {
        self.bind(FieldKind::City, key, rules)
    }

    /// Bind a non-text control
    pub fn raw(&self, key: &str, rules: FieldRules) -> RawField {
        RawField::new(self, key, rules)
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        self.context.detach_all();
    }
}

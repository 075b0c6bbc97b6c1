//! Form context: how nested forms share one registry and task queue
//!
//! The root form creates the registry. Every nested form is built from its
//! parent's context, gets its own form index from the shared counter and
//! writes its fields into the same registry. All registry writes go through
//! [`FormContext::attach`] and index allocation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::chain::{self, FocusOutcome};
use super::registry::{ElementHandle, ElementSlot, FieldRegistry, FormIndex, LiveField, Ordinal};
use crate::state::TaskQueue;

#[derive(Clone)]
pub struct FormContext {
    registry: Rc<RefCell<FieldRegistry>>,
    tasks: TaskQueue,
    form_index: FormIndex,
}

impl FormContext {
    /// Context for a root form: a fresh registry and task queue
    pub fn root() -> Self {
        let mut registry = FieldRegistry::new();
        let form_index = registry.allocate_form_index();
        Self {
            registry: Rc::new(RefCell::new(registry)),
            tasks: TaskQueue::new(),
            form_index,
        }
    }

    /// Context for a form nested under this one
    pub fn nested(&self) -> Self {
        let form_index = self.registry.borrow_mut().allocate_form_index();
        Self {
            registry: Rc::clone(&self.registry),
            tasks: self.tasks.clone(),
            form_index,
        }
    }

    pub fn form_index(&self) -> FormIndex {
        self.form_index
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Whether both contexts belong to the same form tree
    pub fn shares_registry(&self, other: &FormContext) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }

    /// Report the element behind `key`, or `None` when it goes away
    pub fn attach(&self, key: &str, element: Option<ElementHandle>) -> Option<Ordinal> {
        self.registry
            .borrow_mut()
            .register(self.form_index, key, ElementSlot::from(element))
    }

    pub fn ordinal(&self, key: &str) -> Option<Ordinal> {
        self.registry.borrow().ordinal(self.form_index, key)
    }

    pub fn is_last(&self, key: &str) -> bool {
        chain::is_last(&self.registry.borrow(), self.form_index, key)
    }

    /// Move focus from `key` to the next eligible field in the tree
    pub fn focus_next(&self, key: &str) -> FocusOutcome {
        chain::advance(&self.registry, self.form_index, key)
    }

    /// Live fields of the whole tree in chain order
    pub fn live_fields(&self) -> Vec<LiveField> {
        self.registry.borrow().live_fields()
    }

    /// Detach every field of this form instance
    pub(crate) fn detach_all(&self) {
        self.registry.borrow_mut().detach_form(self.form_index);
    }
}

impl fmt::Debug for FormContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormContext")
            .field("form_index", &self.form_index)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::registry::MockFieldElement;

    fn element() -> ElementHandle {
        let mut mock = MockFieldElement::new();
        mock.expect_is_disabled().return_const(false);
        mock.expect_is_editable().return_const(true);
        mock.expect_focus().return_const(());
        mock.expect_blur().return_const(());
        Rc::new(mock)
    }

    #[test]
    fn test_root_gets_index_zero() {
        let root = FormContext::root();
        assert_eq!(root.form_index(), 0);
    }

    #[test]
    fn test_nested_forms_share_registry_with_unique_indices() {
        let root = FormContext::root();
        let first = root.nested();
        let second = root.nested();
        let grandchild = first.nested();

        assert_eq!(first.form_index(), 1);
        assert_eq!(second.form_index(), 2);
        assert_eq!(grandchild.form_index(), 3);
        assert!(root.shares_registry(&grandchild));
        assert!(!root.shares_registry(&FormContext::root()));
    }

    #[test]
    fn test_sibling_forms_same_key_distinct_registrations() {
        let root = FormContext::root();
        let first = root.nested();
        let second = root.nested();

        assert_eq!(first.attach("email", Some(element())), Some(1));
        assert_eq!(second.attach("email", Some(element())), Some(2));
        assert_eq!(first.ordinal("email"), Some(1));
        assert_eq!(second.ordinal("email"), Some(2));
        assert_eq!(root.live_fields().len(), 2);
    }

    #[test]
    fn test_focus_chain_spans_nested_forms() {
        let root = FormContext::root();
        let child = root.nested();
        root.attach("email", Some(element()));
        child.attach("street", Some(element()));

        assert!(!root.is_last("email"));
        assert!(child.is_last("street"));
        assert_eq!(
            root.focus_next("email"),
            FocusOutcome::Moved {
                form_index: 1,
                key: "street".into()
            }
        );
    }

    #[test]
    fn test_detach_all_only_affects_own_form() {
        let root = FormContext::root();
        let child = root.nested();
        root.attach("email", Some(element()));
        child.attach("street", Some(element()));

        child.detach_all();
        let live = root.live_fields();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].key, "email");
        assert!(root.is_last("email"));
    }

    #[test]
    fn test_shared_task_queue() {
        let root = FormContext::root();
        let child = root.nested();
        child.tasks().defer(|| {});
        assert_eq!(root.tasks().pending(), 1);
    }
}

//! Field registry shared by every form instance in one form tree
//!
//! Each field gets an ordinal the first time its element attaches. Ordinals
//! come from a single counter for the whole tree and are never reused, so a
//! field that detaches and reattaches keeps its place in the focus chain.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Identifies one mounted form instance (root or nested) within a registry
pub type FormIndex = usize;
/// Registry-wide registration sequence number
pub type Ordinal = usize;

/// The input element backing a field, as seen by the focus chain
#[cfg_attr(test, mockall::automock)]
pub trait FieldElement {
    fn focus(&self);
    fn blur(&self);
    fn is_disabled(&self) -> bool;
    fn is_editable(&self) -> bool;
}

pub type ElementHandle = Rc<dyn FieldElement>;

/// Attachment state of a registered field
#[derive(Clone)]
pub enum ElementSlot {
    Attached(ElementHandle),
    Detached,
}

impl ElementSlot {
    pub fn element(&self) -> Option<&ElementHandle> {
        match self {
            ElementSlot::Attached(element) => Some(element),
            ElementSlot::Detached => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, ElementSlot::Attached(_))
    }
}

impl From<Option<ElementHandle>> for ElementSlot {
    fn from(element: Option<ElementHandle>) -> Self {
        element.map_or(ElementSlot::Detached, ElementSlot::Attached)
    }
}

impl fmt::Debug for ElementSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementSlot::Attached(_) => f.write_str("Attached"),
            ElementSlot::Detached => f.write_str("Detached"),
        }
    }
}

/// A field whose element is currently attached
#[derive(Clone)]
pub struct LiveField {
    pub form_index: FormIndex,
    pub key: String,
    pub ordinal: Ordinal,
    pub element: ElementHandle,
}

impl fmt::Debug for LiveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveField")
            .field("form_index", &self.form_index)
            .field("key", &self.key)
            .field("ordinal", &self.ordinal)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Registration {
    ordinal: Ordinal,
    slot: ElementSlot,
}

#[derive(Debug, Default)]
pub struct FieldRegistry {
    next_form_index: FormIndex,
    next_ordinal: Ordinal,
    forms: BTreeMap<FormIndex, BTreeMap<String, Registration>>,
    last_live: Option<(FormIndex, String)>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next form index. The first caller (the root) gets 0.
    pub fn allocate_form_index(&mut self) -> FormIndex {
        let index = self.next_form_index;
        self.next_form_index += 1;
        tracing::debug!("allocated form index {index}");
        index
    }

    /// Record the element for `(form_index, key)` and return the field's ordinal.
    ///
    /// The first attachment assigns the next ordinal. Later calls only swap the
    /// slot. Detaching a field that was never registered is ignored.
    pub fn register(
        &mut self,
        form_index: FormIndex,
        key: &str,
        slot: ElementSlot,
    ) -> Option<Ordinal> {
        let fields = self.forms.entry(form_index).or_default();
        let ordinal = match fields.get_mut(key) {
            Some(existing) => {
                if let (ElementSlot::Attached(old), ElementSlot::Attached(new)) =
                    (&existing.slot, &slot)
                {
                    if Rc::ptr_eq(old, new) {
                        return Some(existing.ordinal);
                    }
                }
                debug_assert!(
                    !(existing.slot.is_attached() && slot.is_attached()),
                    "field `{key}` in form {form_index} is already attached to another element"
                );
                existing.slot = slot;
                existing.ordinal
            }
            None => {
                if !slot.is_attached() {
                    return None;
                }
                self.next_ordinal += 1;
                let ordinal = self.next_ordinal;
                tracing::debug!("field `{key}` in form {form_index} registered as #{ordinal}");
                fields.insert(key.to_string(), Registration { ordinal, slot });
                ordinal
            }
        };
        self.refresh_last_live();
        Some(ordinal)
    }

    /// Detach every field of one form instance, keeping their ordinals
    pub fn detach_form(&mut self, form_index: FormIndex) {
        if let Some(fields) = self.forms.get_mut(&form_index) {
            for registration in fields.values_mut() {
                registration.slot = ElementSlot::Detached;
            }
            self.refresh_last_live();
        }
    }

    pub fn ordinal(&self, form_index: FormIndex, key: &str) -> Option<Ordinal> {
        self.forms.get(&form_index)?.get(key).map(|r| r.ordinal)
    }

    pub fn element(&self, form_index: FormIndex, key: &str) -> Option<ElementHandle> {
        self.forms
            .get(&form_index)?
            .get(key)?
            .slot
            .element()
            .cloned()
    }

    /// Attached fields across all form instances, in focus-chain order:
    /// by form index, then by ordinal
    pub fn live_fields(&self) -> Vec<LiveField> {
        let mut live: Vec<LiveField> = self
            .forms
            .iter()
            .flat_map(|(&form_index, fields)| {
                fields.iter().filter_map(move |(key, r)| {
                    r.slot.element().map(|element| LiveField {
                        form_index,
                        key: key.clone(),
                        ordinal: r.ordinal,
                        element: element.clone(),
                    })
                })
            })
            .collect();
        live.sort_by(|a, b| {
            a.form_index
                .cmp(&b.form_index)
                .then(a.ordinal.cmp(&b.ordinal))
        });
        live
    }

    /// The last live field in focus-chain order
    pub fn last_live(&self) -> Option<(FormIndex, &str)> {
        self.last_live
            .as_ref()
            .map(|(form_index, key)| (*form_index, key.as_str()))
    }

    fn refresh_last_live(&mut self) {
        let last = self
            .forms
            .iter()
            .flat_map(|(&form_index, fields)| {
                fields
                    .iter()
                    .filter(|(_, r)| r.slot.is_attached())
                    .map(move |(key, r)| (form_index, r.ordinal, key))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(form_index, _, key)| (form_index, key.clone()));

        if last != self.last_live {
            tracing::trace!("last live field is now {last:?}");
            self.last_live = last;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> ElementHandle {
        let mut mock = MockFieldElement::new();
        mock.expect_is_disabled().return_const(false);
        mock.expect_is_editable().return_const(true);
        Rc::new(mock)
    }

    #[test]
    fn test_form_indices_increase() {
        let mut registry = FieldRegistry::new();
        assert_eq!(registry.allocate_form_index(), 0);
        assert_eq!(registry.allocate_form_index(), 1);
        assert_eq!(registry.allocate_form_index(), 2);
    }

    #[test]
    fn test_ordinals_are_global_and_start_at_one() {
        let mut registry = FieldRegistry::new();
        let root = registry.allocate_form_index();
        let child = registry.allocate_form_index();

        let a = ElementSlot::Attached(element());
        let b = ElementSlot::Attached(element());
        let c = ElementSlot::Attached(element());
        assert_eq!(registry.register(root, "email", a), Some(1));
        assert_eq!(registry.register(child, "street", b), Some(2));
        assert_eq!(registry.register(root, "password", c), Some(3));
    }

    #[test]
    fn test_same_element_reregistration_is_noop() {
        let mut registry = FieldRegistry::new();
        let handle = element();
        registry.register(0, "email", ElementSlot::Attached(handle.clone()));
        assert_eq!(
            registry.register(0, "email", ElementSlot::Attached(handle)),
            Some(1)
        );
        assert_eq!(registry.live_fields().len(), 1);
    }

    #[test]
    fn test_sibling_forms_keep_separate_entries() {
        let mut registry = FieldRegistry::new();
        let first = registry.allocate_form_index();
        let second = registry.allocate_form_index();
        registry.register(first, "email", ElementSlot::Attached(element()));
        registry.register(second, "email", ElementSlot::Attached(element()));

        let a = (first, registry.ordinal(first, "email"));
        let b = (second, registry.ordinal(second, "email"));
        assert_ne!(a, b);
        assert_eq!(a.1, Some(1));
        assert_eq!(b.1, Some(2));
        assert_eq!(registry.live_fields().len(), 2);
    }

    #[test]
    fn test_detach_hides_field_but_keeps_ordinal() {
        let mut registry = FieldRegistry::new();
        registry.register(0, "a", ElementSlot::Attached(element()));
        registry.register(0, "b", ElementSlot::Attached(element()));
        registry.register(0, "a", ElementSlot::Detached);

        let live = registry.live_fields();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].key, "b");
        assert_eq!(registry.ordinal(0, "a"), Some(1));
        assert!(registry.element(0, "a").is_none());

        registry.register(0, "a", ElementSlot::Attached(element()));
        assert_eq!(registry.ordinal(0, "a"), Some(1));
        registry.register(0, "c", ElementSlot::Attached(element()));
        assert_eq!(registry.ordinal(0, "c"), Some(3));
    }

    #[test]
    fn test_detaching_unknown_field_is_ignored() {
        let mut registry = FieldRegistry::new();
        assert_eq!(registry.register(0, "ghost", ElementSlot::Detached), None);
        assert!(registry.ordinal(0, "ghost").is_none());
    }

    #[test]
    fn test_live_fields_sorted_by_form_then_ordinal() {
        let mut registry = FieldRegistry::new();
        registry.register(1, "street", ElementSlot::Attached(element()));
        registry.register(0, "email", ElementSlot::Attached(element()));
        registry.register(1, "city", ElementSlot::Attached(element()));
        registry.register(0, "password", ElementSlot::Attached(element()));

        let order: Vec<(FormIndex, String)> = registry
            .live_fields()
            .into_iter()
            .map(|f| (f.form_index, f.key))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "email".to_string()),
                (0, "password".to_string()),
                (1, "street".to_string()),
                (1, "city".to_string()),
            ]
        );
    }

    #[test]
    fn test_last_live_tracks_attach_and_detach() {
        let mut registry = FieldRegistry::new();
        assert_eq!(registry.last_live(), None);

        registry.register(0, "a", ElementSlot::Attached(element()));
        registry.register(0, "b", ElementSlot::Attached(element()));
        assert_eq!(registry.last_live(), Some((0, "b")));

        registry.register(1, "nested", ElementSlot::Attached(element()));
        assert_eq!(registry.last_live(), Some((1, "nested")));

        registry.detach_form(1);
        assert_eq!(registry.last_live(), Some((0, "b")));

        registry.register(0, "b", ElementSlot::Detached);
        assert_eq!(registry.last_live(), Some((0, "a")));
    }
}

//! Form state and focus chaining for nested terminal forms
//!
//! The engine tracks field values, validation errors, touch state and submit
//! gating for a form, and works out where keyboard focus goes when the user
//! submits a field. Nested sub-forms register into their parent's registry so
//! the focus chain runs across the whole form tree.

pub mod binder;
pub mod error;
pub mod focus;
pub mod form;
pub mod state;

pub use binder::{FieldKind, InputHints, RawField, ReturnKey, TextField};
pub use error::FormError;
pub use focus::{ElementHandle, FieldElement, FocusOutcome, FormContext};
pub use form::Form;
pub use state::{FieldRules, FormOptions, FormValue, SubmitOutcome, Verdict};

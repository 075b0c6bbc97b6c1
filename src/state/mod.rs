//! Form state: value tree, path access, validation and the per-form store

pub mod path;
pub mod scheduler;
pub mod store;
pub mod validation;
pub mod value;

pub use scheduler::TaskQueue;
pub use store::{ErrorMap, FormOptions, FormStore, SubmitOutcome};
pub use validation::{FieldRules, Verdict};
pub use value::FormValue;

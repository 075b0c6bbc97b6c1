//! Field registration and keyboard focus chaining across nested forms

pub mod chain;
pub mod context;
pub mod registry;

pub use chain::FocusOutcome;
pub use context::FormContext;
pub use registry::{
    ElementHandle, ElementSlot, FieldElement, FieldRegistry, FormIndex, LiveField, Ordinal,
};

//! Form domain layer
//!
//! Generic state for one editable record: a dynamically typed field store with
//! per-field error slots, the context adapters bind through, and the submission
//! lifecycle that hands values to an injected handler.

mod context;
mod lifecycle;
mod options;
mod store;
mod transform;
mod value;

pub use context::{FieldMut, FieldRef, FormContext};
pub use lifecycle::{
    interpret_reply, PendingSubmit, ResponseError, SubmitHandler, SubmitOutcome, SubmitState,
    SubmitTicket, SubmitTrigger,
};
pub use options::{OptionLoader, OptionSet, SelectOption};
pub use transform::{
    lowercase, parse_iso_date, slugify, slugify_typing, to_iso_date, Transform,
};
pub use value::{FieldValue, FormErrors, FormValues};

#[cfg(test)]
pub use lifecycle::MockSubmitHandler;
#[cfg(test)]
pub use options::MockOptionLoader;

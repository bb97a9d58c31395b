//! Record persistence and the adapters that connect it to forms

mod handlers;
mod store;
mod traits;

pub use handlers::{RecordOptionLoader, RecordSubmitHandler};
pub use store::LocalStore;
pub use traits::Backend;

#[cfg(test)]
pub use traits::MockBackend;

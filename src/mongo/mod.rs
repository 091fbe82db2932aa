//! MongoDB document store integration.

pub mod client;
pub mod filters;
pub mod types;

pub use client::MongoStudentStore;
pub use filters::{build_list_filter, build_set_update};
pub use types::StoreError;

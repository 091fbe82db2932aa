//! Student domain: types, the storage seam, and the service behind the HTTP surface.

mod memory;
mod service;
pub mod store;
pub mod types;

pub use memory::MemoryStudentStore;
pub use service::{StudentApi, StudentService};
pub use store::StudentStore;
pub use types::{
    Address, NewStudent, StoreHealthSnapshot, Student, StudentError, StudentFilter, StudentPatch,
};

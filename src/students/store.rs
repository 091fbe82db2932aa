//! Storage seam between the student service and a document store.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::types::{NewStudent, Student, StudentFilter, StudentPatch};
use crate::mongo::StoreError;

/// Document store operations used by [`crate::students::StudentService`].
///
/// Every method maps onto exactly one store call. Implementations own concurrency control and
/// durability; callers never lock or retry.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a new document and return the identifier the store assigned to it.
    async fn insert(&self, student: NewStudent) -> Result<ObjectId, StoreError>;

    /// Return up to `limit` students matching `filter`, in the store's natural order.
    async fn find(&self, filter: &StudentFilter, limit: i64) -> Result<Vec<Student>, StoreError>;

    /// Fetch a single student by identifier.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Student>, StoreError>;

    /// Set the supplied fields on one student. Returns `false` when no document matched.
    async fn update_by_id(&self, id: &ObjectId, patch: &StudentPatch)
    -> Result<bool, StoreError>;

    /// Remove one student. Returns `false` when no document matched.
    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError>;

    /// Round-trip to the store to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

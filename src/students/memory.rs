//! Process-local [`StudentStore`] used for demos and tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::store::StudentStore;
use super::types::{NewStudent, Student, StudentFilter, StudentPatch};
use crate::mongo::StoreError;

/// In-memory student collection keyed by `ObjectId`.
///
/// Identifiers are minted the same way the MongoDB driver mints them, so responses look identical
/// across backends. Iteration follows identifier order.
#[derive(Default)]
pub struct MemoryStudentStore {
    documents: RwLock<BTreeMap<ObjectId, Student>>,
}

impl MemoryStudentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored students.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no students.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, student: NewStudent) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.documents
            .write()
            .await
            .insert(id, Student::from_new(id, student));
        Ok(id)
    }

    async fn find(&self, filter: &StudentFilter, limit: i64) -> Result<Vec<Student>, StoreError> {
        let cap = usize::try_from(limit).unwrap_or(0);
        let guard = self.documents.read().await;
        Ok(guard
            .values()
            .filter(|student| filter.matches(student))
            .take(cap)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Student>, StoreError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &StudentPatch,
    ) -> Result<bool, StoreError> {
        let mut guard = self.documents.write().await;
        match guard.get_mut(id) {
            Some(student) => {
                student.apply(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError> {
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::Address;

    fn student(name: &str, age: i64, country: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            age,
            address: Address {
                city: "Somewhere".into(),
                country: country.into(),
            },
        }
    }

    #[tokio::test]
    async fn find_respects_filter_and_limit() {
        let store = MemoryStudentStore::new();
        store.insert(student("Ann", 20, "NO")).await.unwrap();
        store.insert(student("Bo", 31, "SE")).await.unwrap();
        store.insert(student("Cy", 45, "NO")).await.unwrap();

        let filter = StudentFilter {
            country: Some("NO".into()),
            min_age: None,
        };
        let mut found: Vec<String> = store
            .find(&filter, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        found.sort();
        assert_eq!(found, vec!["Ann", "Cy"]);
        assert_eq!(store.len().await, 3);

        let capped = store.find(&StudentFilter::default(), 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_documents() {
        let store = MemoryStudentStore::new();
        let missing = ObjectId::new();
        let patch = StudentPatch {
            age: Some(1),
            ..Default::default()
        };
        assert!(!store.update_by_id(&missing, &patch).await.unwrap());
        assert!(!store.delete_by_id(&missing).await.unwrap());

        let id = store.insert(student("Ann", 20, "NO")).await.unwrap();
        assert!(store.update_by_id(&id, &patch).await.unwrap());
        assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().age, 1);
        assert!(store.delete_by_id(&id).await.unwrap());
        assert!(store.is_empty().await);
    }
}

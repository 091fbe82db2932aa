//! Student service translating API operations into single store calls.

use crate::{
    metrics::{MetricsSnapshot, RequestMetrics},
    students::{
        store::StudentStore,
        types::{
            NewStudent, StoreHealthSnapshot, Student, StudentError, StudentFilter, StudentPatch,
        },
    },
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Translates each student operation into exactly one store call.
///
/// The service owns the long-lived store handle and the request counters. Construct it once
/// near process start and share it through an `Arc`; it holds no per-request state.
pub struct StudentService {
    store: Arc<dyn StudentStore>,
    metrics: RequestMetrics,
    list_limit: i64,
}

/// Abstraction over student operations used by the HTTP surface.
#[async_trait]
pub trait StudentApi: Send + Sync {
    /// Insert a new student and return its identifier.
    async fn create(&self, student: NewStudent) -> Result<ObjectId, StudentError>;

    /// List students matching the filter, capped at the configured limit.
    async fn list(&self, filter: StudentFilter) -> Result<Vec<Student>, StudentError>;

    /// Fetch one student by its textual identifier.
    async fn fetch(&self, id: &str) -> Result<Student, StudentError>;

    /// Apply a partial update to one student.
    async fn update(&self, id: &str, patch: StudentPatch) -> Result<(), StudentError>;

    /// Delete one student.
    async fn delete(&self, id: &str) -> Result<(), StudentError>;

    /// Ping the backing store and report whether it answered.
    async fn store_health(&self) -> StoreHealthSnapshot;

    /// Retrieve the current request counters.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl StudentService {
    /// Wrap a store handle; `list_limit` caps every list response.
    pub fn new(store: Arc<dyn StudentStore>, list_limit: i64) -> Self {
        Self {
            store,
            metrics: RequestMetrics::new(),
            list_limit,
        }
    }

    fn parse_id(&self, raw: &str) -> Result<ObjectId, StudentError> {
        raw.parse::<ObjectId>().map_err(|err| {
            tracing::debug!(id = raw, error = %err, "Malformed student identifier");
            self.not_found()
        })
    }

    fn not_found(&self) -> StudentError {
        self.metrics.record_not_found();
        StudentError::NotFound
    }
}

#[async_trait]
impl StudentApi for StudentService {
    async fn create(&self, student: NewStudent) -> Result<ObjectId, StudentError> {
        let id = self.store.insert(student).await?;
        self.metrics.record_created();
        tracing::info!(id = %id, "Student created");
        Ok(id)
    }

    async fn list(&self, filter: StudentFilter) -> Result<Vec<Student>, StudentError> {
        let students = self.store.find(&filter, self.list_limit).await?;
        self.metrics.record_listed();
        tracing::debug!(
            country = ?filter.country,
            min_age = ?filter.min_age,
            returned = students.len(),
            "Students listed"
        );
        Ok(students)
    }

    async fn fetch(&self, id: &str) -> Result<Student, StudentError> {
        let id = self.parse_id(id)?;
        match self.store.find_by_id(&id).await? {
            Some(student) => {
                self.metrics.record_fetched();
                Ok(student)
            }
            None => Err(self.not_found()),
        }
    }

    async fn update(&self, id: &str, patch: StudentPatch) -> Result<(), StudentError> {
        if patch.is_empty() {
            tracing::debug!(id, "Empty partial update; nothing to set");
            self.metrics.record_updated();
            return Ok(());
        }
        let id = self.parse_id(id)?;
        if !self.store.update_by_id(&id, &patch).await? {
            return Err(self.not_found());
        }
        self.metrics.record_updated();
        tracing::info!(id = %id, "Student updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StudentError> {
        let id = self.parse_id(id)?;
        if !self.store.delete_by_id(&id).await? {
            return Err(self.not_found());
        }
        self.metrics.record_deleted();
        tracing::info!(id = %id, "Student deleted");
        Ok(())
    }

    async fn store_health(&self) -> StoreHealthSnapshot {
        match self.store.ping().await {
            Ok(()) => StoreHealthSnapshot {
                reachable: true,
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Store health check failed");
                StoreHealthSnapshot {
                    reachable: false,
                    error: Some(error.to_string()),
                }
            }
        }
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

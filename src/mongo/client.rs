//! MongoDB-backed implementation of [`StudentStore`].

use crate::config::get_config;
use crate::mongo::{
    filters::{build_list_filter, build_set_update, by_id},
    types::{StoreError, StudentDocument},
};
use crate::students::{NewStudent, Student, StudentFilter, StudentPatch, StudentStore};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, doc, oid::ObjectId},
};

/// Long-lived handle onto the student collection.
///
/// The driver pools connections internally, so a single instance is shared by every request.
pub struct MongoStudentStore {
    database: Database,
    collection: Collection<StudentDocument>,
}

impl MongoStudentStore {
    /// Connect using configuration derived from the environment.
    pub async fn new() -> Result<Self, StoreError> {
        let config = get_config();
        let uri = config
            .mongodb_uri
            .as_deref()
            .ok_or(StoreError::MissingUri)?;
        Self::connect(uri, &config.mongodb_database, &config.mongodb_collection).await
    }

    /// Connect to an explicit deployment, database, and collection.
    pub async fn connect(
        uri: &str,
        database_name: &str,
        collection_name: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database_name);
        let collection = database.collection::<StudentDocument>(collection_name);
        tracing::debug!(
            database = database_name,
            collection = collection_name,
            "Initialized MongoDB client"
        );
        Ok(Self {
            database,
            collection,
        })
    }
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    async fn insert(&self, student: NewStudent) -> Result<ObjectId, StoreError> {
        let document = StudentDocument::from(student);
        let result = self.collection.insert_one(&document).await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => {
                let error = StoreError::UnexpectedId(other.to_string());
                tracing::error!(error = %error, "Insert returned a foreign identifier");
                Err(error)
            }
        }
    }

    async fn find(&self, filter: &StudentFilter, limit: i64) -> Result<Vec<Student>, StoreError> {
        let query = build_list_filter(filter);
        let cursor = self.collection.find(query).limit(limit).await?;
        let documents: Vec<StudentDocument> = cursor.try_collect().await?;
        Ok(documents
            .into_iter()
            .filter_map(StudentDocument::into_student)
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Student>, StoreError> {
        let document = self.collection.find_one(by_id(id)).await?;
        Ok(document.and_then(StudentDocument::into_student))
    }

    async fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &StudentPatch,
    ) -> Result<bool, StoreError> {
        let Some(update) = build_set_update(patch)? else {
            return Ok(true);
        };
        let result = self.collection.update_one(by_id(id), update).await?;
        tracing::debug!(
            id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            "Update applied"
        );
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.collection.delete_one(by_id(id)).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

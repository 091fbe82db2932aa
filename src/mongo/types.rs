//! BSON document shapes and errors for the MongoDB store.

use crate::students::{Address, NewStudent, Student};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB backend was selected without a connection string.
    #[error("MONGODB_URI is not configured")]
    MissingUri,
    /// Driver failed to connect, query, or decode a response.
    #[error("MongoDB request failed: {0}")]
    Driver(#[from] mongodb::error::Error),
    /// A value could not be encoded as BSON.
    #[error("Failed to encode BSON: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    /// Insert succeeded but the store returned a non-`ObjectId` identifier.
    #[error("Unexpected inserted id: {0}")]
    UnexpectedId(String),
}

/// Student as persisted in the collection.
///
/// `_id` is omitted on insert so the driver assigns one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StudentDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<ObjectId>,
    pub(crate) name: String,
    pub(crate) age: i64,
    pub(crate) address: Address,
}

impl From<NewStudent> for StudentDocument {
    fn from(student: NewStudent) -> Self {
        Self {
            id: None,
            name: student.name,
            age: student.age,
            address: student.address,
        }
    }
}

impl StudentDocument {
    /// Convert a stored document into a domain record. Documents without `_id` are skipped.
    pub(crate) fn into_student(self) -> Option<Student> {
        let id = self.id?;
        Some(Student {
            id,
            name: self.name,
            age: self.age,
            address: self.address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn new_documents_leave_id_to_the_store() {
        let document = StudentDocument::from(NewStudent {
            name: "Ann".into(),
            age: 20,
            address: Address {
                city: "Oslo".into(),
                country: "NO".into(),
            },
        });
        let encoded = bson::to_document(&document).expect("encode");
        assert!(!encoded.contains_key("_id"));
        assert_eq!(
            encoded.get_document("address").expect("address"),
            &doc! { "city": "Oslo", "country": "NO" }
        );
    }

    #[test]
    fn decodes_int32_ages_written_by_other_clients() {
        let id = ObjectId::new();
        let raw = doc! {
            "_id": id,
            "name": "Bo",
            "age": 31_i32,
            "address": { "city": "Lund", "country": "SE" },
        };
        let document: StudentDocument = bson::from_document(raw).expect("decode");
        let student = document.into_student().expect("student");
        assert_eq!(student.id, id);
        assert_eq!(student.age, 31);
        assert_eq!(student.address.country, "SE");
    }
}

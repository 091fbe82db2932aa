//! Student records, request shapes, and the error taxonomy shared by every surface.

use crate::mongo::StoreError;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded postal address stored inside each student document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City the student lives in.
    pub city: String,
    /// Country used by the `country` list filter (exact match).
    pub country: String,
}

/// Payload accepted by `POST /students`. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: i64,
    /// Embedded address.
    pub address: Address,
}

/// Stored student together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Identifier assigned at insertion; never changes afterwards.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Age in whole years.
    pub age: i64,
    /// Embedded address.
    pub address: Address,
}

impl Student {
    /// Attach an identifier to a freshly inserted payload.
    pub fn from_new(id: ObjectId, student: NewStudent) -> Self {
        Self {
            id,
            name: student.name,
            age: student.age,
            address: student.address,
        }
    }

    /// Apply the supplied fields of a partial update in place.
    pub fn apply(&mut self, patch: &StudentPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(address) = &patch.address {
            self.address.clone_from(address);
        }
    }
}

/// Partial update accepted by `PATCH /students/{id}`.
///
/// Omitted and `null` fields are both `None` and leave the stored value untouched. A supplied
/// `address` replaces the embedded address as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    /// Replacement name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    /// Replacement address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl StudentPatch {
    /// Whether the patch carries no field to set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.address.is_none()
    }
}

/// Optional constraints applied by `GET /students`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Exact match against `address.country`.
    pub country: Option<String>,
    /// Inclusive lower bound on `age`.
    pub min_age: Option<i64>,
}

impl StudentFilter {
    /// Whether a stored student satisfies every supplied constraint.
    pub fn matches(&self, student: &Student) -> bool {
        let country_ok = self
            .country
            .as_deref()
            .is_none_or(|country| student.address.country == country);
        let age_ok = self.min_age.is_none_or(|min_age| student.age >= min_age);
        country_ok && age_ok
    }
}

/// Reachability snapshot for the backing store.
#[derive(Debug, Clone)]
pub struct StoreHealthSnapshot {
    /// Whether the store answered a ping.
    pub reachable: bool,
    /// Diagnostic captured when the store was unreachable.
    pub error: Option<String>,
}

/// Errors emitted by student operations.
#[derive(Debug, Error)]
pub enum StudentError {
    /// No student is addressed by the identifier (including malformed identifiers).
    #[error("Student not found")]
    NotFound,
    /// Request payload or query was missing fields or had mistyped values.
    #[error("{0}")]
    Validation(String),
    /// Store interaction failed.
    #[error("Store request failed: {0}")]
    Store(#[from] StoreError),
}

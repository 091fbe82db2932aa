//! Filter and update builders for MongoDB queries.

use mongodb::bson::{self, Document, doc, oid::ObjectId};

use crate::students::{StudentFilter, StudentPatch};

/// Compose the `find` filter for a list request. An empty document matches everything.
pub fn build_list_filter(filter: &StudentFilter) -> Document {
    let mut query = Document::new();

    if let Some(country) = filter.country.as_deref() {
        query.insert("address.country", country);
    }

    if let Some(min_age) = filter.min_age {
        query.insert("age", doc! { "$gte": min_age });
    }

    query
}

/// Filter addressing a single document by identifier.
pub fn by_id(id: &ObjectId) -> Document {
    doc! { "_id": *id }
}

/// Build the `$set` update for a partial patch, or `None` when the patch sets nothing.
pub fn build_set_update(patch: &StudentPatch) -> Result<Option<Document>, bson::ser::Error> {
    let mut set = Document::new();

    if let Some(name) = patch.name.as_deref() {
        set.insert("name", name);
    }
    if let Some(age) = patch.age {
        set.insert("age", age);
    }
    if let Some(address) = patch.address.as_ref() {
        set.insert("address", bson::to_bson(address)?);
    }

    if set.is_empty() {
        Ok(None)
    } else {
        Ok(Some(doc! { "$set": set }))
    }
}

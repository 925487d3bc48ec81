//! Shared storage helper functions.
//!
//! Document id handling, listing and merge logic used by every backend,
//! plus conversion between typed records and raw documents.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{Direction, Document, ListQuery, Result, StorageError, ID_FIELD};

/// Read the document's id, if it carries a non-empty string one.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
}

/// Resolve the id a new document is stored under, writing it into the
/// document when one is generated.
pub fn assign_id(collection: &str, doc: &mut Document) -> Result<String> {
    match doc.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = uuid::Uuid::new_v4().to_string();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(_) => document_id(doc)
            .map(str::to_string)
            .ok_or_else(|| StorageError::invalid(collection, "", "id must be a non-empty string")),
    }
}

/// Shallow-merge `partial` into `target`.
///
/// Top-level fields of `partial` replace those of `target`; the id cannot
/// change.
pub fn merge(collection: &str, id: &str, target: &mut Document, partial: Document) -> Result<()> {
    if let Some(new_id) = partial.get(ID_FIELD) {
        if new_id.as_str() != Some(id) {
            return Err(StorageError::invalid(collection, id, "id cannot be changed"));
        }
    }
    for (field, value) in partial {
        target.insert(field, value);
    }
    Ok(())
}

/// Filter and order documents for a listing.
pub fn apply_list_query(docs: impl IntoIterator<Item = Document>, query: &ListQuery) -> Vec<Document> {
    let mut matched: Vec<Document> = docs.into_iter().filter(|d| query.matches(d)).collect();
    matched.sort_by(|a, b| {
        let primary = match &query.order_by {
            Some(order) => {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
            None => Ordering::Equal,
        };
        primary.then_with(|| document_id(a).cmp(&document_id(b)))
    });
    matched
}

/// Total order over JSON field values: missing and null first, then
/// booleans, numbers, strings, and anything else.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Serialize a typed record into a document.
pub fn into_document<T: Serialize>(collection: &str, record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(StorageError::invalid(collection, "", "record did not serialize to an object")),
    }
}

/// Deserialize a document into a typed record.
///
/// Shape errors are reported as `InvalidDocument` naming the document.
pub fn from_document<T: DeserializeOwned>(collection: &str, doc: Document) -> Result<T> {
    let id = document_id(&doc).unwrap_or_default().to_string();
    serde_json::from_value(Value::Object(doc))
        .map_err(|e| StorageError::invalid(collection, &id, e.to_string()))
}

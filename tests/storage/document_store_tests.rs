//! DocumentStore interface tests.
//!
//! These tests verify the contract of the DocumentStore trait.
//! Each storage implementation should run these tests.

use serde_json::{json, Value};

use waypoint::storage::{Direction, Document, DocumentStore, ListQuery, StorageError};

/// Build a document from a JSON object literal.
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d["id"].as_str().expect("id").to_string())
        .collect()
}

/// Unique collection name per test so backends can share one database.
fn collection(test: &str) -> String {
    format!("test_{}_{}", test, uuid::Uuid::new_v4().simple())
}

// =============================================================================
// DocumentStore::create / get
// =============================================================================

pub async fn test_get_nonexistent<S: DocumentStore>(store: &S) {
    let coll = collection("get_none");
    let found = store.get(&coll, "missing").await.expect("get should succeed");
    assert!(found.is_none(), "nonexistent document should be None");
}

pub async fn test_create_with_explicit_id<S: DocumentStore>(store: &S) {
    let coll = collection("create_id");
    let id = store
        .create(&coll, doc(json!({"id": "phase-1", "title": "Foundations", "order": 1})))
        .await
        .expect("create should succeed");
    assert_eq!(id, "phase-1");

    let stored = store
        .get(&coll, "phase-1")
        .await
        .expect("get should succeed")
        .expect("document should exist");
    assert_eq!(stored["title"], "Foundations");
    assert_eq!(stored["order"], 1);
}

pub async fn test_create_generates_id<S: DocumentStore>(store: &S) {
    let coll = collection("create_gen");
    let id = store
        .create(&coll, doc(json!({"title": "No id"})))
        .await
        .expect("create should succeed");
    assert!(uuid::Uuid::parse_str(&id).is_ok(), "generated id should be a UUID");

    let stored = store
        .get(&coll, &id)
        .await
        .expect("get should succeed")
        .expect("document should exist");
    assert_eq!(stored["id"], Value::String(id));
}

pub async fn test_create_duplicate_fails<S: DocumentStore>(store: &S) {
    let coll = collection("create_dup");
    store
        .create(&coll, doc(json!({"id": "e1", "title": "first"})))
        .await
        .expect("first create should succeed");

    let err = store
        .create(&coll, doc(json!({"id": "e1", "title": "second"})))
        .await
        .expect_err("duplicate create should fail");
    assert!(
        matches!(err, StorageError::AlreadyExists { .. }),
        "expected AlreadyExists, got {err}"
    );

    let stored = store.get(&coll, "e1").await.unwrap().unwrap();
    assert_eq!(stored["title"], "first", "original document must survive");
}

pub async fn test_collections_are_isolated<S: DocumentStore>(store: &S) {
    let a = collection("iso_a");
    let b = collection("iso_b");
    store.create(&a, doc(json!({"id": "same"}))).await.unwrap();
    store.create(&b, doc(json!({"id": "same"}))).await.unwrap();

    store.delete(&a, "same").await.unwrap();
    assert!(store.get(&a, "same").await.unwrap().is_none());
    assert!(store.get(&b, "same").await.unwrap().is_some());
}

pub async fn test_preserves_nested_values<S: DocumentStore>(store: &S) {
    let coll = collection("nested");
    let original = doc(json!({
        "id": "e1",
        "techStack": ["Terraform", "AWS"],
        "isPublic": true,
        "issuer": null,
        "meta": {"source": "import", "rev": 3}
    }));
    store.create(&coll, original.clone()).await.unwrap();
    let stored = store.get(&coll, "e1").await.unwrap().unwrap();
    assert_eq!(stored, original);
}

// =============================================================================
// DocumentStore::list
// =============================================================================

pub async fn test_list_empty_collection<S: DocumentStore>(store: &S) {
    let coll = collection("list_empty");
    let docs = store.list(&coll, &ListQuery::new()).await.unwrap();
    assert!(docs.is_empty());
}

pub async fn test_list_filters_by_equality<S: DocumentStore>(store: &S) {
    let coll = collection("list_filter");
    for (id, phase) in [("e1", "p1"), ("e2", "p2"), ("e3", "p1")] {
        store
            .create(&coll, doc(json!({"id": id, "phaseId": phase})))
            .await
            .unwrap();
    }

    let query = ListQuery::new().where_eq("phaseId", "p1");
    let docs = store.list(&coll, &query).await.unwrap();
    assert_eq!(ids(&docs), vec!["e1", "e3"]);
}

pub async fn test_list_orders_with_id_tiebreak<S: DocumentStore>(store: &S) {
    let coll = collection("list_order");
    for (id, order) in [("c", 2), ("a", 3), ("b", 2), ("d", 1)] {
        store
            .create(&coll, doc(json!({"id": id, "order": order})))
            .await
            .unwrap();
    }

    let asc = store
        .list(&coll, &ListQuery::new().order_by("order", Direction::Asc))
        .await
        .unwrap();
    assert_eq!(ids(&asc), vec!["d", "b", "c", "a"]);

    let desc = store
        .list(&coll, &ListQuery::new().order_by("order", Direction::Desc))
        .await
        .unwrap();
    assert_eq!(ids(&desc), vec!["a", "b", "c", "d"]);
}

pub async fn test_list_orders_numerically<S: DocumentStore>(store: &S) {
    let coll = collection("list_numeric");
    for (id, order) in [("ten", 10), ("two", 2), ("one", 1)] {
        store
            .create(&coll, doc(json!({"id": id, "order": order})))
            .await
            .unwrap();
    }
    let docs = store
        .list(&coll, &ListQuery::new().order_by("order", Direction::Asc))
        .await
        .unwrap();
    assert_eq!(ids(&docs), vec!["one", "two", "ten"]);
}

// =============================================================================
// DocumentStore::update
// =============================================================================

pub async fn test_update_merges_top_level_fields<S: DocumentStore>(store: &S) {
    let coll = collection("update_merge");
    store
        .create(
            &coll,
            doc(json!({"id": "p1", "title": "Old", "status": "Planned", "focusAreas": ["Linux", "Git"]})),
        )
        .await
        .unwrap();

    store
        .update(&coll, "p1", doc(json!({"status": "Completed", "focusAreas": ["Linux"]})))
        .await
        .expect("update should succeed");

    let stored = store.get(&coll, "p1").await.unwrap().unwrap();
    assert_eq!(stored["title"], "Old");
    assert_eq!(stored["status"], "Completed");
    assert_eq!(stored["focusAreas"], json!(["Linux"]));
}

pub async fn test_update_nonexistent_fails<S: DocumentStore>(store: &S) {
    let coll = collection("update_missing");
    let err = store
        .update(&coll, "ghost", doc(json!({"title": "x"})))
        .await
        .expect_err("update of missing document should fail");
    assert!(matches!(err, StorageError::NotFound { .. }), "got {err}");
}

pub async fn test_update_cannot_change_id<S: DocumentStore>(store: &S) {
    let coll = collection("update_id");
    store.create(&coll, doc(json!({"id": "p1"}))).await.unwrap();
    let err = store
        .update(&coll, "p1", doc(json!({"id": "p2"})))
        .await
        .expect_err("id change should fail");
    assert!(matches!(err, StorageError::InvalidDocument { .. }), "got {err}");
    assert!(store.get(&coll, "p2").await.unwrap().is_none());
}

// =============================================================================
// DocumentStore::delete
// =============================================================================

pub async fn test_delete_removes_document<S: DocumentStore>(store: &S) {
    let coll = collection("delete");
    store.create(&coll, doc(json!({"id": "e1"}))).await.unwrap();
    store.delete(&coll, "e1").await.expect("delete should succeed");
    assert!(store.get(&coll, "e1").await.unwrap().is_none());
    assert!(store.list(&coll, &ListQuery::new()).await.unwrap().is_empty());
}

pub async fn test_delete_nonexistent_fails<S: DocumentStore>(store: &S) {
    let coll = collection("delete_missing");
    let err = store
        .delete(&coll, "ghost")
        .await
        .expect_err("delete of missing document should fail");
    assert!(matches!(err, StorageError::NotFound { .. }), "got {err}");
}

/// Run all DocumentStore tests against a store implementation.
#[macro_export]
macro_rules! run_document_store_tests {
    ($store:expr) => {
        use $crate::storage::document_store_tests::*;

        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_create_with_explicit_id($store).await;
        println!("  test_create_with_explicit_id: PASSED");

        test_create_generates_id($store).await;
        println!("  test_create_generates_id: PASSED");

        test_create_duplicate_fails($store).await;
        println!("  test_create_duplicate_fails: PASSED");

        test_collections_are_isolated($store).await;
        println!("  test_collections_are_isolated: PASSED");

        test_preserves_nested_values($store).await;
        println!("  test_preserves_nested_values: PASSED");

        test_list_empty_collection($store).await;
        println!("  test_list_empty_collection: PASSED");

        test_list_filters_by_equality($store).await;
        println!("  test_list_filters_by_equality: PASSED");

        test_list_orders_with_id_tiebreak($store).await;
        println!("  test_list_orders_with_id_tiebreak: PASSED");

        test_list_orders_numerically($store).await;
        println!("  test_list_orders_numerically: PASSED");

        test_update_merges_top_level_fields($store).await;
        println!("  test_update_merges_top_level_fields: PASSED");

        test_update_nonexistent_fails($store).await;
        println!("  test_update_nonexistent_fails: PASSED");

        test_update_cannot_change_id($store).await;
        println!("  test_update_cannot_change_id: PASSED");

        test_delete_removes_document($store).await;
        println!("  test_delete_removes_document: PASSED");

        test_delete_nonexistent_fails($store).await;
        println!("  test_delete_nonexistent_fails: PASSED");
    };
}

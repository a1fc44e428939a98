//! CRUD integration tests for `SqliteCollection`.

use docgate_store::{CollectionHandle, DocumentStore, StoreError};
use docgate_store_sqlite::SqliteDocumentStore;
use docgate_types::{Document, Filter};
use serde_json::json;

fn doc(value: serde_json::Value) -> Document {
    Document::try_from(value).expect("object")
}

#[tokio::test]
async fn insert_and_find_by_id() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let users = store.collection("user", "users").expect("collection");

    users
        .insert_one(&doc(json!({"_id": "u-1", "name": "ada"})))
        .await
        .expect("insert");

    let found = users.find_one(&Filter::by_id("u-1")).await.expect("find");
    let found = found.expect("should exist");
    assert_eq!(found.get("name"), Some(&json!("ada")));
}

#[tokio::test]
async fn find_nonexistent_returns_none() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let users = store.collection("user", "users").expect("collection");
    let found = users.find_one(&Filter::by_id("nope")).await.expect("find");
    assert!(found.is_none());
}

#[tokio::test]
async fn insert_duplicate_is_duplicate_key() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let users = store.collection("user", "users").expect("collection");
    let d = doc(json!({"_id": "u-1"}));

    users.insert_one(&d).await.expect("first insert");
    let err = users.insert_one(&d).await.expect_err("second insert");
    assert!(matches!(err, StoreError::DuplicateKey { ref id } if id == "u-1"));
}

#[tokio::test]
async fn insert_without_string_id_is_rejected() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let users = store.collection("user", "users").expect("collection");
    let err = users
        .insert_one(&doc(json!({"_id": 7})))
        .await
        .expect_err("numeric id");
    assert!(matches!(err, StoreError::InvalidDocument { .. }));
}

#[tokio::test]
async fn collections_are_isolated_by_namespace() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let a = store.collection("network", "instances").expect("a");
    let b = store.collection("network", "proxies").expect("b");

    a.insert_one(&doc(json!({"_id": "x"}))).await.expect("insert");
    b.insert_one(&doc(json!({"_id": "x"}))).await.expect("same id elsewhere");

    assert_eq!(a.find_all().await.expect("all").len(), 1);
    assert_eq!(b.find_all().await.expect("all").len(), 1);
}

#[tokio::test]
async fn find_all_returns_insertion_order() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let c = store.collection("game", "maps").expect("collection");
    for id in ["c", "a", "b"] {
        c.insert_one(&doc(json!({"_id": id}))).await.expect("insert");
    }
    let ids: Vec<String> = c
        .find_all()
        .await
        .expect("all")
        .iter()
        .filter_map(|d| d.id().map(str::to_string))
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn replace_by_field_filter_keeps_position() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let c = store.collection("network", "proxies").expect("collection");
    c.insert_one(&doc(json!({"_id": "p1", "port": 25565})))
        .await
        .expect("insert");
    c.insert_one(&doc(json!({"_id": "p2", "port": 25566})))
        .await
        .expect("insert");

    let replaced = c
        .replace_one(
            &Filter::eq("port", 25565),
            &doc(json!({"_id": "p1", "port": 25565, "online": true})),
        )
        .await
        .expect("replace");
    assert!(replaced);

    let all = c.find_all().await.expect("all");
    assert_eq!(all[0].get("online"), Some(&json!(true)));
    assert_eq!(all[1].id(), Some("p2"));
}

#[tokio::test]
async fn replace_and_delete_report_no_match() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let c = store.collection("network", "proxies").expect("collection");
    let replaced = c
        .replace_one(&Filter::by_id("ghost"), &doc(json!({"_id": "ghost"})))
        .await
        .expect("replace");
    assert!(!replaced);
    assert!(!c.delete_one(&Filter::by_id("ghost")).await.expect("delete"));
}

#[tokio::test]
async fn delete_removes_document() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let c = store.collection("user", "users").expect("collection");
    c.insert_one(&doc(json!({"_id": "u-9"}))).await.expect("insert");

    assert!(c.delete_one(&Filter::by_id("u-9")).await.expect("delete"));
    assert!(c
        .find_one(&Filter::by_id("u-9"))
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn handle_fails_after_shutdown() {
    let store = SqliteDocumentStore::open_in_memory().expect("open");
    let c = store.collection("user", "users").expect("collection");
    store.shutdown().await;
    let err = c.find_all().await.expect_err("closed");
    assert!(matches!(err, StoreError::Storage { .. }));
}

#[tokio::test]
async fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("primary.db");
    {
        let store = SqliteDocumentStore::open(&path).expect("open");
        let c = store.collection("configuration", "motd").expect("collection");
        c.insert_one(&doc(json!({"_id": "main", "text": "hi"})))
            .await
            .expect("insert");
        store.shutdown().await;
    }
    let store = SqliteDocumentStore::open(&path).expect("reopen");
    let c = store.collection("configuration", "motd").expect("collection");
    let found = c.find_one(&Filter::by_id("main")).await.expect("find");
    assert_eq!(found.and_then(|d| d.get("text").cloned()), Some(json!("hi")));
}

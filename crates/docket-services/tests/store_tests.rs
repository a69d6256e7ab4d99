//! Integration tests for MemoryStore and JsonFileStore

mod common;

use docket_core::{DynamicRecord, FormData, Record, RecordId, RecordService, ServiceError};
use docket_services::{JsonFileStore, MemoryStore};
use pretty_assertions::assert_eq;

use common::{case, sample_cases};

fn payload(case_number: &str, branch: &str) -> FormData {
    [("case_number", case_number), ("branch", branch), ("filed_on", "2024-04-01")]
        .into_iter()
        .collect()
}

// ============ MemoryStore ============

#[tokio::test]
async fn memory_store_allocates_next_id() {
    let store = MemoryStore::with_records(sample_cases());
    let created = store.create(&payload("CV-0100", "RTC 5")).await.unwrap();
    assert_eq!(created.id(), RecordId::Int(5));
    assert_eq!(created.field("branch").to_string(), "RTC 5");
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn memory_store_rejects_create_when_ids_are_exhausted() {
    let store = MemoryStore::with_records(vec![case(i64::MAX, "RTC 1", "2024-01-10")]);
    let err = store.create(&payload("CV-0100", "RTC 5")).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected("No record ids are left in this collection".into())
    );
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn memory_store_update_and_delete_missing_record() {
    let store = MemoryStore::with_records(sample_cases());
    let missing = RecordId::Int(99);

    let err = store.update(&missing, &payload("CV-9", "RTC 9")).await.unwrap_err();
    assert_eq!(err, ServiceError::NotFound(missing.clone()));

    let err = store.delete(&missing).await.unwrap_err();
    assert_eq!(err.user_message(), "Record 99 was not found");
}

#[tokio::test]
async fn memory_store_update_replaces_fields() {
    let store = MemoryStore::with_records(sample_cases());
    let updated = store
        .update(&RecordId::Int(3), &payload("CV-0003", "RTC 7"))
        .await
        .unwrap();
    assert_eq!(updated.id(), RecordId::Int(3));

    let all = store.fetch_all().await.unwrap();
    let branches: Vec<String> = all.iter().map(|r| r.field("branch").to_string()).collect();
    assert_eq!(branches, vec!["RTC 1", "RTC 7", "RTC 1"]);
}

#[tokio::test]
async fn memory_store_rejects_duplicate_unique_field() {
    let store = MemoryStore::with_records(sample_cases()).with_unique_field("case_number");

    let err = store.create(&payload("cv-0001", "RTC 1")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
    assert_eq!(err.user_message(), "A record with case number 'cv-0001' already exists");

    // Saving a record under its own number is not a clash
    assert!(store.update(&RecordId::Int(1), &payload("CV-0001", "RTC 3")).await.is_ok());
}

// ============ JsonFileStore ============

#[tokio::test]
async fn json_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store: JsonFileStore<DynamicRecord> = JsonFileStore::open(dir.path().join("cases.json"))
        .await
        .unwrap();
    assert!(store.is_empty());
    assert!(store.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_store_persists_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cases.json");

    let store: JsonFileStore<DynamicRecord> = JsonFileStore::open(&path).await.unwrap();
    let first = store.create(&payload("CV-0001", "RTC 1")).await.unwrap();
    let second = store.create(&payload("CV-0002", "RTC 2")).await.unwrap();
    store.delete(&first.id()).await.unwrap();

    let reopened: JsonFileStore<DynamicRecord> = JsonFileStore::open(&path).await.unwrap();
    let records = reopened.fetch_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), second.id());
    assert_eq!(records[0].field("case_number").to_string(), "CV-0002");
}

#[tokio::test]
async fn json_store_reads_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.json");
    let json = serde_json::to_string(&vec![case(7, "RTC 4", "2023-09-09")]).unwrap();
    std::fs::write(&path, json).unwrap();

    let store: JsonFileStore<DynamicRecord> = JsonFileStore::open(&path).await.unwrap();
    let created = store.create(&payload("CV-0008", "RTC 4")).await.unwrap();
    assert_eq!(created.id(), RecordId::Int(8));
}

#[tokio::test]
async fn json_store_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cases.json");
    std::fs::write(&path, "[]").unwrap();
    let store: JsonFileStore<DynamicRecord> = JsonFileStore::open(&path).await.unwrap();

    std::fs::write(&path, "{not json").unwrap();
    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidPayload(_)));
}

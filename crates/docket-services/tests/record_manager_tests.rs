//! Integration tests for RecordManager
//!
//! Drives refresh → add/edit → submit → delete through the manager with
//! mocked collaborators.

mod common;

use std::sync::Arc;

use docket_core::{Actor, Permission, PermissionSet, Record, RecordId, ServiceError};
use docket_forms::{DrawerEvent, DrawerStep};
use docket_services::{ManagerError, RecordManager};
use docket_table::FilterValue;
use pretty_assertions::assert_eq;

use common::{MockService, RecordingNotifier, ScriptedConfirm, case_drawer, case_table, sample_cases};

struct Harness {
    manager: RecordManager<docket_core::DynamicRecord>,
    service: Arc<MockService>,
    notifier: Arc<RecordingNotifier>,
    confirm: Arc<ScriptedConfirm>,
}

fn harness(service: MockService, answers: Vec<bool>) -> Harness {
    let service = Arc::new(service);
    let notifier = Arc::new(RecordingNotifier::default());
    let confirm = Arc::new(ScriptedConfirm::answering(answers));
    let manager = RecordManager::new(service.clone(), case_table(), case_drawer())
        .with_notifier(notifier.clone())
        .with_confirm(confirm.clone());
    Harness {
        manager,
        service,
        notifier,
        confirm,
    }
}

fn ids(manager: &RecordManager<docket_core::DynamicRecord>) -> Vec<RecordId> {
    manager.collection().iter().map(|r| r.id()).collect()
}

// ============ refresh ============

#[tokio::test]
async fn refresh_loads_collection() {
    let mut h = harness(MockService::new(sample_cases()), vec![]);
    let count = h.manager.refresh().await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(h.notifier.events(), vec!["loading: Loading records...", "hide"]);

    let view = h.manager.view();
    assert_eq!(view.total, 3);
}

#[tokio::test]
async fn refresh_failure_notifies_and_keeps_collection() {
    let mut h = harness(
        MockService::new(sample_cases()).with_failure(ServiceError::Transport("connection refused".into())),
        vec![],
    );
    let err = h.manager.refresh().await.unwrap_err();
    assert_eq!(err, ManagerError::Service(ServiceError::Transport("connection refused".into())));
    assert!(h.manager.collection().is_empty());
    assert_eq!(h.notifier.errors(), vec!["connection refused"]);
}

// ============ create ============

#[tokio::test]
async fn create_appends_returned_record_once() {
    let mut h = harness(MockService::new(sample_cases()), vec![true]);
    h.manager.refresh().await.unwrap();

    h.manager.open_add().unwrap();
    let drawer = h.manager.drawer_mut();
    drawer.set_field("case_number", "CV-0100");
    drawer.set_field("branch", "RTC 9");
    drawer.set_field("filed_on", "2024-05-05");
    assert!(drawer.next());

    let event = h.manager.submit().await.unwrap();
    assert!(matches!(event, DrawerEvent::Created(_)));
    assert_eq!(ids(&h.manager), vec![RecordId::Int(1), RecordId::Int(3), RecordId::Int(4), RecordId::Int(5)]);
    assert!(!h.manager.drawer().is_open());
    assert_eq!(h.notifier.successes(), vec!["Case added successfully"]);
    assert_eq!(h.confirm.prompts(), vec!["Add this case?"]);
}

#[tokio::test]
async fn create_failure_leaves_collection_and_drawer() {
    let mut h = harness(MockService::new(vec![]).with_failure(ServiceError::Unavailable), vec![true]);
    h.manager.open_add().unwrap();
    let drawer = h.manager.drawer_mut();
    drawer.set_field("case_number", "CV-0100");
    drawer.set_field("branch", "RTC 9");
    assert!(drawer.next());

    let event = h.manager.submit().await.unwrap();
    assert!(matches!(event, DrawerEvent::Failed(ServiceError::Unavailable)));
    assert!(h.manager.collection().is_empty());
    assert!(h.manager.drawer().is_open());
    assert_eq!(h.manager.drawer().step(), DrawerStep::Review);
    assert!(!h.manager.drawer().is_submitting());
    assert_eq!(h.notifier.errors(), vec![docket_core::GENERIC_FAILURE_MESSAGE]);
    assert_eq!(h.service.call_log(), vec!["create"]);
}

// ============ edit ============

#[tokio::test]
async fn edit_replaces_record_in_place() {
    let mut h = harness(MockService::new(sample_cases()), vec![true]);
    h.manager.refresh().await.unwrap();

    h.manager.open_edit(&RecordId::Int(3)).unwrap();
    let drawer = h.manager.drawer_mut();
    assert_eq!(drawer.form().get("filed_on"), "2024-02-14");
    drawer.set_field("branch", "RTC 11");
    assert!(drawer.next());

    let event = h.manager.submit().await.unwrap();
    assert!(matches!(event, DrawerEvent::Updated(_)));
    assert_eq!(ids(&h.manager), vec![RecordId::Int(1), RecordId::Int(3), RecordId::Int(4)]);
    let branch = h
        .manager
        .collection()
        .get(&RecordId::Int(3))
        .map(|r| r.field("branch").to_string());
    assert_eq!(branch.as_deref(), Some("RTC 11"));
    assert_eq!(h.service.call_log(), vec!["fetch_all", "update 3"]);
}

#[tokio::test]
async fn edit_unknown_record_is_not_found() {
    let mut h = harness(MockService::new(sample_cases()), vec![]);
    h.manager.refresh().await.unwrap();
    let err = h.manager.open_edit(&RecordId::Int(2)).unwrap_err();
    assert_eq!(err, ManagerError::NotFound(RecordId::Int(2)));
}

// ============ delete ============

#[tokio::test]
async fn delete_after_confirmation() {
    let mut h = harness(MockService::new(sample_cases()), vec![true]);
    h.manager.refresh().await.unwrap();

    assert!(h.manager.delete(&RecordId::Int(1)).await.unwrap());
    assert_eq!(ids(&h.manager), vec![RecordId::Int(3), RecordId::Int(4)]);
    assert_eq!(h.confirm.prompts(), vec!["Delete this case?"]);
    assert_eq!(h.notifier.successes(), vec!["Case deleted successfully"]);
}

#[tokio::test]
async fn declined_delete_does_nothing() {
    let mut h = harness(MockService::new(sample_cases()), vec![false]);
    h.manager.refresh().await.unwrap();

    assert!(!h.manager.delete(&RecordId::Int(1)).await.unwrap());
    assert_eq!(h.manager.collection().len(), 3);
    assert_eq!(h.service.call_log(), vec!["fetch_all"]);
}

#[tokio::test]
async fn stale_delete_surfaces_as_service_error() {
    let service = MockService::new(sample_cases());
    let mut h = harness(service, vec![true]);
    h.manager.refresh().await.unwrap();

    // Another session removed the record behind our back
    h.service.store.replace(vec![]);

    let err = h.manager.delete(&RecordId::Int(4)).await.unwrap_err();
    assert_eq!(err, ManagerError::Service(ServiceError::NotFound(RecordId::Int(4))));
    assert_eq!(h.notifier.errors(), vec!["Record 4 was not found"]);
    assert_eq!(h.manager.collection().len(), 3);
}

// ============ permissions ============

#[tokio::test]
async fn viewer_cannot_mutate() {
    let mut h = harness(MockService::new(sample_cases()), vec![true]);
    h.manager = h
        .manager
        .with_actor(Actor::new("guest", PermissionSet::read_only()));
    h.manager.refresh().await.unwrap();

    assert!(h.manager.row_actions().is_empty());
    assert!(matches!(
        h.manager.open_add(),
        Err(ManagerError::PermissionDenied { permission: Permission::Create, .. })
    ));
    let err = h.manager.delete(&RecordId::Int(1)).await.unwrap_err();
    assert_eq!(err.to_string(), "guest is not allowed to delete records");
    assert!(h.confirm.prompts().is_empty());
}

// ============ table integration ============

#[tokio::test]
async fn filters_apply_to_managed_collection() {
    let mut h = harness(MockService::new(sample_cases()), vec![]);
    h.manager.refresh().await.unwrap();
    h.manager
        .table_mut()
        .set_filter("branch", FilterValue::text("rtc 1"))
        .unwrap();

    let view = h.manager.view();
    let shown: Vec<RecordId> = view.rows.iter().map(|r| r.id()).collect();
    assert_eq!(shown, vec![RecordId::Int(1), RecordId::Int(4)]);
}

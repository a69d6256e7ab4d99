//! Common test utilities and mocks

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use docket_core::{
    ConfirmPrompt, DynamicRecord, FormData, Notifier, RecordId, RecordService, ServiceError,
    ServiceResult,
};
use docket_forms::{Drawer, FieldConfig, FormSchema};
use docket_services::MemoryStore;
use docket_table::{ColumnDef, FilterField, FilterSchema, RecordTable};

/// Record service that delegates to a `MemoryStore` and can be told to
/// fail every call.
pub struct MockService {
    pub store: MemoryStore<DynamicRecord>,
    pub failure: Option<ServiceError>,
    /// Log of every call, for assertions in tests
    pub call_log: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl MockService {
    pub fn new(records: Vec<DynamicRecord>) -> Self {
        Self {
            store: MemoryStore::with_records(records),
            failure: None,
            call_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(mut self, error: ServiceError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().clone()
    }

    fn check(&self, call: String) -> ServiceResult<()> {
        self.call_log.lock().push(call);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordService<DynamicRecord> for MockService {
    async fn fetch_all(&self) -> ServiceResult<Vec<DynamicRecord>> {
        self.check("fetch_all".into())?;
        self.store.fetch_all().await
    }

    async fn create(&self, payload: &FormData) -> ServiceResult<DynamicRecord> {
        self.check("create".into())?;
        self.store.create(payload).await
    }

    async fn update(&self, id: &RecordId, payload: &FormData) -> ServiceResult<DynamicRecord> {
        self.check(format!("update {}", id))?;
        self.store.update(id, payload).await
    }

    async fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        self.check(format!("delete {}", id))?;
        self.store.delete(id).await
    }
}

/// Notifier that keeps every message it was shown
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: parking_lot::Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("error: ").map(str::to_string))
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("success: ").map(str::to_string))
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show_success(&self, message: &str) {
        self.events.lock().push(format!("success: {}", message));
    }

    fn show_error(&self, message: &str) {
        self.events.lock().push(format!("error: {}", message));
    }

    fn show_loading(&self, message: &str) {
        self.events.lock().push(format!("loading: {}", message));
    }

    fn hide_popup(&self) {
        self.events.lock().push("hide".into());
    }
}

/// Confirmation prompt answering from a script; declines once exhausted
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: parking_lot::Mutex<VecDeque<bool>>,
    pub prompts: parking_lot::Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: parking_lot::Mutex::new(answers.into_iter().collect()),
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ConfirmPrompt for ScriptedConfirm {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().push(message.to_string());
        self.answers.lock().pop_front().unwrap_or(false)
    }
}

pub fn case(id: i64, branch: &str, filed_on: &str) -> DynamicRecord {
    DynamicRecord::new(id)
        .with("case_number", format!("CV-{:04}", id))
        .with("branch", branch)
        .with("filed_on", filed_on)
}

pub fn sample_cases() -> Vec<DynamicRecord> {
    vec![
        case(1, "RTC 1", "2024-01-10"),
        case(3, "RTC 2", "2024-02-14"),
        case(4, "RTC 1", "2024-03-01"),
    ]
}

pub fn case_table() -> RecordTable<DynamicRecord> {
    RecordTable::new(vec![
        ColumnDef::new("case_number", "Case No.").sortable().into(),
        ColumnDef::new("branch", "Branch").sortable().into(),
        ColumnDef::new("filed_on", "Filed On").sortable().into(),
    ])
    .with_filter_schema(FilterSchema::new(vec![
        FilterField::text("branch", "Branch"),
        FilterField::date_range("filed_on", "Filed On"),
    ]))
}

pub fn case_drawer() -> Drawer<DynamicRecord> {
    let schema = FormSchema::new(vec![
        FieldConfig::text("case_number", "Case No.").required(),
        FieldConfig::text("branch", "Branch").required(),
        FieldConfig::date("filed_on", "Filed On").required(),
    ])
    .expect("valid schema");
    Drawer::new("Case", schema)
}

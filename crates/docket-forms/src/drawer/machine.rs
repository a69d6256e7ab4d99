//! Two-step form/review drawer
//!
//! ```text
//!            next() [valid]            confirm + dispatch
//!   ┌──────┐ ─────────────▶ ┌────────┐ ──────────────────▶ closed
//!   │ Form │                │ Review │
//!   └──────┘ ◀───────────── └────────┘ ◀── failure (stay, no retry)
//!                back()
//! ```
//!
//! Every submission gets a monotonic request id. A response is applied
//! only while the drawer is still waiting on that id; anything else is
//! discarded, so closing or reopening the drawer mid-flight never lets a
//! late response mutate the new state.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use docket_core::{
    ConfirmPrompt, FormData, Notifier, Record, RecordId, RecordService, ServiceError,
    ServiceResult,
};
use thiserror::Error;

use crate::schema::{FieldErrors, FormSchema};

/// Current step of an open drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerStep {
    #[default]
    Form,
    Review,
}

/// Whether the drawer is creating a record or editing one
#[derive(Debug, Clone, PartialEq)]
pub enum DrawerMode<R> {
    Add,
    Edit(R),
}

impl<R: Record> DrawerMode<R> {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Id of the record being edited
    pub fn target(&self) -> Option<RecordId> {
        match self {
            Self::Add => None,
            Self::Edit(record) => Some(record.id()),
        }
    }
}

/// Lifecycle of the latest submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending(u64),
    Succeeded(u64),
    Failed(u64),
}

/// Reasons a submission cannot start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawerError {
    #[error("the drawer is not open")]
    Closed,

    #[error("review the form before submitting")]
    NotInReview,

    #[error("a submission is already in progress")]
    Busy,
}

/// Outcome of a submission, reported to the owning view
#[derive(Debug, Clone, PartialEq)]
pub enum DrawerEvent<R> {
    Created(R),
    Updated(R),
    /// The service rejected the request; the drawer stays in review
    Failed(ServiceError),
    /// The user declined the confirmation prompt
    Declined,
    /// The response belonged to a request the drawer no longer waits on
    Discarded,
}

/// A dispatched-or-about-to-be-dispatched submission
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    request_id: u64,
    target: Option<RecordId>,
    payload: FormData,
}

impl SubmitTicket {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn target(&self) -> Option<&RecordId> {
        self.target.as_ref()
    }

    pub fn payload(&self) -> &FormData {
        &self.payload
    }

    /// Call create or update depending on whether a record is targeted
    #[tracing::instrument(level = "debug", skip_all, fields(request_id = self.request_id))]
    pub async fn dispatch<R, S>(&self, service: &S) -> ServiceResult<R>
    where
        R: Record,
        S: RecordService<R> + ?Sized,
    {
        match &self.target {
            Some(id) => service.update(id, &self.payload).await,
            None => service.create(&self.payload).await,
        }
    }
}

/// Extra whole-form validation run after the per-field checks
pub type FormValidator = Arc<dyn Fn(&FormData) -> FieldErrors + Send + Sync>;

/// CRUD drawer for one record type
pub struct Drawer<R> {
    title: String,
    schema: FormSchema,
    validator: Option<FormValidator>,
    open: bool,
    step: DrawerStep,
    mode: DrawerMode<R>,
    form: FormData,
    errors: FieldErrors,
    request: RequestState,
    last_request_id: u64,
}

impl<R: fmt::Debug> fmt::Debug for Drawer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawer")
            .field("title", &self.title)
            .field("open", &self.open)
            .field("step", &self.step)
            .field("mode", &self.mode)
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl<R: Record> Drawer<R> {
    /// Create a closed drawer; `title` names the record type in messages
    pub fn new(title: impl Into<String>, schema: FormSchema) -> Self {
        Self {
            title: title.into(),
            schema,
            validator: None,
            open: false,
            step: DrawerStep::Form,
            mode: DrawerMode::Add,
            form: FormData::new(),
            errors: FieldErrors::new(),
            request: RequestState::Idle,
            last_request_id: 0,
        }
    }

    /// Add a whole-form rule (e.g. one field must not precede another)
    pub fn with_validator(
        mut self,
        validator: impl Fn(&FormData) -> FieldErrors + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> DrawerStep {
        self.step
    }

    pub fn mode(&self) -> &DrawerMode<R> {
        &self.mode
    }

    pub fn editing(&self) -> Option<&R> {
        match &self.mode {
            DrawerMode::Edit(record) => Some(record),
            DrawerMode::Add => None,
        }
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn request_state(&self) -> RequestState {
        self.request
    }

    /// True while a dispatched request has not completed
    pub fn is_submitting(&self) -> bool {
        matches!(self.request, RequestState::Pending(_))
    }

    /// Open an empty form, dated today
    pub fn open_add(&mut self) {
        self.open_add_on(chrono::Local::now().date_naive());
    }

    /// Open an empty form with `today` as the date default
    pub fn open_add_on(&mut self, today: NaiveDate) {
        let form = self.schema.defaults(today);
        self.reset(DrawerMode::Add, form);
        tracing::debug!(title = %self.title, "drawer opened for add");
    }

    /// Open the form pre-populated from `record`
    pub fn open_edit(&mut self, record: R) {
        let form = self.schema.from_record(&record);
        let id = record.id();
        self.reset(DrawerMode::Edit(record), form);
        tracing::debug!(title = %self.title, %id, "drawer opened for edit");
    }

    fn reset(&mut self, mode: DrawerMode<R>, form: FormData) {
        self.open = true;
        self.step = DrawerStep::Form;
        self.mode = mode;
        self.form = form;
        self.errors.clear();
        self.request = RequestState::Idle;
    }

    /// Update one field, clearing that field's error if it has one
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.form.set(name, value);
        if self.errors.remove(name) {
            tracing::trace!(field = name, "cleared field error");
        }
    }

    /// Run validation without moving
    pub fn validate(&self) -> FieldErrors {
        let mut errors = self.schema.validate(&self.form);
        if let Some(validator) = &self.validator {
            errors.merge(validator(&self.form));
        }
        errors
    }

    /// Form → Review when the form validates; otherwise the field errors
    /// are populated and the drawer stays on the form
    pub fn next(&mut self) -> bool {
        if !self.open || self.step != DrawerStep::Form {
            return false;
        }
        let errors = self.validate();
        if !errors.is_empty() {
            tracing::debug!(title = %self.title, errors = errors.len(), "form did not validate");
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        self.step = DrawerStep::Review;
        true
    }

    /// Review → Form, keeping the entered data
    pub fn back(&mut self) -> bool {
        if !self.open || self.step != DrawerStep::Review {
            return false;
        }
        self.step = DrawerStep::Form;
        true
    }

    /// Close the drawer; an outstanding request becomes stale
    pub fn close(&mut self) {
        if self.is_submitting() {
            tracing::debug!(title = %self.title, "drawer closed with a request in flight");
        }
        self.open = false;
        self.step = DrawerStep::Form;
        self.mode = DrawerMode::Add;
        self.form = FormData::new();
        self.errors.clear();
        self.request = RequestState::Idle;
    }

    /// Review labels and values, in field order
    pub fn review_rows(&self) -> Vec<(&str, &str)> {
        self.schema
            .fields()
            .iter()
            .map(|field| (field.label.as_str(), self.form.get(&field.name)))
            .collect()
    }

    /// Prompt shown before submitting
    pub fn confirm_message(&self) -> String {
        if self.mode.is_edit() {
            format!("Save changes to this {}?", self.title.to_lowercase())
        } else {
            format!("Add this {}?", self.title.to_lowercase())
        }
    }

    /// Mark a submission as pending and hand out its ticket.
    ///
    /// The submitting flag is set here, before any await, so a second
    /// call is refused until this request completes.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, DrawerError> {
        if !self.open {
            return Err(DrawerError::Closed);
        }
        if self.is_submitting() {
            return Err(DrawerError::Busy);
        }
        if self.step != DrawerStep::Review {
            return Err(DrawerError::NotInReview);
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.request = RequestState::Pending(request_id);
        tracing::debug!(title = %self.title, request_id, "submission started");

        Ok(SubmitTicket {
            request_id,
            target: self.mode.target(),
            payload: self.form.clone(),
        })
    }

    /// Apply the result of a dispatched ticket
    pub fn complete(
        &mut self,
        ticket: &SubmitTicket,
        result: ServiceResult<R>,
        notifier: &dyn Notifier,
    ) -> DrawerEvent<R> {
        if self.request != RequestState::Pending(ticket.request_id) {
            tracing::debug!(
                request_id = ticket.request_id,
                state = ?self.request,
                "discarding stale response"
            );
            return DrawerEvent::Discarded;
        }

        notifier.hide_popup();
        match result {
            Ok(record) => {
                let event = if ticket.target.is_some() {
                    notifier.show_success(&format!("{} updated successfully", self.title));
                    DrawerEvent::Updated(record)
                } else {
                    notifier.show_success(&format!("{} added successfully", self.title));
                    DrawerEvent::Created(record)
                };
                self.close();
                self.request = RequestState::Succeeded(ticket.request_id);
                event
            }
            Err(error) => {
                tracing::warn!(
                    title = %self.title,
                    request_id = ticket.request_id,
                    %error,
                    "submission failed"
                );
                notifier.show_error(&error.user_message());
                self.request = RequestState::Failed(ticket.request_id);
                DrawerEvent::Failed(error)
            }
        }
    }

    /// Confirm, dispatch and complete in one call
    pub async fn submit<S>(
        &mut self,
        service: &S,
        confirm: &dyn ConfirmPrompt,
        notifier: &dyn Notifier,
    ) -> Result<DrawerEvent<R>, DrawerError>
    where
        S: RecordService<R> + ?Sized,
    {
        if !self.open {
            return Err(DrawerError::Closed);
        }
        if self.is_submitting() {
            return Err(DrawerError::Busy);
        }
        if self.step != DrawerStep::Review {
            return Err(DrawerError::NotInReview);
        }

        if !confirm.confirm(&self.confirm_message()).await {
            tracing::debug!(title = %self.title, "submission declined");
            return Ok(DrawerEvent::Declined);
        }

        let ticket = self.begin_submit()?;
        notifier.show_loading("Saving...");
        let result = ticket.dispatch(service).await;
        Ok(self.complete(&ticket, result, notifier))
    }
}

//! The owning view for one record type
//!
//! `RecordManager` is the only holder of persistent record state. The
//! table derives pages from its collection and the drawer reports
//! completed submissions back to it, where they are folded into the
//! collection.

use std::sync::Arc;

use docket_core::{
    Actor, ConfirmPrompt, FixedConfirm, Notifier, Permission, Record, RecordId, RecordService,
    ServiceError, TracingNotifier,
};
use docket_forms::{Drawer, DrawerError, DrawerEvent};
use docket_table::{Collection, RecordTable, RowAction, TableView};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("{actor} is not allowed to {} records", .permission.label().to_lowercase())]
    PermissionDenied { actor: String, permission: Permission },

    #[error("Record {0} is not in the current list")]
    NotFound(RecordId),

    #[error(transparent)]
    Drawer(#[from] DrawerError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Collection, table, drawer and collaborators for one record type
pub struct RecordManager<R: Record> {
    service: Arc<dyn RecordService<R>>,
    confirm: Arc<dyn ConfirmPrompt>,
    notifier: Arc<dyn Notifier>,
    actor: Actor,
    collection: Collection<R>,
    table: RecordTable<R>,
    drawer: Drawer<R>,
}

impl<R: Record> RecordManager<R> {
    /// Create a manager with an empty collection.
    ///
    /// Until configured otherwise, the actor is the system actor, every
    /// confirmation is declined and notifications only go to tracing.
    pub fn new(service: Arc<dyn RecordService<R>>, table: RecordTable<R>, drawer: Drawer<R>) -> Self {
        Self {
            service,
            confirm: Arc::new(FixedConfirm(false)),
            notifier: Arc::new(TracingNotifier),
            actor: Actor::system(),
            collection: Collection::new(),
            table,
            drawer,
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_confirm(mut self, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }

    pub fn table(&self) -> &RecordTable<R> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RecordTable<R> {
        &mut self.table
    }

    pub fn drawer(&self) -> &Drawer<R> {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut Drawer<R> {
        &mut self.drawer
    }

    /// Derive the current page of the table
    pub fn view(&mut self) -> TableView<'_, R> {
        self.table.view(&self.collection)
    }

    /// Row actions available to the current actor
    pub fn row_actions(&self) -> Vec<RowAction> {
        self.table.row_actions(&self.actor)
    }

    fn require(&self, permission: Permission) -> ManagerResult<()> {
        if self.actor.can(permission) {
            return Ok(());
        }
        tracing::warn!(actor = %self.actor.name, permission = permission.label(), "permission denied");
        Err(ManagerError::PermissionDenied {
            actor: self.actor.name.clone(),
            permission,
        })
    }

    /// Replace the collection with a fresh fetch
    #[tracing::instrument(skip(self), fields(title = self.drawer.title()))]
    pub async fn refresh(&mut self) -> ManagerResult<usize> {
        self.require(Permission::View)?;
        self.notifier.show_loading("Loading records...");
        let result = self.service.fetch_all().await;
        self.notifier.hide_popup();

        match result {
            Ok(records) => {
                let count = records.len();
                self.collection.replace_all(records);
                tracing::info!(count, "records loaded");
                Ok(count)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load records");
                self.notifier.show_error(&error.user_message());
                Err(error.into())
            }
        }
    }

    /// Open the drawer on an empty form
    pub fn open_add(&mut self) -> ManagerResult<()> {
        self.require(Permission::Create)?;
        self.drawer.open_add();
        Ok(())
    }

    /// Open the drawer on the record with `id`
    pub fn open_edit(&mut self, id: &RecordId) -> ManagerResult<()> {
        self.require(Permission::Edit)?;
        let record = self
            .collection
            .get(id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound(id.clone()))?;
        self.drawer.open_edit(record);
        Ok(())
    }

    /// Submit the drawer and fold a successful result into the collection
    #[tracing::instrument(skip(self), fields(title = self.drawer.title()))]
    pub async fn submit(&mut self) -> ManagerResult<DrawerEvent<R>> {
        let event = self
            .drawer
            .submit(self.service.as_ref(), self.confirm.as_ref(), self.notifier.as_ref())
            .await?;

        match &event {
            DrawerEvent::Created(record) => {
                let id = self.collection.on_create(record.clone());
                tracing::info!(%id, "record created");
            }
            DrawerEvent::Updated(record) => {
                if self.collection.on_update(record.clone()) {
                    tracing::info!(id = %record.id(), "record updated");
                }
            }
            DrawerEvent::Failed(_) | DrawerEvent::Declined | DrawerEvent::Discarded => {}
        }
        Ok(event)
    }

    /// Delete the record with `id` after confirmation.
    ///
    /// Returns `Ok(false)` when the user declined.
    #[tracing::instrument(skip(self), fields(title = self.drawer.title()))]
    pub async fn delete(&mut self, id: &RecordId) -> ManagerResult<bool> {
        self.require(Permission::Delete)?;
        if !self.collection.contains(id) {
            return Err(ManagerError::NotFound(id.clone()));
        }

        let title = self.drawer.title().to_lowercase();
        if !self.confirm.confirm(&format!("Delete this {}?", title)).await {
            tracing::debug!("delete declined");
            return Ok(false);
        }

        self.notifier.show_loading("Deleting...");
        let result = self.service.delete(id).await;
        self.notifier.hide_popup();

        match result {
            Ok(()) => {
                self.collection.on_delete(id);
                self.notifier
                    .show_success(&format!("{} deleted successfully", self.drawer.title()));
                tracing::info!("record deleted");
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(%error, "delete failed");
                self.notifier.show_error(&error.user_message());
                Err(error.into())
            }
        }
    }
}

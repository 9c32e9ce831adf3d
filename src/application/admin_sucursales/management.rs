use crate::application::admin_sucursales::delete::{DeleteDialog, DeleteOutcome, NOT_AVAILABLE};
use crate::application::admin_sucursales::form::{AdminSucursalForm, Mode, SubmitOutcome};
use crate::domain::admin_sucursales::{AdminSucursal, AdminSucursalRepository};
use crate::domain::sucursales::SucursalRepository;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const MSG_LOAD_FAILED: &str = "Error al cargar los administradores de sucursal";
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(4000);

/// Which slice of the collection the screen lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    All,
    Active,
    Branch(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// At most one dialog is open at a time.
pub enum Modal {
    Closed,
    Form(Box<AdminSucursalForm>),
    View(AdminSucursal),
    Delete(DeleteDialog),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Status message that disappears on its own after `ttl`.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    pub const ALL: [RowAction; 3] = [RowAction::View, RowAction::Edit, RowAction::Delete];

    pub fn label(self) -> &'static str {
        match self {
            RowAction::View => "Ver",
            RowAction::Edit => "Editar",
            RowAction::Delete => "Eliminar",
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSucursalRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub branch: String,
    pub status: &'static str,
    pub actions: [RowAction; 3],
}

impl From<&AdminSucursal> for AdminSucursalRow {
    fn from(admin: &AdminSucursal) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            branch: admin
                .branch_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: admin.status_label(),
            actions: RowAction::ALL,
        }
    }
}

/// Management screen: owns the collection, the open dialog and the
/// notification. Every successful write is followed by a full re-fetch.
pub struct AdminSucursalManager {
    admins: Arc<dyn AdminSucursalRepository>,
    branches: Arc<dyn SucursalRepository>,
    scope: ListScope,
    phase: Phase,
    records: Vec<AdminSucursal>,
    modal: Modal,
    notification: Option<Notification>,
    notification_ttl: Duration,
    filter: String,
}

impl AdminSucursalManager {
    pub fn new(
        admins: Arc<dyn AdminSucursalRepository>,
        branches: Arc<dyn SucursalRepository>,
    ) -> Self {
        Self {
            admins,
            branches,
            scope: ListScope::All,
            phase: Phase::Loading,
            records: Vec::new(),
            modal: Modal::Closed,
            notification: None,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            filter: String::new(),
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn with_scope(mut self, scope: ListScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn records(&self) -> &[AdminSucursal] {
        &self.records
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn form(&self) -> Option<&AdminSucursalForm> {
        match &self.modal {
            Modal::Form(form) => Some(form.as_ref()),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut AdminSucursalForm> {
        match &mut self.modal {
            Modal::Form(form) => Some(form.as_mut()),
            _ => None,
        }
    }

    pub fn viewed(&self) -> Option<&AdminSucursal> {
        match &self.modal {
            Modal::View(record) => Some(record),
            _ => None,
        }
    }

    pub fn delete_dialog(&self) -> Option<&DeleteDialog> {
        match &self.modal {
            Modal::Delete(dialog) => Some(dialog),
            _ => None,
        }
    }

    /// Fetch the whole collection. A failure renders as an empty list plus
    /// an error notification.
    pub async fn load(&mut self) {
        self.phase = Phase::Loading;
        let result = match self.scope {
            ListScope::All => self.admins.list().await,
            ListScope::Active => self.admins.list_active().await,
            ListScope::Branch(branch_id) => self.admins.list_by_branch(branch_id).await,
        };
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "branch administrators loaded");
                self.records = records;
            }
            Err(e) => {
                self.records.clear();
                if !e.is_unauthorized() {
                    tracing::error!(error = %e, "failed to load branch administrators");
                    self.notify(NotificationKind::Error, MSG_LOAD_FAILED);
                }
            }
        }
        self.phase = Phase::Ready;
    }

    fn find(&self, id: i64) -> Result<AdminSucursal, AppError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("administrador de sucursal {id}")))
    }

    async fn open_form(&mut self, mode: Mode) {
        let mut form = AdminSucursalForm::new(mode, self.admins.clone(), self.branches.clone());
        form.mount().await;
        self.modal = Modal::Form(Box::new(form));
    }

    pub async fn open_create(&mut self) {
        self.open_form(Mode::Create).await;
    }

    pub async fn open_edit(&mut self, id: i64) -> Result<(), AppError> {
        let record = self.find(id)?;
        self.open_form(Mode::Edit(record)).await;
        Ok(())
    }

    pub fn open_view(&mut self, id: i64) -> Result<(), AppError> {
        self.modal = Modal::View(self.find(id)?);
        Ok(())
    }

    pub fn open_delete(&mut self, id: i64) -> Result<(), AppError> {
        let record = self.find(id)?;
        self.modal = Modal::Delete(DeleteDialog::new(record, self.admins.clone()));
        Ok(())
    }

    /// Close whatever is open. Returns `false` if the open delete dialog
    /// refused because its request is still in flight.
    pub fn close_modal(&mut self) -> bool {
        if let Modal::Delete(dialog) = &self.modal {
            if !dialog.close() {
                return false;
            }
        }
        self.modal = Modal::Closed;
        true
    }

    /// Submit the open form. `None` when no form is open.
    pub async fn submit_form(&mut self) -> Option<SubmitOutcome> {
        let Modal::Form(form) = &mut self.modal else {
            return None;
        };
        let outcome = form.submit().await;
        if let SubmitOutcome::Saved(message) = &outcome {
            self.after_write(message.clone()).await;
        }
        Some(outcome)
    }

    /// Confirm the open delete dialog. `None` when no dialog is open.
    pub async fn confirm_delete(&mut self) -> Option<DeleteOutcome> {
        let Modal::Delete(dialog) = &self.modal else {
            return None;
        };
        let outcome = dialog.confirm().await;
        if let DeleteOutcome::Deleted(message) = &outcome {
            self.after_write(message.clone()).await;
        }
        Some(outcome)
    }

    /// Reload after a successful write. A failed reload keeps its error
    /// notification instead of the success message.
    async fn after_write(&mut self, message: String) {
        self.notification = None;
        self.load().await;
        self.close_modal();
        if self.notification.is_none() {
            self.notify(NotificationKind::Success, message);
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
            ttl: self.notification_ttl,
        });
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Instant::now())
    }

    pub fn notification_at(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| !n.is_expired(now))
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    /// Rows matching the current filter on username, email or branch name.
    pub fn rows(&self) -> Vec<AdminSucursalRow> {
        let needle = self.filter.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.username.to_lowercase().contains(&needle)
                    || r.email.to_lowercase().contains(&needle)
                    || r
                        .branch_name
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
            })
            .map(AdminSucursalRow::from)
            .collect()
    }
}

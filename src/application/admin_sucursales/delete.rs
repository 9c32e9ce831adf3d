use crate::domain::admin_sucursales::{AdminSucursal, AdminSucursalRepository};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const MSG_DELETED: &str = "Administrador de sucursal eliminado exitosamente";
pub const MSG_DELETE_FAILED: &str = "Error al eliminar el administrador de sucursal";
pub const NOT_AVAILABLE: &str = "No disponible";

/// What the dialog shows about the record before the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteContext {
    pub username: String,
    pub email: String,
    pub branch: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    Failed(String),
    SessionExpired,
    /// A delete for this dialog is already in flight.
    Busy,
}

#[derive(Debug)]
struct DialogState {
    open: bool,
    pending: bool,
    error: Option<String>,
}

/// Confirmation step in front of a hard delete.
///
/// State sits behind a mutex so `close` can be attempted while `confirm` is
/// still awaiting the server; the dialog refuses to close until the request
/// settles.
pub struct DeleteDialog {
    record: AdminSucursal,
    repo: Arc<dyn AdminSucursalRepository>,
    state: Mutex<DialogState>,
}

impl DeleteDialog {
    pub fn new(record: AdminSucursal, repo: Arc<dyn AdminSucursalRepository>) -> Self {
        Self {
            record,
            repo,
            state: Mutex::new(DialogState {
                open: true,
                pending: false,
                error: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self) -> &AdminSucursal {
        &self.record
    }

    pub fn context(&self) -> DeleteContext {
        DeleteContext {
            username: self.record.username.clone(),
            email: self.record.email.clone(),
            branch: self
                .record
                .branch_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: self.record.status_label(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Dismiss the dialog. Returns `false`, leaving it open, while the delete
    /// request is in flight.
    pub fn close(&self) -> bool {
        let mut state = self.state();
        if state.pending {
            tracing::debug!(id = self.record.id, "close ignored while delete is pending");
            return false;
        }
        state.open = false;
        true
    }

    /// Perform the delete. The dialog stays open either way; on success the
    /// owner is expected to dismiss it.
    pub async fn confirm(&self) -> DeleteOutcome {
        {
            let mut state = self.state();
            if state.pending {
                return DeleteOutcome::Busy;
            }
            state.pending = true;
            state.error = None;
        }

        let result = self.repo.delete(self.record.id).await;

        let mut state = self.state();
        state.pending = false;
        match result {
            Ok(()) => DeleteOutcome::Deleted(MSG_DELETED.to_string()),
            Err(e) if e.is_unauthorized() => DeleteOutcome::SessionExpired,
            Err(e) => {
                tracing::error!(id = self.record.id, error = %e, "failed to delete branch administrator");
                let message = e.user_message(MSG_DELETE_FAILED);
                state.error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}

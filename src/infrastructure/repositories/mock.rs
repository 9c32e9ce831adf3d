use crate::domain::admin_sucursales::{
    AdminSucursal, AdminSucursalRepository, NewAdminSucursal, UpdateAdminSucursal,
};
use crate::domain::sucursales::{Sucursal, SucursalRepository};
use crate::shared::error::{AppError, ErrorEnvelope};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    List,
    FindById,
    ListActive,
    ListByBranch,
    Create,
    Update,
    Delete,
}

/// Call as seen by the repository; write payloads are kept as the JSON that
/// would have gone over the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List,
    FindById(i64),
    ListActive,
    ListByBranch(i64),
    Create(Value),
    Update(i64, Value),
    Delete(i64),
}

#[derive(Debug, Clone)]
pub enum MockFailure {
    Unauthorized,
    Api { status: u16, message: Option<String> },
}

impl MockFailure {
    fn into_error(self) -> AppError {
        match self {
            MockFailure::Unauthorized => AppError::Unauthorized,
            MockFailure::Api { status, message } => AppError::Api {
                status,
                body: message.map(|message| ErrorEnvelope {
                    message: Some(message),
                    ..ErrorEnvelope::default()
                }),
            },
        }
    }
}

#[derive(Clone, Default)]
pub struct MockAdminSucursalRepository {
    admins: Arc<Mutex<BTreeMap<i64, AdminSucursal>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failures: Arc<Mutex<HashMap<MockOp, MockFailure>>>,
    delete_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl MockAdminSucursalRepository {
    pub fn with_admins(admins: Vec<AdminSucursal>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.admins.lock().unwrap();
            for admin in admins {
                map.insert(admin.id, admin);
            }
        }
        repo
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that would have written to the server.
    pub fn writes(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    RecordedCall::Create(_) | RecordedCall::Update(..) | RecordedCall::Delete(_)
                )
            })
            .collect()
    }

    pub fn admins(&self) -> Vec<AdminSucursal> {
        self.admins.lock().unwrap().values().cloned().collect()
    }

    /// Make the next call to `op` fail with `failure`.
    pub fn fail_next(&self, op: MockOp, failure: MockFailure) {
        self.failures.lock().unwrap().insert(op, failure);
    }

    /// Hold every delete until `gate` is notified.
    pub fn hold_deletes(&self, gate: Arc<Notify>) {
        *self.delete_gate.lock().unwrap() = Some(gate);
    }

    fn record(&self, op: MockOp, call: RecordedCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().remove(&op) {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::Api {
            status: 404,
            body: Some(ErrorEnvelope {
                message: Some(format!("Administrador de sucursal {id} no encontrado")),
                ..ErrorEnvelope::default()
            }),
        }
    }
}

#[async_trait]
impl AdminSucursalRepository for MockAdminSucursalRepository {
    async fn list(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.record(MockOp::List, RecordedCall::List)?;
        Ok(self.admins())
    }

    async fn find_by_id(&self, id: i64) -> Result<AdminSucursal, AppError> {
        self.record(MockOp::FindById, RecordedCall::FindById(id))?;
        self.admins
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_active(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.record(MockOp::ListActive, RecordedCall::ListActive)?;
        Ok(self.admins().into_iter().filter(|a| a.active).collect())
    }

    async fn list_by_branch(&self, branch_id: i64) -> Result<Vec<AdminSucursal>, AppError> {
        self.record(MockOp::ListByBranch, RecordedCall::ListByBranch(branch_id))?;
        Ok(self
            .admins()
            .into_iter()
            .filter(|a| a.branch_id == branch_id)
            .collect())
    }

    async fn create(&self, new_admin: NewAdminSucursal) -> Result<(), AppError> {
        let payload = serde_json::to_value(&new_admin)?;
        self.record(MockOp::Create, RecordedCall::Create(payload))?;

        let mut admins = self.admins.lock().unwrap();
        let id = admins.keys().next_back().copied().unwrap_or(0) + 1;
        let now = OffsetDateTime::now_utc();
        admins.insert(
            id,
            AdminSucursal {
                id,
                username: new_admin.username,
                email: new_admin.email,
                active: new_admin.active,
                branch_id: new_admin.branch_id,
                created_at: Some(now),
                updated_at: Some(now),
                branch_name: None,
                branch_description: None,
                branch_address: None,
            },
        );
        Ok(())
    }

    async fn update(&self, id: i64, update: UpdateAdminSucursal) -> Result<(), AppError> {
        let payload = serde_json::to_value(&update)?;
        self.record(MockOp::Update, RecordedCall::Update(id, payload))?;

        let mut admins = self.admins.lock().unwrap();
        let admin = admins.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        admin.username = update.username;
        admin.email = update.email;
        admin.active = update.active;
        admin.branch_id = update.branch_id;
        admin.updated_at = Some(OffsetDateTime::now_utc());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let gate = self.delete_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.record(MockOp::Delete, RecordedCall::Delete(id))?;
        match self.admins.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(Self::not_found(id)),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockSucursalRepository {
    branches: Arc<Mutex<Vec<Sucursal>>>,
    fail: Arc<Mutex<Option<MockFailure>>>,
}

impl MockSucursalRepository {
    pub fn with_branches(branches: Vec<Sucursal>) -> Self {
        Self {
            branches: Arc::new(Mutex::new(branches)),
            fail: Arc::default(),
        }
    }

    pub fn fail_next(&self, failure: MockFailure) {
        *self.fail.lock().unwrap() = Some(failure);
    }
}

#[async_trait]
impl SucursalRepository for MockSucursalRepository {
    async fn list_active(&self) -> Result<Vec<Sucursal>, AppError> {
        if let Some(failure) = self.fail.lock().unwrap().take() {
            return Err(failure.into_error());
        }
        Ok(self
            .branches
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.active)
            .cloned()
            .collect())
    }
}

use crate::domain::admin_sucursales::{
    AdminSucursal, AdminSucursalRepository, NewAdminSucursal, UpdateAdminSucursal,
};
use crate::domain::session::{LOGIN_PATH, Navigator, SessionStore};
use crate::domain::sucursales::{Sucursal, SucursalRepository};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

/// Tears the session down when the backend answers 401.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Pass `result` through; on `Unauthorized`, clear the stored token and
    /// identity and send the user to the login page first.
    pub fn check<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(AppError::Unauthorized) = &result {
            tracing::warn!("session rejected by the server, redirecting to login");
            self.store.clear();
            self.navigator.navigate(LOGIN_PATH);
        }
        result
    }
}

/// Repository decorator that routes every result through a [`SessionGuard`].
#[derive(Clone)]
pub struct SessionAwareRepository<R> {
    inner: R,
    guard: SessionGuard,
}

impl<R> SessionAwareRepository<R> {
    pub fn new(inner: R, guard: SessionGuard) -> Self {
        Self { inner, guard }
    }
}

#[async_trait]
impl<R: AdminSucursalRepository> AdminSucursalRepository for SessionAwareRepository<R> {
    async fn list(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.guard.check(self.inner.list().await)
    }

    async fn find_by_id(&self, id: i64) -> Result<AdminSucursal, AppError> {
        self.guard.check(self.inner.find_by_id(id).await)
    }

    async fn list_active(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.guard.check(self.inner.list_active().await)
    }

    async fn list_by_branch(&self, branch_id: i64) -> Result<Vec<AdminSucursal>, AppError> {
        self.guard.check(self.inner.list_by_branch(branch_id).await)
    }

    async fn create(&self, new_admin: NewAdminSucursal) -> Result<(), AppError> {
        self.guard.check(self.inner.create(new_admin).await)
    }

    async fn update(&self, id: i64, update: UpdateAdminSucursal) -> Result<(), AppError> {
        self.guard.check(self.inner.update(id, update).await)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.guard.check(self.inner.delete(id).await)
    }
}

#[async_trait]
impl<R: SucursalRepository> SucursalRepository for SessionAwareRepository<R> {
    async fn list_active(&self) -> Result<Vec<Sucursal>, AppError> {
        self.guard.check(self.inner.list_active().await)
    }
}

use crate::domain::admin_sucursales::{
    AdminSucursal, AdminSucursalRepository, NewAdminSucursal, UpdateAdminSucursal,
};
use crate::infrastructure::http::ApiClient;
use crate::shared::error::AppError;
use crate::shared::response::{unwrap_list, unwrap_one};
use async_trait::async_trait;
use std::sync::Arc;

const RESOURCE: &str = "admin-sucursales";

/// `/admin-sucursales` over HTTP.
#[derive(Clone)]
pub struct HttpAdminSucursalRepository {
    client: Arc<ApiClient>,
}

impl HttpAdminSucursalRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<AdminSucursal>, AppError> {
        let body = self.client.get_list(path).await?;
        Ok(unwrap_list(body, RESOURCE))
    }
}

#[async_trait]
impl AdminSucursalRepository for HttpAdminSucursalRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.fetch_list(RESOURCE).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<AdminSucursal, AppError> {
        let body = self.client.get(&format!("{RESOURCE}/{id}")).await?;
        Ok(unwrap_one(body)?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<AdminSucursal>, AppError> {
        self.fetch_list(&format!("{RESOURCE}/activos")).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_branch(&self, branch_id: i64) -> Result<Vec<AdminSucursal>, AppError> {
        self.fetch_list(&format!("{RESOURCE}/sucursal/{branch_id}"))
            .await
    }

    #[tracing::instrument(skip(self, new_admin))]
    async fn create(&self, new_admin: NewAdminSucursal) -> Result<(), AppError> {
        self.client.post(RESOURCE, &new_admin).await?;
        tracing::info!(username = %new_admin.username, "branch administrator created");
        Ok(())
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: i64, update: UpdateAdminSucursal) -> Result<(), AppError> {
        self.client
            .put(&format!("{RESOURCE}/{id}"), &update)
            .await?;
        tracing::info!(id, password_changed = update.password.is_some(), "branch administrator updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.client.delete(&format!("{RESOURCE}/{id}")).await?;
        tracing::info!(id, "branch administrator deleted");
        Ok(())
    }
}

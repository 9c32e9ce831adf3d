use crate::domain::sucursales::{Sucursal, SucursalRepository};
use crate::infrastructure::http::ApiClient;
use crate::shared::response::unwrap_list;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpSucursalRepository {
    client: Arc<ApiClient>,
}

impl HttpSucursalRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SucursalRepository for HttpSucursalRepository {
    #[tracing::instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<Sucursal>, AppError> {
        let body = self.client.get_list("sucursales/activas").await?;
        let branches: Vec<Sucursal> = unwrap_list(body, "sucursales");
        // Inactive branches are never offered in the selector.
        Ok(branches.into_iter().filter(|b| b.active).collect())
    }
}

use crate::domain::admin_sucursales::{default_active, flag};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Branch, owned by another part of the backend and only read here to fill
/// the branch selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sucursal {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "activo", default = "default_active", with = "flag")]
    pub active: bool,
}

impl Sucursal {
    /// Selector text: `Centro - Sucursal principal`, or just the name.
    pub fn display_name(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{} - {}", self.name, desc),
            _ => self.name.clone(),
        }
    }
}

#[async_trait]
pub trait SucursalRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Sucursal>, AppError>;
}

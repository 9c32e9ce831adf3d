use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

pub const STATUS_ACTIVE: &str = "Activo";
pub const STATUS_INACTIVE: &str = "Inactivo";

/// Branch administrator as returned by the backend.
///
/// The password hash never leaves the server, so it has no field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSucursal {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "activo", default = "default_active", with = "flag")]
    pub active: bool,
    #[serde(rename = "sucursal_id")]
    pub branch_id: i64,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(
        rename = "sucursal_nombre",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub branch_name: Option<String>,
    #[serde(
        rename = "sucursal_descripcion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub branch_description: Option<String>,
    #[serde(
        rename = "sucursal_direccion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub branch_address: Option<String>,
}

impl AdminSucursal {
    pub fn status_label(&self) -> &'static str {
        if self.active {
            STATUS_ACTIVE
        } else {
            STATUS_INACTIVE
        }
    }
}

/// Create payload. `confirm_password` is a form concern and never reaches it.
#[derive(Clone, Serialize)]
pub struct NewAdminSucursal {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "sucursal_id")]
    pub branch_id: i64,
}

/// Update payload. `password` is left out of the JSON unless it was changed.
#[derive(Clone, Serialize)]
pub struct UpdateAdminSucursal {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "sucursal_id")]
    pub branch_id: i64,
}

impl fmt::Debug for NewAdminSucursal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdminSucursal")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("active", &self.active)
            .field("branch_id", &self.branch_id)
            .finish()
    }
}

impl fmt::Debug for UpdateAdminSucursal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateAdminSucursal")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("active", &self.active)
            .field("branch_id", &self.branch_id)
            .finish()
    }
}

#[async_trait]
pub trait AdminSucursalRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<AdminSucursal>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<AdminSucursal, AppError>;
    async fn list_active(&self) -> Result<Vec<AdminSucursal>, AppError>;
    async fn list_by_branch(&self, branch_id: i64) -> Result<Vec<AdminSucursal>, AppError>;
    async fn create(&self, new_admin: NewAdminSucursal) -> Result<(), AppError>;
    async fn update(&self, id: i64, update: UpdateAdminSucursal) -> Result<(), AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

pub(crate) fn default_active() -> bool {
    true
}

/// Accepts `true`/`false` as well as the `1`/`0` some backends store. An
/// explicit `null` reads the same as a missing flag.
pub(crate) mod flag {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or 0/1")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
                Ok(v != 0)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
                Ok(v != 0)
            }

            fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
                Ok(super::default_active())
            }

            fn visit_none<E: de::Error>(self) -> Result<bool, E> {
                Ok(super::default_active())
            }
        }

        d.deserialize_any(FlagVisitor)
    }
}

/// RFC 3339 timestamps, also tolerating the `YYYY-MM-DD HH:MM:SS` form SQL
/// backends emit. Anything unparseable becomes `None`.
pub(crate) mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn serialize<S: Serializer>(
        value: &Option<OffsetDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => {
                let formatted = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                s.serialize_some(&formatted)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<OffsetDateTime> {
        if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(ts);
        }
        let sql = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        PrimitiveDateTime::parse(raw, &sql)
            .ok()
            .map(PrimitiveDateTime::assume_utc)
    }
}

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sucursal_admin::domain::session::SessionStore;
use sucursal_admin::infrastructure::http::ApiClient;
use sucursal_admin::infrastructure::session::MemorySessionStore;

pub const TOKEN: &str = "test-token";

/// Request as the fake backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

struct Canned {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

#[derive(Default)]
struct BackendState {
    admins: Vec<Value>,
    branches: Vec<Value>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    canned: VecDeque<Canned>,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process stand-in for the REST backend, mounted under `/api`.
///
/// Requests without `Bearer test-token` are answered with 401.
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
}

#[allow(dead_code)]
impl FakeBackend {
    pub async fn start(admins: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(BackendState {
            next_id: admins
                .iter()
                .filter_map(|a| a["id"].as_i64())
                .max()
                .unwrap_or(0)
                + 1,
            admins,
            branches: vec![
                json!({"id": 3, "nombre": "Centro", "descripcion": "Sucursal principal", "activo": true}),
                json!({"id": 4, "nombre": "Norte", "descripcion": null, "activo": 1}),
                json!({"id": 5, "nombre": "Cerrada", "activo": false}),
            ],
            ..BackendState::default()
        }));

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Answer the next `method path` with `status` and a raw body, once.
    pub fn respond_once(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.state.lock().unwrap().canned.push_back(Canned {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn admins(&self) -> Vec<Value> {
        self.state.lock().unwrap().admins.clone()
    }

    pub fn client(&self, session: Arc<dyn SessionStore>) -> Arc<ApiClient> {
        let url = self.base_url.parse().unwrap();
        Arc::new(ApiClient::new(url, Duration::from_secs(5), session).unwrap())
    }

    pub fn client_with_token(&self) -> (Arc<ApiClient>, Arc<MemorySessionStore>) {
        let session = Arc::new(MemorySessionStore::with_token(TOKEN));
        (self.client(session.clone()), session)
    }
}

#[allow(dead_code)]
pub fn admin_json(id: i64, username: &str, active: bool, branch_id: i64) -> Value {
    let branch_name = if branch_id == 3 { "Centro" } else { "Norte" };
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "activo": active,
        "sucursal_id": branch_id,
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-01-15 10:30:00",
        "sucursal_nombre": branch_name,
        "sucursal_descripcion": null,
        "sucursal_direccion": "Av. Juárez 100"
    })
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let payload: Option<Value> = serde_json::from_slice(&body).ok();

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        content_type,
        body: payload.clone(),
    });

    if let Some(pos) = state
        .canned
        .iter()
        .position(|c| c.method == method && c.path == path)
    {
        let canned = state.canned.remove(pos).unwrap();
        return (
            canned.status,
            [("content-type", "application/json")],
            canned.body,
        )
            .into_response();
    }

    let expected = format!("Bearer {TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return reply(StatusCode::UNAUTHORIZED, json!({"message": "Token inválido"}));
    }

    let segments: Vec<&str> = path
        .trim_start_matches("/api/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["sucursales", "activas"]) => {
            reply(StatusCode::OK, json!({"data": state.branches}))
        }
        ("GET", ["admin-sucursales"]) => reply(StatusCode::OK, json!({"data": state.admins})),
        ("GET", ["admin-sucursales", "activos"]) => {
            let active: Vec<&Value> = state
                .admins
                .iter()
                .filter(|a| a["activo"] == json!(true) || a["activo"] == json!(1))
                .collect();
            reply(StatusCode::OK, json!({"data": active}))
        }
        ("GET", ["admin-sucursales", "sucursal", id]) => {
            let id: i64 = id.parse().unwrap_or_default();
            let matching: Vec<&Value> = state
                .admins
                .iter()
                .filter(|a| a["sucursal_id"] == json!(id))
                .collect();
            reply(StatusCode::OK, json!({"data": matching}))
        }
        ("GET", ["admin-sucursales", id]) => {
            let id: i64 = id.parse().unwrap_or_default();
            match state.admins.iter().find(|a| a["id"] == json!(id)) {
                Some(admin) => reply(StatusCode::OK, json!({"data": admin})),
                None => reply(
                    StatusCode::NOT_FOUND,
                    json!({"message": "Administrador de sucursal no encontrado"}),
                ),
            }
        }
        ("POST", ["admin-sucursales"]) => {
            let mut admin = payload.unwrap_or_else(|| json!({}));
            if state
                .admins
                .iter()
                .any(|a| a["username"] == admin["username"])
            {
                return reply(
                    StatusCode::CONFLICT,
                    json!({"message": "El nombre de usuario ya está en uso"}),
                );
            }
            let id = state.next_id;
            state.next_id += 1;
            if let Some(obj) = admin.as_object_mut() {
                obj.remove("password");
                obj.insert("id".to_string(), json!(id));
            }
            state.admins.push(admin.clone());
            reply(
                StatusCode::CREATED,
                json!({"data": admin, "message": "Administrador creado"}),
            )
        }
        ("PUT", ["admin-sucursales", id]) => {
            let id: i64 = id.parse().unwrap_or_default();
            let patch = payload.unwrap_or_else(|| json!({}));
            match state.admins.iter_mut().find(|a| a["id"] == json!(id)) {
                Some(admin) => {
                    merge(admin, &patch);
                    if let Some(obj) = admin.as_object_mut() {
                        obj.remove("password");
                    }
                    reply(StatusCode::OK, json!({"data": admin.clone()}))
                }
                None => reply(StatusCode::NOT_FOUND, json!({"message": "No encontrado"})),
            }
        }
        ("DELETE", ["admin-sucursales", id]) => {
            let id: i64 = id.parse().unwrap_or_default();
            let before = state.admins.len();
            state.admins.retain(|a| a["id"] != json!(id));
            if state.admins.len() == before {
                reply(StatusCode::NOT_FOUND, json!({"message": "No encontrado"}))
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }
        _ => reply(StatusCode::NOT_FOUND, json!({"error": "Ruta no encontrada"})),
    }
}

use crate::common::{self, FakeBackend, TOKEN};

use axum::http::Method;
use std::sync::Arc;
use sucursal_admin::application::session::{SessionAwareRepository, SessionGuard};
use sucursal_admin::domain::admin_sucursales::AdminSucursalRepository;
use sucursal_admin::domain::session::{LOGIN_PATH, SessionStore};
use sucursal_admin::domain::sucursales::SucursalRepository;
use sucursal_admin::infrastructure::repositories::admin_sucursales::HttpAdminSucursalRepository;
use sucursal_admin::infrastructure::repositories::sucursales::HttpSucursalRepository;
use sucursal_admin::infrastructure::session::{
    FileSessionStore, MemorySessionStore, RecordingNavigator, StoredSession,
};
use sucursal_admin::shared::error::AppError;
use tempfile::TempDir;

#[tokio::test]
async fn test_no_token_sends_no_authorization_header() {
    let backend = FakeBackend::start(vec![common::admin_json(1, "mlopez", true, 3)]).await;
    let session = Arc::new(MemorySessionStore::default());
    let repo = HttpAdminSucursalRepository::new(backend.client(session));

    let err = repo.list().await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized));
    assert_eq!(backend.requests()[0].authorization, None);
}

#[tokio::test]
async fn test_401_clears_file_session_and_redirects() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    store
        .save(&StoredSession {
            token: Some("expirado".to_string()),
            user: Some(serde_json::json!({"id": 1, "username": "root"})),
        })
        .unwrap();
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = SessionGuard::new(store.clone(), navigator.clone());

    let backend = FakeBackend::start(vec![common::admin_json(1, "mlopez", true, 3)]).await;
    let client = backend.client(store.clone());
    let repo = SessionAwareRepository::new(HttpAdminSucursalRepository::new(client), guard);

    let err = repo.list().await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized));
    assert_eq!(
        backend.requests()[0].authorization.as_deref(),
        Some("Bearer expirado")
    );
    assert!(!store.path().exists());
    assert_eq!(store.load(), None);
    assert_eq!(navigator.visited(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn test_401_on_write_and_branch_lookup() {
    let backend = FakeBackend::start(vec![common::admin_json(1, "mlopez", true, 3)]).await;
    backend.respond_once(Method::DELETE, "/api/admin-sucursales/1", 401, "");
    backend.respond_once(Method::GET, "/api/sucursales/activas", 401, "{}");

    let (client, store) = backend.client_with_token();
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = SessionGuard::new(store.clone(), navigator.clone());
    let admins = SessionAwareRepository::new(
        HttpAdminSucursalRepository::new(client.clone()),
        guard.clone(),
    );
    let branches = SessionAwareRepository::new(HttpSucursalRepository::new(client), guard);

    assert!(matches!(admins.delete(1).await, Err(AppError::Unauthorized)));
    assert_eq!(store.token(), None);

    store.set(StoredSession {
        token: Some(TOKEN.to_string()),
        user: None,
    });
    assert!(matches!(
        branches.list_active().await,
        Err(AppError::Unauthorized)
    ));
    assert_eq!(store.token(), None);
    assert_eq!(
        navigator.visited(),
        vec![LOGIN_PATH.to_string(), LOGIN_PATH.to_string()]
    );
    assert_eq!(backend.admins().len(), 1);
}

#[tokio::test]
async fn test_success_keeps_session() {
    let backend = FakeBackend::start(vec![common::admin_json(1, "mlopez", true, 3)]).await;
    let (client, store) = backend.client_with_token();
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = SessionGuard::new(store.clone(), navigator.clone());
    let repo = SessionAwareRepository::new(HttpAdminSucursalRepository::new(client), guard);

    let admin = repo.find_by_id(1).await.unwrap();

    assert_eq!(admin.username, "mlopez");
    assert_eq!(store.token().as_deref(), Some(TOKEN));
    assert!(navigator.visited().is_empty());
}

use crate::common::{self, FakeBackend};

use axum::http::Method;
use std::sync::Arc;
use sucursal_admin::application::admin_sucursales::delete::{DeleteOutcome, MSG_DELETED};
use sucursal_admin::application::admin_sucursales::form::{
    MSG_BRANCHES_FAILED, MSG_CREATED, MSG_UPDATED, SubmitOutcome,
};
use sucursal_admin::application::admin_sucursales::management::{
    AdminSucursalManager, MSG_LOAD_FAILED, Modal, NotificationKind,
};
use sucursal_admin::application::session::{SessionAwareRepository, SessionGuard};
use sucursal_admin::domain::session::{LOGIN_PATH, SessionStore};
use sucursal_admin::infrastructure::repositories::admin_sucursales::HttpAdminSucursalRepository;
use sucursal_admin::infrastructure::repositories::sucursales::HttpSucursalRepository;
use sucursal_admin::infrastructure::session::{MemorySessionStore, RecordingNavigator};
use sucursal_admin::shared::validation::FormField;

struct Screen {
    backend: FakeBackend,
    manager: AdminSucursalManager,
    store: Arc<MemorySessionStore>,
    navigator: Arc<RecordingNavigator>,
}

async fn screen() -> Screen {
    let backend = FakeBackend::start(vec![
        common::admin_json(1, "mlopez", true, 3),
        common::admin_json(2, "jperez", false, 4),
    ])
    .await;
    let (client, store) = backend.client_with_token();
    let navigator = Arc::new(RecordingNavigator::default());
    let guard = SessionGuard::new(store.clone(), navigator.clone());

    let manager = AdminSucursalManager::new(
        Arc::new(SessionAwareRepository::new(
            HttpAdminSucursalRepository::new(client.clone()),
            guard.clone(),
        )),
        Arc::new(SessionAwareRepository::new(
            HttpSucursalRepository::new(client),
            guard,
        )),
    );

    Screen {
        backend,
        manager,
        store,
        navigator,
    }
}

fn request_summary(backend: &FakeBackend) -> Vec<(Method, String)> {
    backend
        .requests()
        .into_iter()
        .map(|r| (r.method, r.path))
        .collect()
}

#[tokio::test]
async fn test_create_round_trip() {
    let mut s = screen().await;
    s.manager.load().await;
    assert_eq!(s.manager.rows().len(), 2);

    s.manager.open_create().await;
    let form = s.manager.form_mut().unwrap();
    assert_eq!(form.branches().len(), 2);
    form.set_username("  nuevo  ");
    form.set_email("nuevo@example.com");
    form.set_password("secreto");
    form.set_confirm_password("secreto");
    form.set_branch(Some(3));

    let outcome = s.manager.submit_form().await;

    assert_eq!(outcome, Some(SubmitOutcome::Saved(MSG_CREATED.to_string())));
    assert!(matches!(s.manager.modal(), Modal::Closed));
    assert_eq!(s.manager.rows().len(), 3);
    assert!(s.manager.rows().iter().any(|r| r.username == "nuevo"));
    let notification = s.manager.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, MSG_CREATED);

    assert_eq!(
        request_summary(&s.backend),
        vec![
            (Method::GET, "/api/admin-sucursales".to_string()),
            (Method::GET, "/api/sucursales/activas".to_string()),
            (Method::POST, "/api/admin-sucursales".to_string()),
            (Method::GET, "/api/admin-sucursales".to_string()),
        ]
    );
    let body = s.backend.requests()[2].body.clone().unwrap();
    assert_eq!(body["username"], "nuevo");
    assert!(body.get("confirm_password").is_none());
}

#[tokio::test]
async fn test_invalid_create_sends_nothing() {
    let mut s = screen().await;
    s.manager.load().await;
    s.manager.open_create().await;
    let before = s.backend.requests().len();

    let form = s.manager.form_mut().unwrap();
    form.set_username("ab");
    form.set_email("nuevo@example.com");
    form.set_password("secreto");
    form.set_confirm_password("otro");

    let outcome = s.manager.submit_form().await;

    let errors = match outcome {
        Some(SubmitOutcome::Invalid(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert!(errors.contains(FormField::Username));
    assert!(errors.contains(FormField::ConfirmPassword));
    assert!(errors.contains(FormField::Branch));
    assert_eq!(s.backend.requests().len(), before);
    assert!(matches!(s.manager.modal(), Modal::Form(_)));
}

#[tokio::test]
async fn test_edit_without_password() {
    let mut s = screen().await;
    s.manager.load().await;
    s.manager.open_edit(1).await.unwrap();

    let form = s.manager.form_mut().unwrap();
    assert_eq!(form.draft().username, "mlopez");
    assert_eq!(form.draft().branch_id, Some(3));
    form.set_active(false);

    let outcome = s.manager.submit_form().await;

    assert_eq!(outcome, Some(SubmitOutcome::Saved(MSG_UPDATED.to_string())));
    let put = s
        .backend
        .requests()
        .into_iter()
        .find(|r| r.method == Method::PUT)
        .unwrap();
    assert_eq!(put.path, "/api/admin-sucursales/1");
    assert!(put.body.unwrap().get("password").is_none());
    assert!(!s.manager.records().iter().find(|r| r.id == 1).unwrap().active);
}

#[tokio::test]
async fn test_server_rejection_keeps_form_open() {
    let mut s = screen().await;
    s.backend.respond_once(
        Method::POST,
        "/api/admin-sucursales",
        409,
        r#"{"message": "El nombre de usuario ya está en uso"}"#,
    );
    s.manager.load().await;
    s.manager.open_create().await;

    let form = s.manager.form_mut().unwrap();
    form.set_username("mlopez");
    form.set_email("otro@example.com");
    form.set_password("secreto");
    form.set_confirm_password("secreto");
    form.set_branch(Some(3));

    let outcome = s.manager.submit_form().await;

    assert_eq!(
        outcome,
        Some(SubmitOutcome::Failed(
            "El nombre de usuario ya está en uso".to_string()
        ))
    );
    let form = s.manager.form().unwrap();
    assert_eq!(
        form.submit_error(),
        Some("El nombre de usuario ya está en uso")
    );
    assert!(!form.is_submitting());
    assert!(s.manager.notification().is_none());
}

#[tokio::test]
async fn test_delete_flow() {
    let mut s = screen().await;
    s.manager.load().await;
    s.manager.open_delete(2).unwrap();

    let context = s.manager.delete_dialog().unwrap().context();
    assert_eq!(context.username, "jperez");
    assert_eq!(context.branch, "Norte");
    assert_eq!(context.status, "Inactivo");

    let outcome = s.manager.confirm_delete().await;

    assert_eq!(outcome, Some(DeleteOutcome::Deleted(MSG_DELETED.to_string())));
    assert!(matches!(s.manager.modal(), Modal::Closed));
    assert_eq!(s.manager.rows().len(), 1);
    assert_eq!(s.backend.admins().len(), 1);
}

#[tokio::test]
async fn test_load_failure_and_branch_banner() {
    let mut s = screen().await;
    s.backend
        .respond_once(Method::GET, "/api/admin-sucursales", 500, "{}");
    s.backend
        .respond_once(Method::GET, "/api/sucursales/activas", 503, "{}");

    s.manager.load().await;

    assert!(s.manager.rows().is_empty());
    let notification = s.manager.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, MSG_LOAD_FAILED);

    s.manager.open_create().await;
    let form = s.manager.form().unwrap();
    assert!(form.branches().is_empty());
    assert_eq!(form.branches_error(), Some(MSG_BRANCHES_FAILED));
}

#[tokio::test]
async fn test_expired_session_during_submit() {
    let mut s = screen().await;
    s.manager.load().await;
    s.manager.open_edit(2).await.unwrap();
    s.backend
        .respond_once(Method::PUT, "/api/admin-sucursales/2", 401, "");

    let outcome = s.manager.submit_form().await;

    assert_eq!(outcome, Some(SubmitOutcome::SessionExpired));
    assert_eq!(s.store.token(), None);
    assert_eq!(s.navigator.visited(), vec![LOGIN_PATH.to_string()]);
    assert!(s.manager.notification().is_none());
}

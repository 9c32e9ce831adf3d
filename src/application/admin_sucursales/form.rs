use crate::domain::admin_sucursales::{
    AdminSucursal, AdminSucursalRepository, NewAdminSucursal, UpdateAdminSucursal,
};
use crate::domain::sucursales::{Sucursal, SucursalRepository};
use crate::shared::validation::{FieldErrors, FormField};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use validator::{Validate, ValidationError};

pub const MSG_USERNAME_REQUIRED: &str = "El nombre de usuario es requerido";
pub const MSG_USERNAME_MIN: &str = "El nombre de usuario debe tener al menos 3 caracteres";
pub const MSG_EMAIL_REQUIRED: &str = "El email es requerido";
pub const MSG_EMAIL_INVALID: &str = "El formato del email no es válido";
pub const MSG_PASSWORD_REQUIRED: &str = "La contraseña es requerida";
pub const MSG_PASSWORD_MIN: &str = "La contraseña debe tener al menos 6 caracteres";
pub const MSG_PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";
pub const MSG_BRANCH_REQUIRED: &str = "Debe seleccionar una sucursal";

pub const MSG_CREATED: &str = "Administrador de sucursal creado exitosamente";
pub const MSG_UPDATED: &str = "Administrador de sucursal actualizado exitosamente";
pub const MSG_SAVE_FAILED: &str = "Error al guardar el administrador de sucursal";
pub const MSG_BRANCHES_FAILED: &str = "Error al cargar las sucursales";

const USERNAME_MIN_LEN: usize = 3;
const PASSWORD_MIN_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Which record, if any, the form edits.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Create,
    Edit(AdminSucursal),
}

impl Mode {
    pub fn title(&self) -> &'static str {
        match self {
            Mode::Create => "Nuevo Administrador de Sucursal",
            Mode::Edit(_) => "Editar Administrador de Sucursal",
        }
    }
}

/// Values typed into the form. Field-local rules are declared here; the
/// password rules depend on the [`Mode`] and live on the form.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AdminSucursalDraft {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[validate(required(message = "Debe seleccionar una sucursal"))]
    pub branch_id: Option<i64>,
    pub active: bool,
}

impl Default for AdminSucursalDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            branch_id: None,
            active: true,
        }
    }
}

impl From<&AdminSucursal> for AdminSucursalDraft {
    fn from(admin: &AdminSucursal) -> Self {
        Self {
            username: admin.username.clone(),
            email: admin.email.clone(),
            branch_id: Some(admin.branch_id),
            active: admin.active,
            ..Self::default()
        }
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::new("required").with_message(MSG_USERNAME_REQUIRED.into()));
    }
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(ValidationError::new("length").with_message(MSG_USERNAME_MIN.into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("required").with_message(MSG_EMAIL_REQUIRED.into()));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::new("email").with_message(MSG_EMAIL_INVALID.into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Written; carries the status message for the notification.
    Saved(String),
    /// Nothing was sent.
    Invalid(FieldErrors),
    /// The request failed; the message is also shown in the form.
    Failed(String),
    /// The backend rejected the session; the session guard has already
    /// redirected.
    SessionExpired,
    /// A submission is already in flight.
    Busy,
}

/// Create/edit form for one branch administrator.
pub struct AdminSucursalForm {
    mode: Mode,
    draft: AdminSucursalDraft,
    branches: Vec<Sucursal>,
    branches_error: Option<String>,
    errors: FieldErrors,
    submit_error: Option<String>,
    submitting: bool,
    admins: Arc<dyn AdminSucursalRepository>,
    branch_repo: Arc<dyn SucursalRepository>,
}

impl AdminSucursalForm {
    pub fn new(
        mode: Mode,
        admins: Arc<dyn AdminSucursalRepository>,
        branch_repo: Arc<dyn SucursalRepository>,
    ) -> Self {
        let draft = match &mode {
            Mode::Create => AdminSucursalDraft::default(),
            Mode::Edit(admin) => AdminSucursalDraft::from(admin),
        };
        Self {
            mode,
            draft,
            branches: Vec::new(),
            branches_error: None,
            errors: FieldErrors::new(),
            submit_error: None,
            submitting: false,
            admins,
            branch_repo,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn draft(&self) -> &AdminSucursalDraft {
        &self.draft
    }

    pub fn branches(&self) -> &[Sucursal] {
        &self.branches
    }

    /// Inline banner shown when the branch list could not be loaded.
    pub fn branches_error(&self) -> Option<&str> {
        self.branches_error.as_deref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Load the active branches for the selector. A failure leaves the
    /// selector empty and the rest of the form usable.
    pub async fn mount(&mut self) {
        match self.branch_repo.list_active().await {
            Ok(branches) => {
                self.branches = branches;
                self.branches_error = None;
            }
            Err(e) => {
                self.branches.clear();
                if !e.is_unauthorized() {
                    tracing::warn!(error = %e, "failed to load branches for the selector");
                    self.branches_error = Some(MSG_BRANCHES_FAILED.to_string());
                }
            }
        }
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.draft.username = value.into();
        self.errors.remove(FormField::Username);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.draft.email = value.into();
        self.errors.remove(FormField::Email);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.draft.password = value.into();
        self.errors.remove(FormField::Password);
        self.errors.remove(FormField::ConfirmPassword);
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.draft.confirm_password = value.into();
        self.errors.remove(FormField::ConfirmPassword);
    }

    pub fn set_branch(&mut self, branch_id: Option<i64>) {
        self.draft.branch_id = branch_id;
        self.errors.remove(FormField::Branch);
    }

    pub fn set_active(&mut self, active: bool) {
        self.draft.active = active;
    }

    /// Password rules apply when creating, or when editing and a new
    /// password was typed.
    fn password_in_play(&self) -> bool {
        matches!(self.mode, Mode::Create) || !self.draft.password.is_empty()
    }

    /// Every broken rule, one message per field.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = match self.draft.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };

        if self.password_in_play() {
            let password = &self.draft.password;
            if password.is_empty() {
                errors.insert(FormField::Password, MSG_PASSWORD_REQUIRED);
            } else if password.chars().count() < PASSWORD_MIN_LEN {
                errors.insert(FormField::Password, MSG_PASSWORD_MIN);
            }
            if self.draft.confirm_password != *password {
                errors.insert(FormField::ConfirmPassword, MSG_PASSWORD_MISMATCH);
            }
        }

        errors
    }

    /// Validate and, when valid, send exactly one create or update.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }

        let errors = self.validate();
        let Some(branch_id) = self.draft.branch_id.filter(|_| errors.is_empty()) else {
            self.errors = errors.clone();
            return SubmitOutcome::Invalid(errors);
        };

        self.errors = FieldErrors::new();
        self.submit_error = None;
        self.submitting = true;

        let username = self.draft.username.trim().to_string();
        let email = self.draft.email.trim().to_string();
        let result = match &self.mode {
            Mode::Create => self
                .admins
                .create(NewAdminSucursal {
                    username,
                    email,
                    password: self.draft.password.clone(),
                    active: self.draft.active,
                    branch_id,
                })
                .await
                .map(|()| MSG_CREATED),
            Mode::Edit(admin) => self
                .admins
                .update(
                    admin.id,
                    UpdateAdminSucursal {
                        username,
                        email,
                        password: Some(self.draft.password.clone()).filter(|p| !p.is_empty()),
                        active: self.draft.active,
                        branch_id,
                    },
                )
                .await
                .map(|()| MSG_UPDATED),
        };

        self.submitting = false;

        match result {
            Ok(message) => {
                self.draft.password.clear();
                self.draft.confirm_password.clear();
                SubmitOutcome::Saved(message.to_string())
            }
            Err(e) if e.is_unauthorized() => SubmitOutcome::SessionExpired,
            Err(e) => {
                tracing::error!(error = %e, "failed to save branch administrator");
                let message = e.user_message(MSG_SAVE_FAILED);
                self.submit_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }
}

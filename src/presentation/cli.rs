use crate::application::admin_sucursales::delete::DeleteOutcome;
use crate::application::admin_sucursales::form::{
    AdminSucursalForm, MSG_BRANCHES_FAILED, SubmitOutcome,
};
use crate::application::admin_sucursales::management::{
    AdminSucursalManager, ListScope, NotificationKind,
};
use crate::domain::admin_sucursales::AdminSucursalRepository;
use crate::domain::session::{LOGIN_PATH, Navigator, SessionStore};
use crate::domain::sucursales::SucursalRepository;
use crate::infrastructure::session::{FileSessionStore, StoredSession};
use crate::presentation::table::{render_branches, render_table};
use crate::presentation::view::render_detail;
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const MSG_SESSION_EXPIRED: &str = "La sesión ha expirado. Inicie sesión nuevamente.";
pub const MSG_NOT_FOUND: &str = "Administrador de sucursal no encontrado";

#[derive(Parser, Debug)]
#[command(
    name = "sucursal-admin",
    about = "Gestión de administradores de sucursal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List branch administrators.
    List {
        #[arg(long, conflicts_with = "branch")]
        active: bool,
        #[arg(long)]
        branch: Option<i64>,
        /// Case-insensitive filter on username, email or branch.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one branch administrator.
    Show { id: i64 },
    Create(CreateArgs),
    Update(UpdateArgs),
    Delete {
        id: i64,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List the active branches an administrator can be assigned to.
    Branches,
    Session(SessionCommand),
}

/// Missing values go through the form's own validation.
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub branch: Option<i64>,
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub branch: Option<i64>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionSubcommand {
    /// Store the bearer token (and optionally the user as JSON).
    Set {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user: Option<String>,
    },
    Clear,
}

/// Navigator for the terminal. There is no login page to show; the redirect
/// is logged and the command fails with [`MSG_SESSION_EXPIRED`].
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    redirected: AtomicBool,
}

impl TerminalNavigator {
    pub fn redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "redirecting to login");
        self.redirected.store(true, Ordering::SeqCst);
    }
}

pub struct CliContext {
    pub admins: Arc<dyn AdminSucursalRepository>,
    pub branches: Arc<dyn SucursalRepository>,
    pub session: Arc<FileSessionStore>,
    pub navigator: Arc<TerminalNavigator>,
    pub notification_ttl: Duration,
}

impl CliContext {
    fn manager(&self) -> AdminSucursalManager {
        AdminSucursalManager::new(self.admins.clone(), self.branches.clone())
            .with_notification_ttl(self.notification_ttl)
    }

    fn ensure_session(&self) -> anyhow::Result<()> {
        if self.navigator.redirected() {
            bail!("{MSG_SESSION_EXPIRED} ({LOGIN_PATH})");
        }
        Ok(())
    }
}

/// Run one command and return what should be printed on success.
pub async fn execute(command: Command, ctx: &CliContext) -> anyhow::Result<String> {
    let output = match command {
        Command::List {
            active,
            branch,
            search,
        } => list(ctx, active, branch, search).await?,
        Command::Show { id } => show(ctx, id).await?,
        Command::Create(args) => create(ctx, args).await?,
        Command::Update(args) => update(ctx, args).await?,
        Command::Delete { id, yes } => delete(ctx, id, yes).await?,
        Command::Branches => branches(ctx).await?,
        Command::Session(SessionCommand { command }) => session(ctx, command)?,
    };
    ctx.ensure_session()?;
    Ok(output)
}

async fn list(
    ctx: &CliContext,
    active: bool,
    branch: Option<i64>,
    search: Option<String>,
) -> anyhow::Result<String> {
    let scope = match (active, branch) {
        (_, Some(branch_id)) => ListScope::Branch(branch_id),
        (true, None) => ListScope::Active,
        (false, None) => ListScope::All,
    };
    let mut manager = ctx.manager().with_scope(scope);
    manager.load().await;
    ctx.ensure_session()?;

    if let Some(notification) = manager
        .notification()
        .filter(|n| n.kind == NotificationKind::Error)
    {
        bail!("{}", notification.message);
    }

    if let Some(query) = search {
        manager.set_filter(query);
    }
    Ok(render_table(&manager.rows()))
}

async fn show(ctx: &CliContext, id: i64) -> anyhow::Result<String> {
    match ctx.admins.find_by_id(id).await {
        Ok(admin) => Ok(render_detail(Some(&admin))),
        Err(e) if e.is_unauthorized() => bail!(MSG_SESSION_EXPIRED),
        Err(e) => {
            tracing::debug!(id, error = %e, "detail lookup failed");
            bail!("{}", e.user_message(MSG_NOT_FOUND))
        }
    }
}

/// Load the collection so the manager can resolve ids, failing loudly when
/// that load did not succeed.
async fn loaded_manager(ctx: &CliContext) -> anyhow::Result<AdminSucursalManager> {
    let mut manager = ctx.manager();
    manager.load().await;
    ctx.ensure_session()?;
    if let Some(notification) = manager.notification() {
        bail!("{}", notification.message);
    }
    Ok(manager)
}

fn open_form(manager: &mut AdminSucursalManager) -> anyhow::Result<&mut AdminSucursalForm> {
    let form = manager
        .form_mut()
        .context("el formulario no está abierto")?;
    if let Some(banner) = form.branches_error() {
        tracing::warn!(banner, "continuing without the branch list");
    }
    Ok(form)
}

async fn submit(ctx: &CliContext, manager: &mut AdminSucursalManager) -> anyhow::Result<String> {
    match manager.submit_form().await {
        Some(SubmitOutcome::Saved(message)) => Ok(message),
        Some(SubmitOutcome::Invalid(errors)) => bail!("{errors}"),
        Some(SubmitOutcome::Failed(message)) => bail!("{message}"),
        Some(SubmitOutcome::SessionExpired) => {
            ctx.ensure_session()?;
            bail!(MSG_SESSION_EXPIRED)
        }
        Some(SubmitOutcome::Busy) | None => bail!("el formulario no está disponible"),
    }
}

async fn create(ctx: &CliContext, args: CreateArgs) -> anyhow::Result<String> {
    let mut manager = loaded_manager(ctx).await?;
    manager.open_create().await;
    ctx.ensure_session()?;

    let form = open_form(&mut manager)?;
    form.set_username(args.username.unwrap_or_default());
    form.set_email(args.email.unwrap_or_default());
    form.set_password(args.password.unwrap_or_default());
    form.set_confirm_password(args.confirm_password.unwrap_or_default());
    form.set_branch(args.branch);
    form.set_active(!args.inactive);

    submit(ctx, &mut manager).await
}

async fn update(ctx: &CliContext, args: UpdateArgs) -> anyhow::Result<String> {
    let mut manager = loaded_manager(ctx).await?;
    if manager.open_edit(args.id).await.is_err() {
        bail!("{MSG_NOT_FOUND}: {}", args.id);
    }
    ctx.ensure_session()?;

    let form = open_form(&mut manager)?;
    if let Some(username) = args.username {
        form.set_username(username);
    }
    if let Some(email) = args.email {
        form.set_email(email);
    }
    if let Some(password) = args.password {
        form.set_password(password);
    }
    if let Some(confirm) = args.confirm_password {
        form.set_confirm_password(confirm);
    }
    if let Some(branch_id) = args.branch {
        form.set_branch(Some(branch_id));
    }
    if let Some(active) = args.active {
        form.set_active(active);
    }

    submit(ctx, &mut manager).await
}

async fn delete(ctx: &CliContext, id: i64, yes: bool) -> anyhow::Result<String> {
    let mut manager = loaded_manager(ctx).await?;
    if manager.open_delete(id).is_err() {
        bail!("{MSG_NOT_FOUND}: {id}");
    }

    if !yes {
        let context = manager
            .delete_dialog()
            .map(|dialog| dialog.context())
            .context("el diálogo de eliminación no está abierto")?;
        manager.close_modal();
        bail!(
            "¿Eliminar a {} ({}) de la sucursal {} [{}]? Esta acción no se puede deshacer. Repita el comando con --yes para confirmar.",
            context.username,
            context.email,
            context.branch,
            context.status
        );
    }

    match manager.confirm_delete().await {
        Some(DeleteOutcome::Deleted(message)) => Ok(message),
        Some(DeleteOutcome::Failed(message)) => bail!("{message}"),
        Some(DeleteOutcome::SessionExpired) => {
            ctx.ensure_session()?;
            bail!(MSG_SESSION_EXPIRED)
        }
        Some(DeleteOutcome::Busy) | None => bail!("el diálogo de eliminación no está disponible"),
    }
}

async fn branches(ctx: &CliContext) -> anyhow::Result<String> {
    match ctx.branches.list_active().await {
        Ok(branches) => Ok(render_branches(&branches)),
        Err(e) if e.is_unauthorized() => bail!(MSG_SESSION_EXPIRED),
        Err(e) => bail!("{}", e.user_message(MSG_BRANCHES_FAILED)),
    }
}

fn session(ctx: &CliContext, command: SessionSubcommand) -> anyhow::Result<String> {
    match command {
        SessionSubcommand::Set { token, user } => {
            let user = user
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .context("--user debe ser JSON válido")?;
            ctx.session.save(&StoredSession {
                token: Some(token),
                user,
            })?;
            Ok(format!(
                "Sesión guardada en {}",
                ctx.session.path().display()
            ))
        }
        SessionSubcommand::Clear => {
            ctx.session.clear();
            Ok("Sesión eliminada".to_string())
        }
    }
}

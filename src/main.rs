use sucursal_admin::application::session::{SessionAwareRepository, SessionGuard};
use sucursal_admin::infrastructure::http::ApiClient;
use sucursal_admin::infrastructure::repositories::admin_sucursales::HttpAdminSucursalRepository;
use sucursal_admin::infrastructure::repositories::sucursales::HttpSucursalRepository;
use sucursal_admin::infrastructure::session::FileSessionStore;
use sucursal_admin::presentation::cli::{self, Cli, CliContext, TerminalNavigator};
use sucursal_admin::shared::config::ClientConfig;

use clap::Parser;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // stdout carries command output; logs go to stderr
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "sucursal_admin=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    let config = ClientConfig::from_env()?;
    let ctx = bootstrap(&config)?;
    tracing::debug!(api_url = %config.api_url, "client configured");

    let output = cli::execute(args.command, &ctx).await?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn bootstrap(config: &ClientConfig) -> anyhow::Result<CliContext> {
    let session = Arc::new(FileSessionStore::new(&config.session_file));
    let navigator = Arc::new(TerminalNavigator::default());
    let guard = SessionGuard::new(session.clone(), navigator.clone());

    let client = Arc::new(ApiClient::from_config(config, session.clone())?);

    Ok(CliContext {
        admins: Arc::new(SessionAwareRepository::new(
            HttpAdminSucursalRepository::new(client.clone()),
            guard.clone(),
        )),
        branches: Arc::new(SessionAwareRepository::new(
            HttpSucursalRepository::new(client),
            guard,
        )),
        session,
        navigator,
        notification_ttl: config.notification_ttl,
    })
}

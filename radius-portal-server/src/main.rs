use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use radius_portal::{AuthorizationPolicy, Client};
use radius_portal_server::{app, AppState, Cli, ServerError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run(cli).await {
        error!(%error, "server stopped");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let client = Client::new(cli.client_config()?);
    let policy = AuthorizationPolicy::new(cli.policy_config());

    info!(
        radius_host = %cli.radius_host,
        radius_port = cli.radius_port,
        timeout_secs = cli.radius_timeout_secs,
        expected_filter_id = %cli.expected_filter_id,
        "RADIUS client configured"
    );

    let listener = TcpListener::bind(cli.listen_address).await?;
    info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app(AppState::new(client, policy)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        // without a signal handler the server just runs until killed
        warn!(%error, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

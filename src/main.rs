use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_sim::cli::Cli;
use intake_sim::config::Config;
use intake_sim::services::generator::AutoGenerator;
use intake_sim::store::TransactionStore;
use intake_sim::{AppState, console, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(snapshot) = cli.snapshot {
        config.snapshot_path = snapshot;
    }

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = TransactionStore::load(&config.snapshot_path).await.into_shared();
    let generator = AutoGenerator::new(
        store.clone(),
        Duration::from_secs(config.auto_generate_period_secs),
    );
    let state = AppState { store, generator };

    let app = create_app(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    if cli.headless {
        server.await?;
        return Ok(());
    }

    let server_task = tokio::spawn(async move {
        if let Err(err) = server.await {
            tracing::error!("server error: {}", err);
        }
    });

    console::run(state).await?;
    server_task.abort();

    Ok(())
}

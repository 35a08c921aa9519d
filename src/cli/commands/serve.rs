use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::app::{router, AppState};
use crate::auth::HttpIntrospector;
use crate::config::AppConfig;
use crate::database::{initialize_schema, DatabaseManager, ResourceStore};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "SQLite URL, e.g. sqlite://projects.db (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
    }
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;
    info!("Starting projects API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    initialize_schema(&pool)
        .await
        .context("failed to initialize database schema")?;

    let mut store = ResourceStore::new(pool);
    if config.database.enable_slow_query_warning {
        store = store.with_slow_query_threshold(Duration::from_millis(config.database.slow_query_threshold_ms));
    }

    let introspector = HttpIntrospector::new(&config.introspection)?;
    info!(url = %config.introspection.url, "Using token introspection endpoint");

    let bind_addr = config.bind_addr();
    let app = router(AppState::new(store.clone(), Arc::new(introspector), config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.pool().close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

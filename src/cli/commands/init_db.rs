use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{initialize_schema, DatabaseManager};

#[derive(Args, Debug, Default)]
pub struct InitDbArgs {
    #[arg(long, help = "SQLite URL, e.g. sqlite://projects.db (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

pub async fn handle(args: InitDbArgs, mut config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    let created = initialize_schema(&pool)
        .await
        .context("failed to initialize database schema")?;
    pool.close().await;

    let message = if created.is_empty() {
        "Schema already up to date".to_string()
    } else {
        format!("Created {}", created.join(", "))
    };

    output_success(
        &output_format,
        &message,
        Some(json!({ "database": config.database.url, "created": created })),
    )
}

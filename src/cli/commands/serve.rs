//! Implementation of the `issue-mirror serve` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::adapters::notion::NotionClient;
use crate::adapters::webhook::WebhookHttpServer;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LoggerImpl, SecretScrubber};
use crate::services::IssueMirrorService;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file (defaults to ./issue-mirror.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overriding server.port and PORT
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Load configuration, applying command-line overrides before validation.
pub fn resolve_config(args: &ServeArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }

    let mut config = ConfigLoader::load_unvalidated(args.config.as_deref())?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let _logger = LoggerImpl::init(&config.logging)?;

    let scrubber = SecretScrubber::try_new().context("Failed to compile scrubbing patterns")?;
    let store = NotionClient::new(&config.notion)?;
    let service = IssueMirrorService::new(Arc::new(store));

    info!(
        host = %config.server.host,
        port = config.server.port,
        path = %config.server.path,
        signature_verification = config.server.webhook_secret.is_some(),
        "starting issue-mirror"
    );

    let server = WebhookHttpServer::new(service, config.server, scrubber);
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Webhook server failed")?;

    info!("issue-mirror stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl-C");
        return;
    }
    info!("shutdown signal received");
}

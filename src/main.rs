//! Issue Mirror CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use issue_mirror::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // The server installs its own subscriber from configuration.
        Commands::Serve(args) => issue_mirror::cli::commands::serve::execute(args).await,
        Commands::Submit(args) => {
            if let Err(err) = init_cli_tracing() {
                eprintln!("warning: diagnostics disabled: {err}");
            }
            issue_mirror::cli::commands::submit::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        issue_mirror::cli::handle_error(err, cli.json);
    }
}

/// Diagnostics on stderr so stdout carries only command output.
fn init_cli_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

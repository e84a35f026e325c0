use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use conduit::app::registry;
use conduit::config::Config;
use conduit::server;

const USAGE_HINT: &str = "Provide an application object as module:callable";

/// Serve an application over HTTP, one worker unit per connection.
#[derive(Parser, Debug)]
#[command(name = "conduit", version)]
struct Cli {
    /// Application reference, e.g. demo:hello
    app: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE_HINT}");
            std::process::exit(1);
        }
    };

    let app = match registry::resolve(&cli.app) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("{USAGE_HINT}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();

    tokio::select! {
        res = server::listener::run(&cfg, app) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

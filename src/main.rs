use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use isoserve::{Config, Server, DEFAULT_PORT, DEFAULT_ROOT};

#[derive(Parser, Debug)]
#[command(name = "isoserve")]
#[command(about = "Static file server that sends cross-origin isolation headers")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "ISOSERVE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory to serve files from
    #[arg(short, long, env = "ISOSERVE_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, env = "ISOSERVE_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "isoserve=debug"
    } else {
        "isoserve=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = Config::new(cli.port, cli.root);

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(err) => {
            eprintln!("isoserve: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!(root = %config.root.display(), port = server.addr().port(), "serving directory");
    println!("Serving on http://localhost:{}", server.addr().port());

    let handle = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.shutdown();
        }
    });

    if let Err(err) = server.run().await {
        error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

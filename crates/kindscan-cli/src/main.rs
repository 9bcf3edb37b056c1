//! Kindscan CLI - find the namespaced resource types that hold objects

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use kindscan_kube::ConnectOptions;
use tokio_util::sync::CancellationToken;
use tracing::warn;

mod commands;
mod display;
mod error;
mod exit_codes;
mod logging;
mod progress;

use commands::catalog::CatalogArgs;
use commands::scan::ScanArgs;
use logging::LoggingConfig;

#[derive(Parser)]
#[command(name = "kindscan")]
#[command(author = "Kindscan Contributors")]
#[command(version)]
#[command(about = "Find the namespaced resource types that hold objects", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    cluster: ClusterArgs,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

/// Which cluster and namespace to talk to
#[derive(Args, Debug, Clone)]
struct ClusterArgs {
    /// Path to the kubeconfig (defaults to KUBECONFIG, then ~/.kube/config)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of current-context
    #[arg(long, global = true)]
    context: Option<String>,

    /// Namespace to scan instead of the context's namespace
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Timeout for each API request, in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    request_timeout: Option<u64>,
}

impl ClusterArgs {
    fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::default();
        if let Some(path) = &self.kubeconfig {
            options = options.with_kubeconfig(path);
        }
        if let Some(context) = &self.context {
            options = options.with_context(context);
        }
        if let Some(namespace) = &self.namespace {
            options = options.with_namespace(namespace);
        }
        if let Some(secs) = self.request_timeout {
            options = options.with_request_timeout(Duration::from_secs(secs));
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every namespaced resource type and print those holding objects
    Scan(ScanArgs),

    /// Print the resource types a scan would probe, without probing
    Catalog(CatalogArgs),
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    LoggingConfig {
        verbosity: cli.verbose,
        debug: cli.debug,
        json: cli.log_json,
    }
    .init();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            interrupt.cancel();
        }
    });

    let connect = cli.cluster.connect_options();
    let result = match &cli.command {
        Commands::Scan(args) => commands::scan::run(&connect, args, &cancel).await,
        Commands::Catalog(args) => commands::catalog::run(&connect, args, &cancel).await,
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }

    std::process::exit(exit_codes::SUCCESS);
}

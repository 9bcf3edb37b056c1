//! Scan command - find the resource types that hold objects

use clap::Args;
use kindscan_core::{CatalogFilter, SortBy};
use kindscan_kube::{CancelPolicy, ClusterConnection, ConnectOptions, InventoryOptions};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::display::{self, OutputFormat};
use crate::error::{CliError, Result};
use crate::progress::ScanProgress;

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Maximum number of list requests in flight
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Objects requested per probe
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,

    /// Report ordering: kind, name or group
    #[arg(long, default_value_t = SortBy::Kind)]
    pub sort_by: SortBy,

    /// Print what was collected when interrupted instead of nothing
    #[arg(long)]
    pub keep_partial: bool,

    /// Skip resource types that do not advertise the list verb
    #[arg(long)]
    pub require_list_verb: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Exit non-zero when probes or discovery failed unexpectedly
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Do not show a progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    fn inventory_options(&self, namespace: &str) -> InventoryOptions {
        let cancel_policy = if self.keep_partial {
            CancelPolicy::KeepPartial
        } else {
            CancelPolicy::DiscardPartial
        };

        InventoryOptions::new(namespace)
            .with_concurrency(usize::from(self.concurrency))
            .with_probe_limit(self.limit)
            .with_sort_by(self.sort_by)
            .with_filter(CatalogFilter {
                require_list_verb: self.require_list_verb,
            })
            .with_cancel_policy(cancel_policy)
    }
}

/// Run the scan command
pub async fn run(
    connect: &ConnectOptions,
    args: &ScanArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let connection = ClusterConnection::connect(connect).await?;
    let target = connection.target.clone();
    let scanner = super::cluster_scanner(&connection);

    if args.output.is_human() {
        println!("{}", display::format_target(&target));
    }

    let options = args.inventory_options(&target.namespace);
    let mut progress = ScanProgress::new(args.output.is_human() && !args.no_progress);
    let report = scanner
        .scan_with_observer(&options, cancel, &mut progress)
        .await?
        .with_context(&target.context);

    print!("{}", display::format_report(&report, args.output)?);

    // JSON and YAML already carry warnings and counts
    if matches!(args.output, OutputFormat::Table | OutputFormat::Name) {
        eprint!("{}", display::format_footer(&report));
    }

    if report.cancelled {
        return Err(CliError::Cancelled {
            probed: report.counts.probed(),
            help: None,
        });
    }

    if args.fail_on_warnings && !report.is_complete() {
        return Err(CliError::Incomplete {
            warnings: report.warnings.len(),
            discovery_errors: report.discovery_errors.len(),
        });
    }

    info!(resources = report.resources.len(), "inventory printed");
    Ok(())
}

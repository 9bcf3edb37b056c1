//! Catalog command - list the resource types a scan would probe

use clap::Args;
use console::style;
use kindscan_core::{CatalogFilter, SortBy};
use kindscan_kube::{ClusterConnection, ConnectOptions, InventoryOptions, ScanObserver};
use tokio_util::sync::CancellationToken;

use crate::display::{self, OutputFormat};
use crate::error::Result;
use crate::progress::ScanProgress;

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Ordering: kind, name or group
    #[arg(long, default_value_t = SortBy::Kind)]
    pub sort_by: SortBy,

    /// Skip resource types that do not advertise the list verb
    #[arg(long)]
    pub require_list_verb: bool,

    /// Output format (json and yaml print the candidate list)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Run the catalog command
pub async fn run(
    connect: &ConnectOptions,
    args: &CatalogArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let connection = ClusterConnection::connect(connect).await?;
    let scanner = super::cluster_scanner(&connection);

    if args.output.is_human() {
        println!("{}", display::format_target(&connection.target));
    }

    let options = InventoryOptions::new(&connection.target.namespace)
        .with_sort_by(args.sort_by)
        .with_filter(CatalogFilter {
            require_list_verb: args.require_list_verb,
        });

    let mut progress = ScanProgress::new(args.output.is_human());
    let listing = scanner.catalog(&options, cancel).await?;
    progress.finished();

    let rendered = match args.output {
        OutputFormat::Table => display::format_catalog_table(&listing.candidates),
        OutputFormat::Name => display::format_names(&listing.candidates),
        OutputFormat::Json => display::format_json(&listing.candidates)?,
        OutputFormat::Yaml => display::format_yaml(&listing.candidates)?,
    };
    print!("{}", rendered);

    for failure in &listing.discovery_errors {
        eprintln!(
            "{} Discovery incomplete: {}",
            style("⚠").yellow().bold(),
            failure
        );
    }

    Ok(())
}

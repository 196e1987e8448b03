//! One-shot synchronizer run: copies every activity record into the search index and prints the
//! summary as JSON.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trail_config::Config;
use trail_service::TrailService;

#[derive(Debug, Parser)]
#[command(
	version = trail_cli::VERSION,
	rename_all = "kebab",
	styles = trail_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `sync.manifest_path`.
	#[arg(long, value_name = "FILE")]
	pub manifest: Option<PathBuf>,
	/// Overrides `sync.batch_size`.
	#[arg(long, value_name = "N")]
	pub batch_size: Option<u32>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let mut config = trail_config::load(&args.config)?;

	apply_overrides(&mut config, &args)?;

	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let service = TrailService::connect(config).await?;
	let report = service.sync_index().await?;

	tracing::info!(
		total_indexed = report.progress.total_indexed,
		total_failed = report.progress.total_failed,
		"Index sync finished."
	);

	println!("{}", serde_json::to_string_pretty(&report)?);

	Ok(())
}

/// Applies command-line overrides and re-validates the result.
pub fn apply_overrides(config: &mut Config, args: &Args) -> trail_config::Result<()> {
	if let Some(manifest) = &args.manifest {
		config.sync.manifest_path = manifest.display().to_string();
	}
	if let Some(batch_size) = args.batch_size {
		config.sync.batch_size = batch_size;
	}

	trail_config::validate(config)
}

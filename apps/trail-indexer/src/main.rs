use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = trail_indexer::Args::parse();

	trail_indexer::run(args).await
}

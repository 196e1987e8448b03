use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = trail_api::Args::parse();

	trail_api::run(args).await
}

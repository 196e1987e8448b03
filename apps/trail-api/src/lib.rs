pub mod auth;
pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::{
	HeaderValue, Method,
	header::{CONTENT_TYPE, InvalidHeaderValue},
};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = trail_cli::VERSION,
	rename_all = "kebab",
	styles = trail_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = trail_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let cors = config.service.cors_origin.as_deref().map(cors_layer).transpose()?;
	let state = AppState::new(config).await?;
	let mut app = routes::router(state);

	if let Some(cors) = cors {
		app = app.layer(cors);
	}

	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, app).await?;

	Ok(())
}

/// Lets one browser origin call the API with cookies attached.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
	Ok(CorsLayer::new()
		.allow_origin(HeaderValue::from_str(origin)?)
		.allow_credentials(true)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE])
		.max_age(Duration::from_secs(60 * 60)))
}

fn init_tracing(config: &trail_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}

use std::sync::Arc;

use trail_service::TrailService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TrailService>,
}
impl AppState {
	pub async fn new(config: trail_config::Config) -> color_eyre::Result<Self> {
		let service = TrailService::connect(config).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: TrailService) -> Self {
		Self { service: Arc::new(service) }
	}
}

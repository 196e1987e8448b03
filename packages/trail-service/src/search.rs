use serde::{Deserialize, Serialize};

use trail_domain::{
	Item,
	filter::{ActivityFilter, Filter},
};
use trail_search::{SearchQuery, SearchResponse};

use crate::{Error, Result, TrailService, parse_positive};

const LATEST_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordsRequest {
	pub user_id: Option<String>,
	pub action: Option<String>,
	pub device: Option<String>,
	pub page: Option<String>,
	pub per_page: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchRecordsResponse {
	pub total: u64,
	pub page: u32,
	pub results: Vec<Item>,
}

impl TrailService {
	pub async fn search_records(&self, req: SearchRecordsRequest) -> Result<SearchRecordsResponse> {
		let page = parse_positive("page", req.page.as_deref(), 1)?;
		let per_page =
			parse_positive("perPage", req.per_page.as_deref(), self.cfg.query.default_per_page)?;
		let filter = Filter::from(&ActivityFilter {
			user_id: req.user_id,
			action: req.action,
			device: req.device,
		});

		if let Some(clause) = filter.clauses().iter().find(|clause| clause.value.contains('`')) {
			return Err(Error::invalid(format!(
				"{} must not contain backticks.",
				clause.field.document_field()
			)));
		}

		let response = self.backends.index.search(&SearchQuery { filter, page, per_page }).await?;

		Ok(SearchRecordsResponse {
			total: response.found,
			page: response.page,
			results: response.hits.into_iter().map(|hit| hit.document).collect(),
		})
	}

	/// First page of the newest documents, as returned by the index.
	pub async fn latest_records(&self) -> Result<SearchResponse> {
		let query = SearchQuery { filter: Filter::default(), page: 1, per_page: LATEST_PAGE_SIZE };

		Ok(self.backends.index.search(&query).await?)
	}
}

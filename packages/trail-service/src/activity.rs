use serde::{Deserialize, Serialize};

use trail_domain::{
	Item,
	cursor::{ContinuationKey, TimeCursor},
	filter::{ActivityFilter, Filter},
};
use trail_storage::{IndexQuery, Order};

use crate::{Result, TrailService, parse_positive};

/// Query string of the time-ordered listing. Numbers stay strings until validated.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeListRequest {
	pub limit: Option<String>,
	pub last_timestamp: Option<String>,
	pub record_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeListResponse {
	pub items: Vec<Item>,
	pub next_page_key: Option<TimeCursor>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FilterResponse {
	pub items: Vec<Item>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedListRequest {
	pub user_id: Option<String>,
	pub action: Option<String>,
	pub device: Option<String>,
	pub limit: Option<String>,
	pub last_key: Option<String>,
}
impl PagedListRequest {
	pub fn filter(&self) -> ActivityFilter {
		ActivityFilter {
			user_id: self.user_id.clone(),
			action: self.action.clone(),
			device: self.device.clone(),
		}
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedListResponse {
	pub items: Vec<Item>,
	/// Opaque continuation token, `None` at the end of the result set.
	pub next_key: Option<String>,
}

impl TrailService {
	/// Oldest-first page over the time index.
	pub async fn list_by_time(&self, req: TimeListRequest) -> Result<TimeListResponse> {
		let limit =
			parse_positive("limit", req.limit.as_deref(), self.cfg.query.default_time_limit)?;
		let cursor = TimeCursor::from_params(req.last_timestamp.as_deref(), req.record_id.as_deref())?;
		let partition = &self.cfg.storage.dynamodb.partition_value;
		let query = IndexQuery {
			partition: partition.clone(),
			order: Order::Ascending,
			limit: Some(limit),
			filter: Filter::default(),
			start_key: cursor.map(|cursor| cursor.to_start_key(partition)),
		};
		let page = self.backends.records.query_index(&query).await?;
		let next_page_key = page.last_key.as_ref().and_then(TimeCursor::from_key);

		Ok(TimeListResponse { items: page.items, next_page_key })
	}

	/// Every matching record, newest first. Follows continuation keys until the partition is
	/// exhausted, so the response size is bounded only by the data.
	pub async fn filter_records(&self, params: ActivityFilter) -> Result<FilterResponse> {
		let filter = Filter::from(&params);
		let mut items = Vec::new();
		let mut start_key = None;
		let mut pages = 0_usize;

		loop {
			let query = IndexQuery {
				partition: self.cfg.storage.dynamodb.partition_value.clone(),
				order: Order::Descending,
				limit: None,
				filter: filter.clone(),
				start_key: start_key.take(),
			};
			let page = self.backends.records.query_index(&query).await?;

			pages += 1;

			items.extend(page.items);

			match page.last_key {
				Some(key) => start_key = Some(key),
				None => break,
			}
		}

		tracing::debug!(pages, count = items.len(), "Filtered activity records.");

		Ok(FilterResponse { items })
	}

	/// Newest-first page with optional filters. `limit` bounds evaluated items, so a page may
	/// hold fewer matches than `limit` while still carrying a continuation token.
	pub async fn list_paged(&self, req: PagedListRequest) -> Result<PagedListResponse> {
		let limit =
			parse_positive("limit", req.limit.as_deref(), self.cfg.query.default_paged_limit)?;
		let start_key = req
			.last_key
			.as_deref()
			.filter(|token| !token.is_empty())
			.map(ContinuationKey::decode)
			.transpose()?;
		let query = IndexQuery {
			partition: self.cfg.storage.dynamodb.partition_value.clone(),
			order: Order::Descending,
			limit: Some(limit),
			filter: Filter::from(&req.filter()),
			start_key,
		};
		let page = self.backends.records.query_index(&query).await?;

		Ok(PagedListResponse {
			items: page.items,
			next_key: page.last_key.as_ref().map(ContinuationKey::encode),
		})
	}
}

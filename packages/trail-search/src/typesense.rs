use std::time::Duration;

use reqwest::{
	Client,
	header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};

use trail_domain::{BoxFuture, document::IndexedDocument};

use crate::{
	ImportOutcome, QUERY_BY, Result, SORT_NEWEST_FIRST, SearchIndex, SearchQuery, SearchResponse,
	WILDCARD_QUERY,
	import::{encode_jsonl, parse_import_response},
};

const API_KEY_HEADER: &str = "x-typesense-api-key";

#[derive(Clone, Debug)]
pub struct TypesenseClient {
	client: Client,
	base_url: String,
	collection: String,
}
impl TypesenseClient {
	pub fn new(cfg: &trail_config::Typesense) -> Result<Self> {
		let mut headers = HeaderMap::new();
		let mut api_key = HeaderValue::from_str(&cfg.api_key)?;

		api_key.set_sensitive(true);
		headers.insert(API_KEY_HEADER, api_key);

		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self { client, base_url: cfg.url.clone(), collection: cfg.collection.clone() })
	}

	fn documents_url(&self, suffix: &str) -> String {
		format!("{}/collections/{}/documents/{suffix}", self.base_url, self.collection)
	}

	async fn search_inner(&self, query: &SearchQuery) -> Result<SearchResponse> {
		let mut params = vec![
			("q", WILDCARD_QUERY.to_string()),
			("query_by", QUERY_BY.to_string()),
			("sort_by", SORT_NEWEST_FIRST.to_string()),
			("page", query.page.to_string()),
			("per_page", query.per_page.to_string()),
		];

		if let Some(filter_by) = query.filter.to_filter_by() {
			params.push(("filter_by", filter_by));
		}

		let res = self.client.get(self.documents_url("search")).query(&params).send().await?;
		let response: SearchResponse = res.error_for_status()?.json().await?;

		Ok(response)
	}

	async fn import_inner(&self, documents: &[IndexedDocument]) -> Result<Vec<ImportOutcome>> {
		if documents.is_empty() {
			return Ok(Vec::new());
		}

		let body = encode_jsonl(documents)?;
		let res = self
			.client
			.post(self.documents_url("import"))
			.query(&[("action", "upsert")])
			.header(CONTENT_TYPE, "text/plain")
			.body(body)
			.send()
			.await?;
		let text = res.error_for_status()?.text().await?;
		let outcomes = parse_import_response(&text, documents.len())?;

		tracing::debug!(
			collection = %self.collection,
			submitted = documents.len(),
			failed = outcomes.iter().filter(|outcome| !outcome.success).count(),
			"Imported document batch."
		);

		Ok(outcomes)
	}
}
impl SearchIndex for TypesenseClient {
	fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(self.search_inner(query))
	}

	fn import<'a>(
		&'a self,
		documents: &'a [IndexedDocument],
	) -> BoxFuture<'a, Result<Vec<ImportOutcome>>> {
		Box::pin(self.import_inner(documents))
	}
}

use std::{
	collections::{BTreeMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use serde_json::{Map, Value};

use trail_domain::{BoxFuture, Item, activity::TIMESTAMP, document::IndexedDocument};
use trail_search::{
	Error, ImportOutcome, Result, SearchHit, SearchIndex, SearchQuery, SearchResponse,
};

/// Search collection double with upsert semantics and newest-first ordering.
#[derive(Debug, Default)]
pub struct MemoryIndex {
	documents: Mutex<BTreeMap<String, Item>>,
	rejected_ids: Mutex<HashSet<String>>,
	import_calls: AtomicUsize,
	search_calls: AtomicUsize,
	fail_imports: AtomicBool,
	drop_last_outcome: AtomicBool,
	last_query: Mutex<Option<SearchQuery>>,
	reported_page: Mutex<Option<u32>>,
}
impl MemoryIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every import of `record_id` report a per-document failure.
	pub fn reject(&self, record_id: &str) {
		self.rejected_ids.lock().unwrap_or_else(|err| err.into_inner()).insert(record_id.to_string());
	}

	pub fn fail_imports(&self, fail: bool) {
		self.fail_imports.store(fail, Ordering::SeqCst);
	}

	/// Answers imports with one outcome fewer than submitted.
	pub fn drop_last_outcome(&self, drop: bool) {
		self.drop_last_outcome.store(drop, Ordering::SeqCst);
	}

	/// Reports `page` in search responses regardless of the page requested.
	pub fn report_page(&self, page: Option<u32>) {
		*self.reported_page.lock().unwrap_or_else(|err| err.into_inner()) = page;
	}

	pub fn import_calls(&self) -> usize {
		self.import_calls.load(Ordering::SeqCst)
	}

	pub fn search_calls(&self) -> usize {
		self.search_calls.load(Ordering::SeqCst)
	}

	pub fn last_query(&self) -> Option<SearchQuery> {
		self.last_query.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn len(&self) -> usize {
		self.documents.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains(&self, record_id: &str) -> bool {
		self.documents.lock().unwrap_or_else(|err| err.into_inner()).contains_key(record_id)
	}

	pub fn insert(&self, document: &IndexedDocument) {
		let mut documents = self.documents.lock().unwrap_or_else(|err| err.into_inner());

		documents.insert(document.record_id.clone(), document.to_item());
	}

	fn import_sync(&self, documents: &[IndexedDocument]) -> Result<Vec<ImportOutcome>> {
		self.import_calls.fetch_add(1, Ordering::SeqCst);

		if self.fail_imports.load(Ordering::SeqCst) {
			return Err(Error::InvalidResponse("injected import failure".to_string()));
		}

		let rejected = self.rejected_ids.lock().unwrap_or_else(|err| err.into_inner()).clone();
		let mut outcomes = Vec::with_capacity(documents.len());

		for document in documents {
			if rejected.contains(&document.record_id) {
				outcomes.push(ImportOutcome::failed("Rejected by index."));
			} else {
				self.insert(document);
				outcomes.push(ImportOutcome::ok());
			}
		}

		if self.drop_last_outcome.load(Ordering::SeqCst) {
			outcomes.pop();
		}

		Ok(outcomes)
	}

	fn search_sync(&self, query: &SearchQuery) -> Result<SearchResponse> {
		self.search_calls.fetch_add(1, Ordering::SeqCst);
		*self.last_query.lock().unwrap_or_else(|err| err.into_inner()) = Some(query.clone());

		let documents = self.documents.lock().unwrap_or_else(|err| err.into_inner());
		let mut matched = documents
			.values()
			.filter(|document| query.filter.matches_document(document))
			.cloned()
			.collect::<Vec<_>>();

		matched.sort_by_key(|document| {
			std::cmp::Reverse(document.get(TIMESTAMP).and_then(Value::as_i64).unwrap_or_default())
		});

		let per_page = query.per_page as usize;
		let skip = (query.page.max(1) as usize - 1).saturating_mul(per_page);
		let hits = matched
			.iter()
			.skip(skip)
			.take(per_page)
			.map(|document| SearchHit { document: document.clone(), extra: Map::new() })
			.collect();

		Ok(SearchResponse {
			found: matched.len() as u64,
			out_of: Some(documents.len() as u64),
			page: self
				.reported_page
				.lock()
				.unwrap_or_else(|err| err.into_inner())
				.unwrap_or(query.page),
			hits,
			extra: Map::new(),
		})
	}
}
impl SearchIndex for MemoryIndex {
	fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(async move { self.search_sync(query) })
	}

	fn import<'a>(
		&'a self,
		documents: &'a [IndexedDocument],
	) -> BoxFuture<'a, Result<Vec<ImportOutcome>>> {
		Box::pin(async move { self.import_sync(documents) })
	}
}

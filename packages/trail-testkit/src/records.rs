use std::{
	cmp::Ordering,
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering},
	},
};

use serde_json::{Map, Value};

use trail_domain::{
	BoxFuture, Item,
	activity::{RECORD_ID, STATIC_KEY, TIMESTAMP},
	cursor::ContinuationKey,
};
use trail_storage::{Error, IndexQuery, Order, Page, RecordStore, Result};

/// Activity table double.
///
/// Scans walk items ordered by `recordId`. Index queries see only items whose `staticKey` equals
/// the queried partition and whose `timestamp` is a string, ordered by `(timestamp, recordId)`.
/// Like DynamoDB, `Limit` counts evaluated items before the filter, and a page that reaches the
/// limit always carries a continuation key.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
	items: Mutex<Vec<(String, Item)>>,
	anonymous: AtomicUsize,
	scan_calls: AtomicUsize,
	query_calls: AtomicUsize,
	put_calls: AtomicUsize,
	fail_scan_on_call: Mutex<Option<usize>>,
	fail_queries: AtomicBool,
	fail_puts: AtomicBool,
}
impl MemoryRecordStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
		let store = Self::new();

		for item in items {
			store.insert(item);
		}

		store
	}

	/// Inserts or replaces an item. Items without a string `recordId` get a private key so that
	/// malformed rows can still be scanned.
	pub fn insert(&self, item: Item) {
		let key = match item.get(RECORD_ID).and_then(Value::as_str) {
			Some(id) if !id.is_empty() => id.to_string(),
			_ => format!("~anonymous-{:07}", self.anonymous.fetch_add(1, AtomicOrdering::SeqCst)),
		};
		let mut items = self.items.lock().unwrap_or_else(|err| err.into_inner());

		match items.binary_search_by(|(existing, _)| existing.as_str().cmp(&key)) {
			Ok(pos) => items[pos].1 = item,
			Err(pos) => items.insert(pos, (key, item)),
		}
	}

	pub fn len(&self) -> usize {
		self.items.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn items(&self) -> Vec<Item> {
		let items = self.items.lock().unwrap_or_else(|err| err.into_inner());

		items.iter().map(|(_, item)| item.clone()).collect()
	}

	pub fn scan_calls(&self) -> usize {
		self.scan_calls.load(AtomicOrdering::SeqCst)
	}

	pub fn query_calls(&self) -> usize {
		self.query_calls.load(AtomicOrdering::SeqCst)
	}

	pub fn put_calls(&self) -> usize {
		self.put_calls.load(AtomicOrdering::SeqCst)
	}

	/// Makes the `call`-th scan (1-based) fail.
	pub fn fail_scan_on_call(&self, call: usize) {
		*self.fail_scan_on_call.lock().unwrap_or_else(|err| err.into_inner()) = Some(call);
	}

	pub fn fail_queries(&self, fail: bool) {
		self.fail_queries.store(fail, AtomicOrdering::SeqCst);
	}

	pub fn fail_puts(&self, fail: bool) {
		self.fail_puts.store(fail, AtomicOrdering::SeqCst);
	}

	fn query_sync(&self, query: &IndexQuery) -> Result<Page> {
		self.query_calls.fetch_add(1, AtomicOrdering::SeqCst);

		if self.fail_queries.load(AtomicOrdering::SeqCst) {
			return Err(injected("Query"));
		}

		let mut entries = {
			let items = self.items.lock().unwrap_or_else(|err| err.into_inner());

			items
				.iter()
				.filter_map(|(key, item)| {
					let partition = item.get(STATIC_KEY).and_then(Value::as_str)?;
					let timestamp = item.get(TIMESTAMP).and_then(Value::as_str)?;

					(partition == query.partition)
						.then(|| (timestamp.to_string(), key.clone(), item.clone()))
				})
				.collect::<Vec<_>>()
		};

		entries.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

		if query.order == Order::Descending {
			entries.reverse();
		}

		let start = match &query.start_key {
			Some(key) => {
				let position = (
					key.get_str(TIMESTAMP).unwrap_or_default().to_string(),
					key.get_str(RECORD_ID).unwrap_or_default().to_string(),
				);
				let past = match query.order {
					Order::Ascending => Ordering::Greater,
					Order::Descending => Ordering::Less,
				};

				entries
					.iter()
					.position(|(ts, id, _)| (ts, id).cmp(&(&position.0, &position.1)) == past)
					.unwrap_or(entries.len())
			},
			None => 0,
		};
		let evaluated = &entries[start..];
		let limit = query.limit.map(|limit| limit as usize).unwrap_or(evaluated.len());
		let evaluated = &evaluated[..limit.min(evaluated.len())];
		let items = evaluated
			.iter()
			.filter(|(_, _, item)| query.filter.matches_record(item))
			.map(|(_, _, item)| item.clone())
			.collect();
		let last_key = match evaluated.last() {
			Some((ts, id, _)) if query.limit.is_some_and(|limit| evaluated.len() == limit as usize) => {
				let mut key = Map::new();

				key.insert(STATIC_KEY.to_string(), Value::from(query.partition.clone()));
				key.insert(TIMESTAMP.to_string(), Value::from(ts.clone()));
				key.insert(RECORD_ID.to_string(), Value::from(id.clone()));

				Some(ContinuationKey::new(key))
			},
			_ => None,
		};

		Ok(Page { items, last_key })
	}

	fn scan_sync(&self, limit: u32, start_key: Option<&ContinuationKey>) -> Result<Page> {
		let call = self.scan_calls.fetch_add(1, AtomicOrdering::SeqCst) + 1;

		if *self.fail_scan_on_call.lock().unwrap_or_else(|err| err.into_inner()) == Some(call) {
			return Err(injected("Scan"));
		}

		let items = self.items.lock().unwrap_or_else(|err| err.into_inner());
		let start = match start_key.and_then(|key| key.get_str(RECORD_ID)) {
			Some(after) => items.partition_point(|(key, _)| key.as_str() <= after),
			None => 0,
		};
		let page = items.iter().skip(start).take(limit as usize).collect::<Vec<_>>();
		let last_key = match page.last() {
			Some((key, _)) if page.len() == limit as usize => {
				let mut attributes = Map::new();

				attributes.insert(RECORD_ID.to_string(), Value::from(key.clone()));

				Some(ContinuationKey::new(attributes))
			},
			_ => None,
		};

		Ok(Page { items: page.into_iter().map(|(_, item)| item.clone()).collect(), last_key })
	}

	fn put_sync(&self, item: &Item) -> Result<()> {
		self.put_calls.fetch_add(1, AtomicOrdering::SeqCst);

		if self.fail_puts.load(AtomicOrdering::SeqCst) {
			return Err(injected("PutItem"));
		}

		self.insert(item.clone());

		Ok(())
	}
}
impl RecordStore for MemoryRecordStore {
	fn query_index<'a>(&'a self, query: &'a IndexQuery) -> BoxFuture<'a, Result<Page>> {
		Box::pin(async move { self.query_sync(query) })
	}

	fn scan_page<'a>(
		&'a self,
		limit: u32,
		start_key: Option<&'a ContinuationKey>,
	) -> BoxFuture<'a, Result<Page>> {
		Box::pin(async move { self.scan_sync(limit, start_key) })
	}

	fn put_record<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.put_sync(item) })
	}
}

pub(crate) fn injected(operation: &'static str) -> Error {
	Error::Dynamo { operation, message: "injected failure".to_string() }
}

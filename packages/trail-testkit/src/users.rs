use std::{
	collections::BTreeMap,
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use serde_json::Value;

use trail_domain::{
	BoxFuture, Item,
	user::{USER_KEY, UserPatch},
};
use trail_storage::{Result, UserStore};

use crate::records::injected;

/// Users table double. `update_user` creates missing users, matching DynamoDB `UpdateItem`.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
	users: Mutex<BTreeMap<String, Item>>,
	calls: AtomicUsize,
	fail: AtomicBool,
}
impl MemoryUserStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn fail(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}

	fn enter(&self, operation: &'static str) -> Result<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		if self.fail.load(Ordering::SeqCst) {
			return Err(injected(operation));
		}

		Ok(())
	}

	fn scan_sync(&self) -> Result<Vec<Item>> {
		self.enter("Scan")?;

		let users = self.users.lock().unwrap_or_else(|err| err.into_inner());

		Ok(users.values().cloned().collect())
	}

	fn get_sync(&self, user_id: &str) -> Result<Option<Item>> {
		self.enter("GetItem")?;

		let users = self.users.lock().unwrap_or_else(|err| err.into_inner());

		Ok(users.get(user_id).cloned())
	}

	fn put_sync(&self, item: &Item) -> Result<()> {
		self.enter("PutItem")?;

		let Some(user_id) = item.get(USER_KEY).and_then(Value::as_str) else {
			return Err(trail_storage::Error::InvalidItem("user item has no userId".to_string()));
		};
		let mut users = self.users.lock().unwrap_or_else(|err| err.into_inner());

		users.insert(user_id.to_string(), item.clone());

		Ok(())
	}

	fn update_sync(&self, user_id: &str, patch: &UserPatch) -> Result<Item> {
		self.enter("UpdateItem")?;

		let mut users = self.users.lock().unwrap_or_else(|err| err.into_inner());
		let user = users.entry(user_id.to_string()).or_insert_with(|| {
			let mut item = Item::new();

			item.insert(USER_KEY.to_string(), Value::from(user_id));

			item
		});

		for (attribute, value) in patch.assignments() {
			user.insert(attribute.to_string(), Value::from(value));
		}

		Ok(user.clone())
	}
}
impl UserStore for MemoryUserStore {
	fn scan_users(&self) -> BoxFuture<'_, Result<Vec<Item>>> {
		Box::pin(async move { self.scan_sync() })
	}

	fn get_user<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<Item>>> {
		Box::pin(async move { self.get_sync(user_id) })
	}

	fn put_user<'a>(&'a self, item: &'a Item) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.put_sync(item) })
	}

	fn update_user<'a>(
		&'a self,
		user_id: &'a str,
		patch: &'a UserPatch,
	) -> BoxFuture<'a, Result<Item>> {
		Box::pin(async move { self.update_sync(user_id, patch) })
	}
}

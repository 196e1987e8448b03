use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Item;

pub const USER_KEY: &str = "userId";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	pub user_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}
impl UserRecord {
	pub fn to_item(&self) -> Item {
		let mut item = Item::new();

		item.insert(USER_KEY.to_string(), Value::from(self.user_id.clone()));

		if let Some(name) = &self.name {
			item.insert(NAME.to_string(), Value::from(name.clone()));
		}
		if let Some(email) = &self.email {
			item.insert(EMAIL.to_string(), Value::from(email.clone()));
		}

		item
	}
}

/// Fields changed by a partial user update. At least one must be set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
	pub name: Option<String>,
	pub email: Option<String>,
}
impl UserPatch {
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.email.is_none()
	}

	/// The `(attribute, value)` pairs to set, in a stable order.
	pub fn assignments(&self) -> Vec<(&'static str, &str)> {
		let mut out = Vec::with_capacity(2);

		if let Some(name) = &self.name {
			out.push((NAME, name.as_str()));
		}
		if let Some(email) = &self.email {
			out.push((EMAIL, email.as_str()));
		}

		out
	}
}

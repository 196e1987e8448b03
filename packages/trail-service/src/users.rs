use serde::{Deserialize, Serialize};

use trail_domain::{
	Item,
	user::{UserPatch, UserRecord},
};

use crate::{Error, Result, TrailService};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateUserRequest {
	pub id: String,
	pub name: Option<String>,
	pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
	pub name: Option<String>,
	pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplacedUser {
	pub message: String,
	pub id: String,
	pub name: String,
	pub email: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchedUser {
	pub message: String,
	pub updated_user: Item,
}

impl TrailService {
	pub async fn list_users(&self) -> Result<Vec<Item>> {
		Ok(self.backends.users.scan_users().await?)
	}

	pub async fn get_user(&self, user_id: &str) -> Result<Item> {
		self.backends
			.users
			.get_user(user_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "User not found.".to_string() })
	}

	pub async fn create_user(&self, req: CreateUserRequest) -> Result<()> {
		let user_id = req.id.trim();

		if user_id.is_empty() {
			return Err(Error::invalid("id is required."));
		}

		let record = UserRecord { user_id: user_id.to_string(), name: req.name, email: req.email };

		self.backends.users.put_user(&record.to_item()).await?;

		Ok(())
	}

	/// Overwrites the whole user. Both fields are required.
	pub async fn replace_user(&self, user_id: &str, req: UpdateUserRequest) -> Result<ReplacedUser> {
		let (Some(name), Some(email)) = (non_empty(req.name), non_empty(req.email)) else {
			return Err(Error::invalid("Name and email are required."));
		};
		let record = UserRecord {
			user_id: user_id.to_string(),
			name: Some(name.clone()),
			email: Some(email.clone()),
		};

		self.backends.users.put_user(&record.to_item()).await?;

		Ok(ReplacedUser {
			message: "User updated successfully.".to_string(),
			id: user_id.to_string(),
			name,
			email,
		})
	}

	/// Sets only the supplied fields and returns the resulting user.
	pub async fn patch_user(&self, user_id: &str, req: UpdateUserRequest) -> Result<PatchedUser> {
		let patch = UserPatch { name: non_empty(req.name), email: non_empty(req.email) };

		if patch.is_empty() {
			return Err(Error::invalid("At least one field (name or email) is required."));
		}

		let updated_user = self.backends.users.update_user(user_id, &patch).await?;

		Ok(PatchedUser { message: "User updated successfully.".to_string(), updated_user })
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

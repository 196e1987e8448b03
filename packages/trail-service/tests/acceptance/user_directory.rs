use trail_service::{CreateUserRequest, Error, UpdateUserRequest};

use super::harness;

fn create(id: &str, name: &str, email: &str) -> CreateUserRequest {
	CreateUserRequest {
		id: id.to_string(),
		name: Some(name.to_string()),
		email: Some(email.to_string()),
	}
}

#[tokio::test]
async fn created_users_can_be_fetched_and_listed() {
	let h = harness(Vec::new());

	h.service.create_user(create("u-1", "Ada", "ada@example.com")).await.expect("create failed");
	h.service.create_user(create("u-2", "Grace", "grace@example.com")).await.expect("create failed");

	let user = h.service.get_user("u-1").await.expect("get failed");

	assert_eq!(user["userId"], "u-1");
	assert_eq!(user["name"], "Ada");
	assert_eq!(h.service.list_users().await.expect("list failed").len(), 2);
}

#[tokio::test]
async fn missing_user_is_not_found() {
	let h = harness(Vec::new());
	let err = h.service.get_user("ghost").await.expect_err("expected not found");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn create_requires_an_id() {
	let h = harness(Vec::new());
	let err = h.service.create_user(create("  ", "Ada", "a@b.c")).await.expect_err("expected rejection");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert_eq!(h.users.calls(), 0);
}

#[tokio::test]
async fn replace_requires_both_fields_and_overwrites() {
	let h = harness(Vec::new());

	h.service.create_user(create("u-1", "Ada", "ada@example.com")).await.expect("create failed");

	let err = h
		.service
		.replace_user("u-1", UpdateUserRequest { name: Some("Ada L.".to_string()), email: None })
		.await
		.expect_err("expected rejection");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let replaced = h
		.service
		.replace_user(
			"u-1",
			UpdateUserRequest {
				name: Some("Ada L.".to_string()),
				email: Some("ada@lovelace.dev".to_string()),
			},
		)
		.await
		.expect("replace failed");

	assert_eq!(replaced.email, "ada@lovelace.dev");
	assert_eq!(h.service.get_user("u-1").await.expect("get failed")["name"], "Ada L.");
}

#[tokio::test]
async fn patch_changes_only_supplied_fields() {
	let h = harness(Vec::new());

	h.service.create_user(create("u-1", "Ada", "ada@example.com")).await.expect("create failed");

	let err = h
		.service
		.patch_user("u-1", UpdateUserRequest::default())
		.await
		.expect_err("expected rejection");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let patched = h
		.service
		.patch_user("u-1", UpdateUserRequest { name: None, email: Some("new@example.com".to_string()) })
		.await
		.expect("patch failed");

	assert_eq!(patched.updated_user["name"], "Ada");
	assert_eq!(patched.updated_user["email"], "new@example.com");
}

#[tokio::test]
async fn user_store_failures_are_storage_errors() {
	let h = harness(Vec::new());

	h.users.fail(true);

	assert!(matches!(h.service.list_users().await, Err(Error::Storage { .. })));
}

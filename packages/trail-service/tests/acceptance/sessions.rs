use trail_service::Error;
use trail_testkit::{TEST_PASSWORD, TEST_USERNAME};

use super::harness;

#[tokio::test]
async fn login_issues_tokens_that_verify() {
	let h = harness(Vec::new());
	let tokens = h.service.login(TEST_USERNAME, TEST_PASSWORD).expect("login failed");
	let claims = h.service.verify_access(Some(&tokens.access_token)).expect("verify failed");

	assert_eq!(claims.id, 1);
	assert_eq!(claims.username, TEST_USERNAME);
	assert_eq!(claims.exp - claims.iat, 900);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
	let h = harness(Vec::new());
	let err = h.service.login(TEST_USERNAME, "wrong").expect_err("expected rejection");

	assert!(matches!(err, Error::Unauthorized { .. }));
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
	let h = harness(Vec::new());
	let tokens = h.service.login(TEST_USERNAME, TEST_PASSWORD).expect("login failed");
	let err =
		h.service.verify_access(Some(&tokens.refresh_token)).expect_err("expected rejection");

	assert!(matches!(err, Error::AccessDenied { .. }));
	assert!(matches!(h.service.verify_access(None), Err(Error::AccessDenied { .. })));
}

#[tokio::test]
async fn refresh_mints_a_new_access_token() {
	let h = harness(Vec::new());
	let tokens = h.service.login(TEST_USERNAME, TEST_PASSWORD).expect("login failed");
	let access = h.service.refresh(Some(&tokens.refresh_token)).expect("refresh failed");
	let claims = h.service.verify_access(Some(&access)).expect("verify failed");

	assert_eq!(claims.username, TEST_USERNAME);
	assert!(matches!(h.service.refresh(None), Err(Error::AccessDenied { .. })));
	assert!(matches!(
		h.service.refresh(Some(&tokens.access_token)),
		Err(Error::AccessDenied { .. })
	));
}

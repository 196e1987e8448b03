use trail_service::{Error, PagedListRequest, TimeListRequest};
use trail_testkit::{activity_item, sample_records};

use super::{harness, record_ids, timestamps};

const T1: &str = "2025-04-13T14:00:00.001Z";
const T2: &str = "2025-04-13T14:00:00.002Z";
const T3: &str = "2025-04-13T14:00:00.003Z";

fn time_page(limit: &str) -> TimeListRequest {
	TimeListRequest { limit: Some(limit.to_string()), ..Default::default() }
}

#[tokio::test]
async fn time_cursor_resumes_after_last_item() {
	let h = harness(vec![
		activity_item("rec-c", "user-1", "view", "Chrome", T3),
		activity_item("rec-a", "user-1", "view", "Chrome", T1),
		activity_item("rec-b", "user-2", "edit", "Edge", T2),
	]);
	let first = h.service.list_by_time(time_page("2")).await.expect("first page failed");

	assert_eq!(timestamps(&first.items), [T1, T2]);

	let cursor = first.next_page_key.expect("expected a cursor after a full page");

	assert_eq!(cursor.record_id, "rec-b");
	assert_eq!(cursor.timestamp, T2);

	let second = h
		.service
		.list_by_time(TimeListRequest {
			limit: Some("2".to_string()),
			last_timestamp: Some(cursor.timestamp),
			record_id: Some(cursor.record_id),
		})
		.await
		.expect("second page failed");

	assert_eq!(timestamps(&second.items), [T3]);
	assert!(second.next_page_key.is_none());
}

#[tokio::test]
async fn time_pages_are_ascending_without_gaps_or_duplicates() {
	let records = sample_records(23);
	let mut expected = record_ids(&records);

	expected.sort();

	let h = harness(records);
	let mut seen = Vec::new();
	let mut request = time_page("5");

	loop {
		let page = h.service.list_by_time(request.clone()).await.expect("page failed");

		assert!(page.items.len() <= 5);

		let stamps = timestamps(&page.items);

		assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]), "page not ascending: {stamps:?}");

		seen.extend(record_ids(&page.items));

		let Some(cursor) = page.next_page_key else {
			break;
		};

		request.last_timestamp = Some(cursor.timestamp);
		request.record_id = Some(cursor.record_id);
	}

	assert_eq!(seen, expected);
}

#[tokio::test]
async fn time_listing_defaults_to_fifty_items() {
	let h = harness(sample_records(60));
	let page =
		h.service.list_by_time(TimeListRequest::default()).await.expect("listing failed");

	assert_eq!(page.items.len(), 50);
	assert!(page.next_page_key.is_some());
}

#[tokio::test]
async fn invalid_limits_are_rejected_before_the_store() {
	let h = harness(sample_records(3));

	for limit in ["0", "-1", "abc"] {
		let err = h.service.list_by_time(time_page(limit)).await.expect_err("expected rejection");

		assert!(matches!(err, Error::InvalidRequest { .. }), "unexpected error for {limit}: {err}");

		let err = h
			.service
			.list_paged(PagedListRequest { limit: Some(limit.to_string()), ..Default::default() })
			.await
			.expect_err("expected rejection");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}

	assert_eq!(h.records.query_calls(), 0);
}

#[tokio::test]
async fn half_a_time_cursor_is_a_validation_error() {
	let h = harness(sample_records(3));
	let only_timestamp = TimeListRequest {
		last_timestamp: Some(T1.to_string()),
		..Default::default()
	};
	let only_record = TimeListRequest { record_id: Some("rec-a".to_string()), ..Default::default() };

	for request in [only_timestamp, only_record] {
		let err = h.service.list_by_time(request).await.expect_err("expected rejection");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}

	assert_eq!(h.records.query_calls(), 0);
}

#[tokio::test]
async fn store_failures_surface_as_storage_errors() {
	let h = harness(sample_records(3));

	h.records.fail_queries(true);

	let err = h.service.list_by_time(time_page("2")).await.expect_err("expected failure");

	assert!(matches!(err, Error::Storage { .. }));
}

#[tokio::test]
async fn paged_listing_limits_evaluated_items_before_filtering() {
	// Users cycle user-1, user-2, user-3, so user-1 owns rec-0000001, 4, 7, and 10.
	let h = harness(sample_records(10));
	let mut request = PagedListRequest {
		user_id: Some("user-1".to_string()),
		limit: Some("4".to_string()),
		..Default::default()
	};
	let mut pages = Vec::new();

	loop {
		let page = h.service.list_paged(request.clone()).await.expect("page failed");

		pages.push(record_ids(&page.items));

		match page.next_key {
			Some(token) => request.last_key = Some(token),
			None => break,
		}
	}

	assert_eq!(
		pages,
		vec![
			vec!["rec-0000010".to_string(), "rec-0000007".to_string()],
			vec!["rec-0000004".to_string()],
			vec!["rec-0000001".to_string()],
		]
	);
}

#[tokio::test]
async fn paged_listing_is_newest_first_and_token_is_url_safe() {
	let h = harness(sample_records(6));
	let page = h
		.service
		.list_paged(PagedListRequest { limit: Some("3".to_string()), ..Default::default() })
		.await
		.expect("page failed");

	assert_eq!(record_ids(&page.items), ["rec-0000006", "rec-0000005", "rec-0000004"]);

	let token = page.next_key.expect("expected a continuation token");

	assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[tokio::test]
async fn malformed_continuation_token_is_rejected() {
	let h = harness(sample_records(3));

	for token in ["not base64!", "e30", "WzEsMl0"] {
		let err = h
			.service
			.list_paged(PagedListRequest { last_key: Some(token.to_string()), ..Default::default() })
			.await
			.expect_err("expected rejection");

		assert!(matches!(err, Error::InvalidRequest { .. }), "unexpected error for {token}: {err}");
	}

	assert_eq!(h.records.query_calls(), 0);
}

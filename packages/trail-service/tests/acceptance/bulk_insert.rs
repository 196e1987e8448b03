use trail_service::{BulkInsertRequest, Error, TimeListRequest};

use super::{harness, harness_with, record_ids};

#[tokio::test]
async fn inserts_sequential_records_visible_on_the_time_index() {
	let h = harness(Vec::new());
	let response = h
		.service
		.bulk_insert(BulkInsertRequest {
			count: Some("5".to_string()),
			start_id: Some("10".to_string()),
		})
		.await
		.expect("bulk insert failed");

	assert_eq!(response.message, "5 records inserted.");
	assert_eq!(h.records.put_calls(), 5);

	let mut ids = record_ids(&h.records.items());

	ids.sort();

	assert_eq!(ids, ["rec-0000010", "rec-0000011", "rec-0000012", "rec-0000013", "rec-0000014"]);

	let page = h.service.list_by_time(TimeListRequest::default()).await.expect("listing failed");

	assert_eq!(page.items.len(), 5);
}

#[tokio::test]
async fn any_failed_write_fails_the_batch() {
	let h = harness(Vec::new());

	h.records.fail_puts(true);

	let err = h
		.service
		.bulk_insert(BulkInsertRequest { count: Some("3".to_string()), start_id: None })
		.await
		.expect_err("expected failure");

	assert!(matches!(err, Error::Storage { .. }));
}

#[tokio::test]
async fn count_above_configured_cap_is_rejected_before_writing() {
	let h = harness_with(Vec::new(), |cfg| cfg.query.max_bulk_count = 100);
	let err = h
		.service
		.bulk_insert(BulkInsertRequest {
			count: Some("4294967295".to_string()),
			start_id: None,
		})
		.await
		.expect_err("expected the cap to apply");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert_eq!(h.records.put_calls(), 0);

	let response = h
		.service
		.bulk_insert(BulkInsertRequest::default())
		.await
		.expect("default count is clamped to the cap");

	assert_eq!(response.message, "100 records inserted.");
}

#[tokio::test]
async fn start_id_overflow_is_rejected_before_writing() {
	let h = harness(Vec::new());
	let err = h
		.service
		.bulk_insert(BulkInsertRequest {
			count: Some("2".to_string()),
			start_id: Some(u64::MAX.to_string()),
		})
		.await
		.expect_err("expected overflow to be rejected");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert_eq!(h.records.put_calls(), 0);
}

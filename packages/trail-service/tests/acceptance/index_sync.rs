use std::fs;

use serde_json::json;

use trail_domain::Item;
use trail_service::Error;
use trail_testkit::{activity_item, sample_records};

use super::{harness, harness_with};

fn malformed(value: serde_json::Value) -> Item {
	value.as_object().cloned().expect("fixture must be an object")
}

fn read_manifest(path: &std::path::Path) -> Vec<String> {
	let raw = fs::read_to_string(path).expect("manifest missing");

	serde_json::from_str(&raw).expect("manifest is not a JSON array of strings")
}

#[tokio::test]
async fn scans_and_imports_in_batches() {
	let h = harness(sample_records(501));
	let report = h.service.sync_index().await.expect("sync failed");

	assert_eq!(h.records.scan_calls(), 2);
	assert_eq!(h.index.import_calls(), 2);
	assert_eq!(report.progress.pages_scanned, 2);
	assert_eq!(report.progress.batches_imported, 2);
	assert_eq!(report.progress.total_indexed, 501);
	assert_eq!(report.progress.total_failed, 0);
	assert_eq!(report.manifest_path, None);
	assert_eq!(h.index.len(), 501);
	assert!(!h.manifest_path.exists());
}

#[tokio::test]
async fn rerunning_over_unchanged_store_is_idempotent() {
	let h = harness(sample_records(40));
	let first = h.service.sync_index().await.expect("first sync failed");
	let second = h.service.sync_index().await.expect("second sync failed");

	assert_eq!(first.progress.total_indexed, 40);
	assert_eq!(second.progress.total_indexed, 40);
	assert!(first.progress.failed_record_ids.is_empty());
	assert!(second.progress.failed_record_ids.is_empty());
	assert_eq!(h.index.len(), 40);
}

#[tokio::test]
async fn records_without_id_or_timestamp_go_to_the_manifest() {
	let mut items = sample_records(3);

	items.push(malformed(json!({ "recordId": "rec-bad-ts", "timestamp": "someday" })));
	items.push(malformed(json!({ "recordId": "rec-no-ts", "userId": "user-1" })));
	items.push(malformed(json!({ "userId": "user-9", "timestamp": "2025-04-13T10:00:00.000Z" })));

	let h = harness(items);
	let report = h.service.sync_index().await.expect("sync failed");
	let mut failed = report.progress.failed_record_ids.clone();

	failed.sort();

	assert_eq!(report.progress.total_indexed, 3);
	assert_eq!(report.progress.total_failed, 3);
	assert_eq!(failed, ["[undefined]", "rec-bad-ts", "rec-no-ts"]);
	assert!(!h.index.contains("rec-bad-ts"));
	assert!(!h.index.contains("rec-no-ts"));

	let manifest_path = report.manifest_path.expect("manifest path missing");
	let mut manifest = read_manifest(std::path::Path::new(&manifest_path));

	manifest.sort();

	assert_eq!(manifest, failed);
}

#[tokio::test]
async fn page_without_valid_documents_still_advances() {
	let mut items = (0..3)
		.map(|i| malformed(json!({ "recordId": format!("rec-a{i}"), "timestamp": null })))
		.collect::<Vec<_>>();

	items.push(activity_item("rec-z1", "user-1", "view", "Chrome", "2025-04-13T10:00:00.000Z"));

	let h = harness_with(items, |cfg| cfg.sync.batch_size = 3);
	let report = h.service.sync_index().await.expect("sync failed");

	assert_eq!(report.progress.pages_scanned, 2);
	assert_eq!(report.progress.batches_imported, 1);
	assert_eq!(h.index.import_calls(), 1);
	assert_eq!(report.progress.total_indexed, 1);
	assert_eq!(report.progress.total_failed, 3);
}

#[tokio::test]
async fn rejected_documents_do_not_stop_the_run() {
	let h = harness_with(sample_records(10), |cfg| cfg.sync.batch_size = 4);

	h.index.reject("rec-0000002");
	h.index.reject("rec-0000009");

	let report = h.service.sync_index().await.expect("sync failed");

	assert_eq!(report.progress.pages_scanned, 3);
	assert_eq!(report.progress.total_indexed, 8);
	assert_eq!(report.progress.failed_record_ids, ["rec-0000002", "rec-0000009"]);
	assert_eq!(read_manifest(&h.manifest_path), ["rec-0000002", "rec-0000009"]);
}

#[tokio::test]
async fn scan_failure_aborts_with_accumulated_counts() {
	let h = harness_with(sample_records(10), |cfg| cfg.sync.batch_size = 4);

	h.index.reject("rec-0000001");
	h.records.fail_scan_on_call(2);

	let err = h.service.sync_index().await.expect_err("expected abort");

	match err {
		Error::SyncFailed { total_indexed, total_failed, .. } => {
			assert_eq!(total_indexed, 3);
			assert_eq!(total_failed, 1);
		},
		other => panic!("unexpected error: {other}"),
	}

	assert_eq!(read_manifest(&h.manifest_path), ["rec-0000001"]);
}

#[tokio::test]
async fn import_failure_is_fatal() {
	let h = harness(sample_records(5));

	h.index.fail_imports(true);

	let err = h.service.sync_index().await.expect_err("expected abort");

	assert!(matches!(err, Error::SyncFailed { total_indexed: 0, total_failed: 0, .. }));
	assert!(!h.manifest_path.exists());
}

#[tokio::test]
async fn import_response_must_cover_every_document() {
	let h = harness(sample_records(5));

	h.index.drop_last_outcome(true);

	let err = h.service.sync_index().await.expect_err("expected abort");

	assert!(matches!(err, Error::SyncFailed { .. }));
}

#[tokio::test]
async fn unwritable_manifest_still_reports_counts() {
	let mut items = sample_records(4);

	items.push(malformed(json!({ "recordId": "rec-bad-ts", "timestamp": "someday" })));

	let unwritable = std::env::temp_dir()
		.join(format!("trail-missing-dir-{}", uuid::Uuid::new_v4().simple()))
		.join("failed-records.json");
	let manifest_path = unwritable.display().to_string();
	let h = harness_with(items, |cfg| cfg.sync.manifest_path = manifest_path);
	let err = h.service.sync_index().await.expect_err("expected the manifest write to fail");

	match err {
		Error::Manifest { total_indexed, total_failed, .. } => {
			assert_eq!(total_indexed, 4);
			assert_eq!(total_failed, 1);
		},
		other => panic!("unexpected error: {other}"),
	}

	assert_eq!(h.index.len(), 4);
}

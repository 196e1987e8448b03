use std::collections::BTreeSet;

use trail_domain::filter::ActivityFilter;
use trail_testkit::sample_records;

use super::{harness, record_ids, timestamps};

fn filter(user_id: Option<&str>, action: Option<&str>, device: Option<&str>) -> ActivityFilter {
	ActivityFilter {
		user_id: user_id.map(str::to_string),
		action: action.map(str::to_string),
		device: device.map(str::to_string),
	}
}

#[tokio::test]
async fn combined_filter_is_the_intersection_of_single_filters() {
	let h = harness(sample_records(30));
	let by_user = h
		.service
		.filter_records(filter(Some("user-2"), None, None))
		.await
		.expect("user filter failed");
	let by_action =
		h.service.filter_records(filter(None, Some("edit"), None)).await.expect("action filter failed");
	let both = h
		.service
		.filter_records(filter(Some("user-2"), Some("edit"), None))
		.await
		.expect("combined filter failed");
	let by_user = record_ids(&by_user.items).into_iter().collect::<BTreeSet<_>>();
	let by_action = record_ids(&by_action.items).into_iter().collect::<BTreeSet<_>>();
	let both = record_ids(&both.items).into_iter().collect::<BTreeSet<_>>();

	assert!(!both.is_empty());
	assert_eq!(both, by_user.intersection(&by_action).cloned().collect());
}

#[tokio::test]
async fn filter_results_are_newest_first_and_match_nested_device() {
	let h = harness(sample_records(12));
	let response = h
		.service
		.filter_records(filter(None, None, Some("Mobile App")))
		.await
		.expect("filter failed");
	let stamps = timestamps(&response.items);

	assert_eq!(response.items.len(), 6);
	assert!(stamps.windows(2).all(|pair| pair[0] > pair[1]));
	assert!(response.items.iter().all(|item| item["metadata"]["device"] == "Mobile App"));
}

#[tokio::test]
async fn empty_filter_returns_every_record_in_the_partition() {
	let h = harness(sample_records(7));
	let response =
		h.service.filter_records(filter(Some(""), None, None)).await.expect("filter failed");

	assert_eq!(response.items.len(), 7);
}

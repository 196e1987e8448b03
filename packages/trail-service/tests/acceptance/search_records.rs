use trail_domain::{document::IndexedDocument, filter::Field};
use trail_service::{Error, SearchRecordsRequest};
use trail_testkit::sample_records;

use super::harness;

fn seeded(count: usize) -> super::Harness {
	let h = harness(Vec::new());

	for item in sample_records(count) {
		let document = IndexedDocument::project(&item).expect("fixture must project");

		h.index.insert(&document);
	}

	h
}

#[tokio::test]
async fn filters_and_pages_newest_first() {
	let h = seeded(30);
	let response = h
		.service
		.search_records(SearchRecordsRequest {
			user_id: Some("user-1".to_string()),
			page: Some("2".to_string()),
			per_page: Some("4".to_string()),
			..Default::default()
		})
		.await
		.expect("search failed");

	assert_eq!(response.total, 10);
	assert_eq!(response.page, 2);
	assert_eq!(response.results.len(), 4);
	assert!(response.results.iter().all(|doc| doc["userId"] == "user-1"));
	assert_eq!(response.results[0]["recordId"], "rec-0000016");

	let query = h.index.last_query().expect("index was not queried");

	assert_eq!(query.filter.to_filter_by().as_deref(), Some("userId:=`user-1`"));
	assert_eq!((query.page, query.per_page), (2, 4));
}

#[tokio::test]
async fn no_filters_means_unfiltered_search_with_defaults() {
	let h = seeded(15);
	let response =
		h.service.search_records(SearchRecordsRequest::default()).await.expect("search failed");

	assert_eq!(response.total, 15);
	assert_eq!(response.page, 1);
	assert_eq!(response.results.len(), 10);

	let query = h.index.last_query().expect("index was not queried");

	assert!(query.filter.is_empty());
	assert_eq!(query.filter.to_filter_by(), None);
}

#[tokio::test]
async fn device_filter_with_spaces_stays_literal() {
	let h = seeded(8);
	let response = h
		.service
		.search_records(SearchRecordsRequest {
			device: Some("Mobile App".to_string()),
			..Default::default()
		})
		.await
		.expect("search failed");

	assert_eq!(response.total, 4);

	let query = h.index.last_query().expect("index was not queried");

	assert_eq!(query.filter.clauses()[0].field, Field::Device);
	assert_eq!(query.filter.to_filter_by().as_deref(), Some("device:=`Mobile App`"));
}

#[tokio::test]
async fn invalid_paging_and_backticks_never_reach_the_index() {
	let h = seeded(3);
	let requests = [
		SearchRecordsRequest { page: Some("0".to_string()), ..Default::default() },
		SearchRecordsRequest { per_page: Some("many".to_string()), ..Default::default() },
		SearchRecordsRequest { action: Some("view` || x:=`y".to_string()), ..Default::default() },
	];

	for request in requests {
		let err = h.service.search_records(request).await.expect_err("expected rejection");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}

	assert_eq!(h.index.search_calls(), 0);
}

#[tokio::test]
async fn latest_returns_ten_newest_documents() {
	let h = seeded(12);
	let response = h.service.latest_records().await.expect("latest failed");

	assert_eq!(response.found, 12);
	assert_eq!(response.hits.len(), 10);
	assert_eq!(response.hits[0].document["recordId"], "rec-0000012");
}

#[tokio::test]
async fn reports_the_page_the_index_served() {
	let h = seeded(5);

	h.index.report_page(Some(1));

	let response = h
		.service
		.search_records(SearchRecordsRequest { page: Some("7".to_string()), ..Default::default() })
		.await
		.expect("search failed");

	assert_eq!(response.page, 1);
	assert_eq!(h.index.last_query().map(|query| query.page), Some(7));
}

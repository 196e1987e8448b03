//! Synthetic activity generator for load and pagination testing.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::task::JoinSet;
use uuid::Uuid;

use trail_domain::activity::{Action, ActivityRecord, Metadata, format_timestamp};

use crate::{Error, Result, TrailService};

const DEFAULT_COUNT: u32 = 1_000;
const DEFAULT_START_ID: u64 = 1;
const USER_COUNT: u32 = 5;
const LOCATIONS: [&str; 5] = ["New York", "Delhi", "London", "Sydney", "Tokyo"];
const DEVICES: [&str; 5] = ["Chrome", "Firefox", "Edge", "Safari", "Mobile App"];

/// Query string of the bulk insert. Unparseable values fall back to the defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkInsertRequest {
	pub count: Option<String>,
	pub start_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BulkInsertResponse {
	pub message: String,
}

impl TrailService {
	/// Writes `count` generated records concurrently. Any failed write fails the whole batch.
	pub async fn bulk_insert(&self, req: BulkInsertRequest) -> Result<BulkInsertResponse> {
		let max_count = self.cfg.query.max_bulk_count;
		let count = parse_or(req.count.as_deref(), DEFAULT_COUNT.min(max_count));
		let start_id = parse_or(req.start_id.as_deref(), DEFAULT_START_ID);

		if count > max_count {
			return Err(Error::invalid(format!("count must not exceed {max_count}.")));
		}

		let partition = &self.cfg.storage.dynamodb.partition_value;

		tracing::info!(count, start_id, "Starting bulk insert.");

		let records = generate_records(count, start_id, partition, &mut rand::thread_rng())?;
		let mut writes = JoinSet::new();

		for record in records {
			let store = self.backends.records.clone();

			writes.spawn(async move {
				let item = record.to_item();

				store.put_record(&item).await
			});
		}

		while let Some(joined) = writes.join_next().await {
			let written = joined.map_err(|err| Error::Storage { message: err.to_string() })?;

			if let Err(err) = written {
				writes.abort_all();
				tracing::error!(error = %err, "Bulk insert failed.");

				return Err(err.into());
			}
		}

		Ok(BulkInsertResponse { message: format!("{count} records inserted.") })
	}
}

/// Builds `count` records with ids `rec-{start_id}` onwards. Fails if the last id does not fit
/// in a `u64`.
pub fn generate_records<R>(
	count: u32,
	start_id: u64,
	partition: &str,
	rng: &mut R,
) -> Result<Vec<ActivityRecord>>
where
	R: Rng,
{
	let mut records = Vec::with_capacity(count as usize);

	for offset in 0..u64::from(count) {
		let Some(id) = start_id.checked_add(offset) else {
			return Err(Error::invalid("startId is too large for the requested count."));
		};
		let action = *Action::ALL.choose(rng).unwrap_or(&Action::View);
		let location = LOCATIONS.choose(rng).copied().unwrap_or(LOCATIONS[0]);
		let device = DEVICES.choose(rng).copied().unwrap_or(DEVICES[0]);

		records.push(ActivityRecord {
			record_id: format!("rec-{id:07}"),
			user_id: format!("user-{}", rng.gen_range(1..=USER_COUNT)),
			action,
			timestamp: format_timestamp(OffsetDateTime::now_utc())?,
			static_key: partition.to_string(),
			metadata: Metadata {
				session_id: Uuid::new_v4(),
				location: location.to_string(),
				device: device.to_string(),
			},
		});
	}

	Ok(records)
}

fn parse_or<T>(raw: Option<&str>, default: T) -> T
where
	T: std::str::FromStr + PartialOrd + Default,
{
	raw.and_then(|raw| raw.trim().parse::<T>().ok())
		.filter(|value| *value > T::default())
		.unwrap_or(default)
}

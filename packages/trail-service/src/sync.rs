//! Full-table mirror of activity records into the search index.

use std::path::Path;

use serde::Serialize;

use trail_domain::{cursor::ContinuationKey, document::IndexedDocument};

use crate::{Error, Result, TrailService};

/// Counters for one synchronizer run. Each run owns its own instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
	pub total_indexed: usize,
	pub total_failed: usize,
	pub failed_record_ids: Vec<String>,
	pub pages_scanned: usize,
	pub batches_imported: usize,
}
impl SyncProgress {
	fn record_failure(&mut self, record_id: String) {
		self.total_failed += 1;
		self.failed_record_ids.push(record_id);
	}
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
	pub message: String,
	#[serde(flatten)]
	pub progress: SyncProgress,
	/// Set when a failure manifest was written.
	pub manifest_path: Option<String>,
}

impl TrailService {
	/// Scans the activity table page by page and upserts every well-formed record into the
	/// search index. Per-record failures are collected; a scan or import failure ends the run.
	pub async fn sync_index(&self) -> Result<SyncReport> {
		let mut progress = SyncProgress::default();
		let outcome = self.sync_pages(&mut progress).await;
		let manifest = self.persist_manifest(&progress).await;

		match outcome {
			Ok(()) => {
				let manifest_path = manifest?;

				tracing::info!(
					indexed = progress.total_indexed,
					failed = progress.total_failed,
					pages = progress.pages_scanned,
					"Index synchronization finished."
				);

				Ok(SyncReport {
					message: format!(
						"Indexed {} records. {} failed.",
						progress.total_indexed, progress.total_failed
					),
					progress,
					manifest_path,
				})
			},
			Err(err) => {
				if let Err(manifest_err) = manifest {
					tracing::warn!(error = %manifest_err, "Failure manifest was not written.");
				}

				tracing::error!(
					error = %err,
					indexed = progress.total_indexed,
					failed = progress.total_failed,
					"Index synchronization aborted."
				);

				Err(Error::SyncFailed {
					message: err.to_string(),
					total_indexed: progress.total_indexed,
					total_failed: progress.total_failed,
				})
			},
		}
	}

	async fn sync_pages(&self, progress: &mut SyncProgress) -> Result<()> {
		let batch_size = self.cfg.sync.batch_size;
		let mut start_key: Option<ContinuationKey> = None;

		loop {
			let page = self.backends.records.scan_page(batch_size, start_key.as_ref()).await?;

			progress.pages_scanned += 1;

			let mut documents = Vec::with_capacity(page.items.len());

			for item in &page.items {
				match IndexedDocument::project(item) {
					Ok(document) => documents.push(document),
					Err(rejected) => {
						let record_id = rejected.manifest_id();

						tracing::warn!(%record_id, "Skipping record without recordId or timestamp.");
						progress.record_failure(record_id);
					},
				}
			}

			if !documents.is_empty() {
				self.import_batch(&documents, progress).await?;
			}

			tracing::info!(
				page = progress.pages_scanned,
				scanned = page.items.len(),
				indexed = progress.total_indexed,
				failed = progress.total_failed,
				"Synchronized page."
			);

			match page.last_key {
				Some(key) => start_key = Some(key),
				None => return Ok(()),
			}
		}
	}

	async fn import_batch(
		&self,
		documents: &[IndexedDocument],
		progress: &mut SyncProgress,
	) -> Result<()> {
		let outcomes = self.backends.index.import(documents).await?;

		if outcomes.len() != documents.len() {
			return Err(Error::Search {
				message: format!(
					"Import returned {} results for {} documents.",
					outcomes.len(),
					documents.len()
				),
			});
		}

		progress.batches_imported += 1;

		for (document, outcome) in documents.iter().zip(outcomes) {
			if outcome.success {
				progress.total_indexed += 1;
			} else {
				tracing::warn!(
					record_id = %document.record_id,
					error = outcome.error.as_deref().unwrap_or("unknown"),
					"Index rejected document."
				);
				progress.record_failure(document.record_id.clone());
			}
		}

		Ok(())
	}

	async fn persist_manifest(&self, progress: &SyncProgress) -> Result<Option<String>> {
		if progress.failed_record_ids.is_empty() {
			return Ok(None);
		}

		let path = Path::new(&self.cfg.sync.manifest_path);

		write_manifest(path, &progress.failed_record_ids).await.map_err(|err| Error::Manifest {
			message: format!("{}: {err}", path.display()),
			total_indexed: progress.total_indexed,
			total_failed: progress.total_failed,
		})?;

		tracing::info!(
			path = %path.display(),
			count = progress.failed_record_ids.len(),
			"Wrote failure manifest."
		);

		Ok(Some(self.cfg.sync.manifest_path.clone()))
	}
}

/// Writes `record_ids` as a pretty-printed JSON array.
pub async fn write_manifest(path: &Path, record_ids: &[String]) -> std::io::Result<()> {
	let body = serde_json::to_vec_pretty(record_ids)?;

	tokio::fs::write(path, body).await
}

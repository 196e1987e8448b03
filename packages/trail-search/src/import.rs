//! JSONL framing for bulk imports.

use trail_domain::document::IndexedDocument;

use crate::{Error, ImportOutcome, Result};

pub fn encode_jsonl(documents: &[IndexedDocument]) -> Result<String> {
	let mut body = String::new();

	for document in documents {
		if !body.is_empty() {
			body.push('\n');
		}

		body.push_str(&serde_json::to_string(document)?);
	}

	Ok(body)
}

/// Parses an import response, one outcome per non-blank line, and checks that every submitted
/// document received exactly one outcome.
pub fn parse_import_response(body: &str, submitted: usize) -> Result<Vec<ImportOutcome>> {
	let outcomes = body
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(serde_json::from_str::<ImportOutcome>)
		.collect::<Result<Vec<_>, _>>()?;

	if outcomes.len() != submitted {
		return Err(Error::InvalidResponse(format!(
			"import returned {} result lines for {submitted} documents",
			outcomes.len()
		)));
	}

	Ok(outcomes)
}

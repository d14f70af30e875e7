//! Fixture builders shared by the workspace's integration tests.

use serde_json::{Value, json};
use time::{OffsetDateTime, macros::datetime};

pub const FIXED_CLOCK: OffsetDateTime = datetime!(2025-03-14 6:00 UTC);

pub fn document_hit(id: &str, confidence: f64) -> Value {
	json!({
		"id": id,
		"displayName": format!("Manual {id}"),
		"confidenceScore": confidence,
		"snippet": format!("Procedure text for {id}."),
		"pageRef": format!("manuals/{id}.pdf#page=1"),
		"url": format!("https://docs.example/{id}"),
	})
}

pub fn email_hit(id: &str, subject: &str, confidence: f64) -> Value {
	json!({
		"id": id,
		"subject": subject,
		"from": "chief.engineer@vessel.example",
		"receivedDateTime": "2025-03-13T22:15:00Z",
		"bodyPreview": format!("Re: {subject}"),
		"webLink": format!("https://mail.example/{id}"),
		"confidenceScore": confidence,
		"hasAttachments": false,
	})
}

/// `count` document hits with strictly decreasing confidence, in input order.
pub fn decreasing_document_hits(count: usize) -> Vec<Value> {
	(0..count)
		.map(|index| document_hit(&format!("d{index}"), 1.0 - index as f64 * 0.05))
		.collect()
}

pub fn tied_document_hits(count: usize, confidence: f64) -> Vec<Value> {
	(0..count).map(|index| document_hit(&format!("d{index}"), confidence)).collect()
}

pub fn request(source_type: &str, query: &str, hits: Vec<Value>) -> Value {
	json!({
		"success": true,
		"payload": {
			"rawHits": hits,
			"sourceType": source_type,
			"query": query,
		},
	})
}

pub fn request_with_template(
	source_type: &str,
	query: &str,
	hits: Vec<Value>,
	template: Value,
) -> Value {
	let mut value = request(source_type, query, hits);

	value["payload"]["existingHandoverTemplate"] = template;

	value
}

/// Ids of the records in one serialized tier array.
pub fn tier_ids(tier: &Value) -> Vec<String> {
	tier.as_array()
		.map(|records| {
			records
				.iter()
				.filter_map(|record| record["id"].as_str().map(str::to_string))
				.collect()
		})
		.unwrap_or_default()
}

pub fn ids(range: std::ops::Range<usize>) -> Vec<String> {
	range.map(|index| format!("d{index}")).collect()
}

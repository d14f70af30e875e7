use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{handover::HandoverTemplate, hit::SourceType};

pub const PRIMARY_LINK: &str = "primary";

/// Source-agnostic shape of a single hit. Built once by the normalizer and never changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
	pub id: String,
	pub source_type: SourceType,
	pub display_name: String,
	pub confidence: f32,
	pub snippet: String,
	pub locator: String,
	pub links: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub handover_fragment: Option<HandoverTemplate>,
	pub metadata: Map<String, Value>,
}
impl CanonicalRecord {
	/// The `primary` link when present, otherwise the first link by name.
	pub fn primary_link(&self) -> Option<&str> {
		self.links
			.get(PRIMARY_LINK)
			.or_else(|| self.links.values().next())
			.map(String::as_str)
			.filter(|link| !link.trim().is_empty())
	}
}

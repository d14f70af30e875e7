//! Shift-change handover synthesis.
//!
//! A template arrives partially filled by a person or an upstream process. Synthesis builds a
//! new template in one pass: fields that already hold text are carried over untouched, and empty
//! fields are filled by fixed derivation rules or by the first explicit per-record fragment.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::rank::RankedRecord;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("Handover template must be a JSON object.")]
	NotAnObject,
	#[error("Handover field {field} must be a string, a number, or null.")]
	InvalidField { field: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandoverField {
	System,
	FaultCode,
	Symptoms,
	ActionsTaken,
	DurationMinutes,
	LinkedDocument,
}
impl HandoverField {
	pub const ALL: [Self; 6] = [
		Self::System,
		Self::FaultCode,
		Self::Symptoms,
		Self::ActionsTaken,
		Self::DurationMinutes,
		Self::LinkedDocument,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::System => "system",
			Self::FaultCode => "faultCode",
			Self::Symptoms => "symptoms",
			Self::ActionsTaken => "actionsTaken",
			Self::DurationMinutes => "durationMinutes",
			Self::LinkedDocument => "linkedDocument",
		}
	}

	fn snake_case(self) -> &'static str {
		match self {
			Self::System => "system",
			Self::FaultCode => "fault_code",
			Self::Symptoms => "symptoms",
			Self::ActionsTaken => "actions_taken",
			Self::DurationMinutes => "duration_minutes",
			Self::LinkedDocument => "linked_document",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
	UserSupplied,
	AutoFilled,
	Empty,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverTemplate {
	pub system: Option<String>,
	pub fault_code: Option<String>,
	pub symptoms: Option<String>,
	pub actions_taken: Option<String>,
	pub duration_minutes: Option<String>,
	pub linked_document: Option<String>,
}
impl HandoverTemplate {
	/// Reads a template leniently: camelCase or snake_case keys, numbers are kept in their
	/// decimal form, unknown keys are ignored.
	pub fn from_json(value: &Value) -> Result<Self, TemplateError> {
		let Value::Object(map) = value else { return Err(TemplateError::NotAnObject) };

		Ok(Self {
			system: read_field(map, HandoverField::System)?,
			fault_code: read_field(map, HandoverField::FaultCode)?,
			symptoms: read_field(map, HandoverField::Symptoms)?,
			actions_taken: read_field(map, HandoverField::ActionsTaken)?,
			duration_minutes: read_field(map, HandoverField::DurationMinutes)?,
			linked_document: read_field(map, HandoverField::LinkedDocument)?,
		})
	}

	pub fn get(&self, field: HandoverField) -> Option<&str> {
		let value = match field {
			HandoverField::System => &self.system,
			HandoverField::FaultCode => &self.fault_code,
			HandoverField::Symptoms => &self.symptoms,
			HandoverField::ActionsTaken => &self.actions_taken,
			HandoverField::DurationMinutes => &self.duration_minutes,
			HandoverField::LinkedDocument => &self.linked_document,
		};

		value.as_deref()
	}

	/// A field is filled when it holds something other than whitespace.
	pub fn is_filled(&self, field: HandoverField) -> bool {
		self.get(field).is_some_and(|value| !value.trim().is_empty())
	}

	pub fn is_empty(&self) -> bool {
		HandoverField::ALL.iter().all(|field| !self.is_filled(*field))
	}

	fn merged(&self, fills: &BTreeMap<HandoverField, String>) -> Self {
		let pick = |field: HandoverField| match fills.get(&field) {
			Some(value) => Some(value.clone()),
			None => self.get(field).map(str::to_string),
		};

		Self {
			system: pick(HandoverField::System),
			fault_code: pick(HandoverField::FaultCode),
			symptoms: pick(HandoverField::Symptoms),
			actions_taken: pick(HandoverField::ActionsTaken),
			duration_minutes: pick(HandoverField::DurationMinutes),
			linked_document: pick(HandoverField::LinkedDocument),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverMetadata {
	pub auto_filled_count: usize,
	pub auto_filled_field_names: BTreeSet<HandoverField>,
	pub entity_count: usize,
	pub confidence_score: f32,
	pub field_provenance: BTreeMap<HandoverField, Provenance>,
	#[serde(with = "crate::time_serde")]
	pub generated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Handover {
	pub template: HandoverTemplate,
	pub metadata: HandoverMetadata,
}

struct Fill {
	value: String,
	contributor: Option<usize>,
}

pub fn synthesize(
	existing: Option<&HandoverTemplate>,
	ranked: &[RankedRecord],
	query: &str,
	generated_at: OffsetDateTime,
) -> Handover {
	let base = existing.cloned().unwrap_or_default();
	let mut fills = BTreeMap::new();
	let mut contributors = BTreeSet::new();

	for field in HandoverField::ALL {
		if base.is_filled(field) {
			continue;
		}

		let Some(fill) = derive(field, ranked, query).or_else(|| from_fragments(field, ranked))
		else {
			continue;
		};

		if let Some(position) = fill.contributor {
			contributors.insert(position);
		}

		fills.insert(field, fill.value);
	}

	let template = base.merged(&fills);
	let field_provenance = HandoverField::ALL
		.into_iter()
		.map(|field| {
			let provenance = if base.is_filled(field) {
				Provenance::UserSupplied
			} else if fills.contains_key(&field) {
				Provenance::AutoFilled
			} else {
				Provenance::Empty
			};

			(field, provenance)
		})
		.collect();
	let auto_filled_field_names: BTreeSet<HandoverField> = fills.keys().copied().collect();

	Handover {
		template,
		metadata: HandoverMetadata {
			auto_filled_count: auto_filled_field_names.len(),
			auto_filled_field_names,
			entity_count: contributors.len(),
			confidence_score: contributor_confidence(ranked, &contributors),
			field_provenance,
			generated_at,
		},
	}
}

/// Fixed rules: the top record's primary link and the query text.
fn derive(field: HandoverField, ranked: &[RankedRecord], query: &str) -> Option<Fill> {
	match field {
		HandoverField::LinkedDocument => ranked
			.first()
			.and_then(|top| top.record.primary_link())
			.map(|link| Fill { value: link.trim().to_string(), contributor: Some(0) }),
		HandoverField::Symptoms => Some(query.trim())
			.filter(|query| !query.is_empty())
			.map(|query| Fill { value: query.to_string(), contributor: None }),
		_ => None,
	}
}

fn from_fragments(field: HandoverField, ranked: &[RankedRecord]) -> Option<Fill> {
	ranked.iter().enumerate().find_map(|(position, item)| {
		let value = item.record.handover_fragment.as_ref()?.get(field)?.trim();

		(!value.is_empty())
			.then(|| Fill { value: value.to_string(), contributor: Some(position) })
	})
}

fn contributor_confidence(ranked: &[RankedRecord], contributors: &BTreeSet<usize>) -> f32 {
	if contributors.is_empty() {
		return 0.0;
	}

	let total: f64 = contributors
		.iter()
		.filter_map(|position| ranked.get(*position))
		.map(|item| f64::from(item.record.confidence))
		.sum();

	((total / contributors.len() as f64) as f32).clamp(0.0, 1.0)
}

fn read_field(
	map: &Map<String, Value>,
	field: HandoverField,
) -> Result<Option<String>, TemplateError> {
	let raw = [field.as_str(), field.snake_case()]
		.into_iter()
		.filter_map(|key| map.get(key))
		.find(|value| !value.is_null());

	match raw {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(value)) => Ok(Some(value.clone())),
		Some(Value::Number(value)) => Ok(Some(value.to_string())),
		Some(_) => Err(TemplateError::InvalidField { field: field.as_str().to_string() }),
	}
}

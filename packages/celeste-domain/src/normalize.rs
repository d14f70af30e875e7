use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
	handover::HandoverTemplate,
	hit::{DocumentHit, EmailHit, HitShape, RawConfidence, RawHit, SourceType},
	record::{CanonicalRecord, PRIMARY_LINK},
	text,
};

const UNTITLED_DOCUMENT: &str = "Untitled document";
const NO_SUBJECT: &str = "(No Subject)";
const SYNTHETIC_ID_HEX_LEN: usize = 16;
const FULL_SNIPPET_KEY: &str = "fullSnippet";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeOptions {
	pub snippet_max_chars: usize,
}
impl NormalizeOptions {
	pub fn from_config(cfg: &celeste_config::Normalize) -> Self {
		Self { snippet_max_chars: cfg.snippet_max_chars as usize }
	}
}
impl Default for NormalizeOptions {
	fn default() -> Self {
		Self::from_config(&celeste_config::Normalize::default())
	}
}

/// A per-record problem that was repaired during normalization.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RecordDefect {
	NotAnObject,
	MissingId,
	MissingDisplayName,
	NonNumericConfidence,
	ConfidenceOutOfRange { value: f64 },
	MalformedHandoverFragment { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
	pub record: CanonicalRecord,
	pub defects: Vec<RecordDefect>,
}

pub fn normalize_all(hits: &[RawHit], opts: &NormalizeOptions) -> Vec<Normalized> {
	hits.iter().enumerate().map(|(index, hit)| normalize(hit, index, opts)).collect()
}

pub fn normalize(hit: &RawHit, index: usize, opts: &NormalizeOptions) -> Normalized {
	let mut defects = Vec::new();

	if hit.shape() == HitShape::NotAnObject {
		defects.push(RecordDefect::NotAnObject);
	}

	let draft = match hit {
		RawHit::Document(document) => normalize_document(document, opts, &mut defects),
		RawHit::Email(email) => normalize_email(email, opts, &mut defects),
	};
	let id = if draft.id.is_empty() {
		defects.push(RecordDefect::MissingId);

		synthetic_id(hit, index)
	} else {
		draft.id
	};

	Normalized { record: CanonicalRecord { id, ..draft.record }, defects }
}

struct Draft {
	id: String,
	record: CanonicalRecord,
}

fn normalize_document(
	hit: &DocumentHit,
	opts: &NormalizeOptions,
	defects: &mut Vec<RecordDefect>,
) -> Draft {
	let display_name = match hit
		.display_name
		.clone()
		.or_else(|| hit.page_ref.as_deref().and_then(text::path_tail).map(str::to_string))
	{
		Some(name) => name,
		None => {
			defects.push(RecordDefect::MissingDisplayName);

			UNTITLED_DOCUMENT.to_string()
		},
	};

	draft(
		hit.id.as_deref(),
		SourceType::Document,
		display_name,
		&hit.confidence,
		hit.snippet.as_deref(),
		hit.page_ref.clone().unwrap_or_default(),
		links_with_primary(&hit.links, hit.url.as_deref()),
		hit.handover_fragment.as_ref(),
		hit.extra.clone(),
		opts,
		defects,
	)
}

fn normalize_email(
	hit: &EmailHit,
	opts: &NormalizeOptions,
	defects: &mut Vec<RecordDefect>,
) -> Draft {
	let display_name = match hit.subject.clone() {
		Some(subject) => subject,
		None => {
			defects.push(RecordDefect::MissingDisplayName);

			NO_SUBJECT.to_string()
		},
	};
	let locator = [hit.sender.as_deref(), hit.subject.as_deref()]
		.into_iter()
		.flatten()
		.collect::<Vec<_>>()
		.join(" · ");
	let mut metadata = hit.extra.clone();

	if let Some(received_at) = &hit.received_at {
		metadata.insert("receivedDateTime".to_string(), Value::String(received_at.clone()));
	}
	if let Some(sender) = &hit.sender {
		metadata.insert("sender".to_string(), Value::String(sender.clone()));
	}

	draft(
		hit.id.as_deref(),
		SourceType::Email,
		display_name,
		&hit.confidence,
		hit.preview.as_deref(),
		locator,
		links_with_primary(&hit.links, hit.web_link.as_deref()),
		hit.handover_fragment.as_ref(),
		metadata,
		opts,
		defects,
	)
}

#[allow(clippy::too_many_arguments)]
fn draft(
	id: Option<&str>,
	source_type: SourceType,
	display_name: String,
	confidence: &RawConfidence,
	snippet: Option<&str>,
	locator: String,
	links: BTreeMap<String, String>,
	fragment: Option<&Value>,
	mut metadata: Map<String, Value>,
	opts: &NormalizeOptions,
	defects: &mut Vec<RecordDefect>,
) -> Draft {
	let handover_fragment = fragment.and_then(|raw| match HandoverTemplate::from_json(raw) {
		Ok(template) => Some(template),
		Err(err) => {
			defects.push(RecordDefect::MalformedHandoverFragment { reason: err.to_string() });
			metadata.insert("handoverFragment".to_string(), raw.clone());

			None
		},
	});

	let snippet = match snippet {
		Some(raw) => {
			let full = text::normalize_whitespace(raw);
			let shown = text::truncate_graphemes(&full, opts.snippet_max_chars);

			if shown != full {
				metadata.insert(FULL_SNIPPET_KEY.to_string(), Value::String(full));
			}

			shown
		},
		None => String::new(),
	};

	Draft {
		id: id.map(str::to_string).unwrap_or_default(),
		record: CanonicalRecord {
			id: String::new(),
			source_type,
			display_name,
			confidence: resolve_confidence(confidence, defects),
			snippet,
			locator,
			links,
			handover_fragment,
			metadata,
		},
	}
}

/// Absent or non-numeric confidence becomes `0`. An explicit `0` is kept as is.
fn resolve_confidence(raw: &RawConfidence, defects: &mut Vec<RecordDefect>) -> f32 {
	match raw {
		RawConfidence::Absent => 0.0,
		RawConfidence::Invalid(_) => {
			defects.push(RecordDefect::NonNumericConfidence);

			0.0
		},
		RawConfidence::Number(value) if !value.is_finite() => {
			defects.push(RecordDefect::NonNumericConfidence);

			0.0
		},
		RawConfidence::Number(value) => {
			if !(0.0..=1.0).contains(value) {
				defects.push(RecordDefect::ConfidenceOutOfRange { value: *value });
			}

			let clamped = value.clamp(0.0, 1.0) as f32;

			// Folds -0.0 into 0.0 so ranking sees a single zero.
			if clamped == 0.0 { 0.0 } else { clamped }
		},
	}
}

fn links_with_primary(
	links: &BTreeMap<String, String>,
	primary: Option<&str>,
) -> BTreeMap<String, String> {
	let mut out = links.clone();

	if let Some(url) = primary {
		out.insert(PRIMARY_LINK.to_string(), url.to_string());
	}

	out
}

/// Content hash of whatever the hit carried, or its position when it carried nothing.
fn synthetic_id(hit: &RawHit, index: usize) -> String {
	let prefix = hit.source_type().id_prefix();

	if hit.is_blank() {
		return format!("{prefix}-{index}");
	}

	match serde_json::to_vec(hit) {
		Ok(raw) => {
			let hex = blake3::hash(&raw).to_hex();

			format!("{prefix}-{}", &hex.as_str()[..SYNTHETIC_ID_HEX_LEN])
		},
		Err(_) => format!("{prefix}-{index}"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn negative_zero_folds_to_zero() {
		let mut defects = Vec::new();
		let value = resolve_confidence(&RawConfidence::Number(-0.0), &mut defects);

		assert!(value.is_sign_positive());
		assert!(defects.is_empty());
	}

	#[test]
	fn out_of_range_is_clamped_and_reported() {
		let mut defects = Vec::new();

		assert_eq!(resolve_confidence(&RawConfidence::Number(1.7), &mut defects), 1.0);
		assert_eq!(defects, vec![RecordDefect::ConfidenceOutOfRange { value: 1.7 }]);
	}

	#[test]
	fn primary_link_overrides_named_primary() {
		let mut links = BTreeMap::new();

		links.insert("primary".to_string(), "https://old.example".to_string());

		let merged = links_with_primary(&links, Some("https://new.example"));

		assert_eq!(merged["primary"], "https://new.example");
	}
}

//! Backend adapters that lift raw JSON hits into the [`RawHit`] tagged union.
//!
//! Adapters only pick known keys out of the object. Unused aliases and values of an unexpected
//! type stay in `extra` under their original key so nothing is lost before normalization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id"];
const CONFIDENCE_KEYS: &[&str] = &["confidenceScore", "confidence_score", "confidence", "score"];
const LINKS_KEYS: &[&str] = &["links"];
const FRAGMENT_KEYS: &[&str] = &["handoverFragment", "handover_fragment"];
const DOCUMENT_NAME_KEYS: &[&str] = &["displayName", "display_name", "title", "filename"];
const DOCUMENT_SNIPPET_KEYS: &[&str] = &["snippet", "content", "text"];
const DOCUMENT_LOCATOR_KEYS: &[&str] = &["pageRef", "page_ref", "locator", "path"];
const DOCUMENT_URL_KEYS: &[&str] = &["url", "link"];
const EMAIL_SUBJECT_KEYS: &[&str] = &["subject", "displayName", "display_name"];
const EMAIL_SENDER_KEYS: &[&str] = &["sender", "from"];
const EMAIL_RECEIVED_KEYS: &[&str] = &["receivedDateTime", "received_at"];
const EMAIL_PREVIEW_KEYS: &[&str] = &["bodyPreview", "snippet", "preview"];
const EMAIL_URL_KEYS: &[&str] = &["webLink", "url"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
	Document,
	Email,
}
impl SourceType {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"document" => Some(Self::Document),
			"email" => Some(Self::Email),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Document => "document",
			Self::Email => "email",
		}
	}

	pub fn id_prefix(self) -> &'static str {
		match self {
			Self::Document => "doc",
			Self::Email => "email",
		}
	}
}

/// Confidence as the backend sent it, before any defaulting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RawConfidence {
	Absent,
	Number(f64),
	Invalid(Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HitShape {
	Object,
	NotAnObject,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentHit {
	pub id: Option<String>,
	pub display_name: Option<String>,
	pub confidence: RawConfidence,
	pub snippet: Option<String>,
	pub page_ref: Option<String>,
	pub url: Option<String>,
	pub links: BTreeMap<String, String>,
	pub handover_fragment: Option<Value>,
	pub extra: Map<String, Value>,
	pub shape: HitShape,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmailHit {
	pub id: Option<String>,
	pub subject: Option<String>,
	pub sender: Option<String>,
	pub received_at: Option<String>,
	pub confidence: RawConfidence,
	pub preview: Option<String>,
	pub web_link: Option<String>,
	pub links: BTreeMap<String, String>,
	pub handover_fragment: Option<Value>,
	pub extra: Map<String, Value>,
	pub shape: HitShape,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RawHit {
	Document(DocumentHit),
	Email(EmailHit),
}
impl RawHit {
	pub fn from_json(value: &Value, source_type: SourceType) -> Self {
		match source_type {
			SourceType::Document => Self::Document(DocumentHit::from_json(value)),
			SourceType::Email => Self::Email(EmailHit::from_json(value)),
		}
	}

	pub fn source_type(&self) -> SourceType {
		match self {
			Self::Document(_) => SourceType::Document,
			Self::Email(_) => SourceType::Email,
		}
	}

	pub fn shape(&self) -> HitShape {
		match self {
			Self::Document(hit) => hit.shape,
			Self::Email(hit) => hit.shape,
		}
	}

	/// True when the backend supplied no usable field at all.
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Document(hit) =>
				hit.id.is_none()
					&& hit.display_name.is_none()
					&& hit.confidence == RawConfidence::Absent
					&& hit.snippet.is_none()
					&& hit.page_ref.is_none()
					&& hit.url.is_none()
					&& hit.links.is_empty()
					&& hit.handover_fragment.is_none()
					&& hit.extra.is_empty(),
			Self::Email(hit) =>
				hit.id.is_none()
					&& hit.subject.is_none()
					&& hit.sender.is_none()
					&& hit.received_at.is_none()
					&& hit.confidence == RawConfidence::Absent
					&& hit.preview.is_none()
					&& hit.web_link.is_none()
					&& hit.links.is_empty()
					&& hit.handover_fragment.is_none()
					&& hit.extra.is_empty(),
		}
	}
}

impl DocumentHit {
	pub fn from_json(value: &Value) -> Self {
		let (mut fields, shape) = object_fields(value);

		Self {
			id: take_text(&mut fields, ID_KEYS),
			display_name: take_text(&mut fields, DOCUMENT_NAME_KEYS),
			confidence: take_confidence(&mut fields),
			snippet: take_text(&mut fields, DOCUMENT_SNIPPET_KEYS),
			page_ref: take_text(&mut fields, DOCUMENT_LOCATOR_KEYS),
			url: take_text(&mut fields, DOCUMENT_URL_KEYS),
			links: take_links(&mut fields),
			handover_fragment: take_raw(&mut fields, FRAGMENT_KEYS),
			extra: fields,
			shape,
		}
	}
}

impl EmailHit {
	pub fn from_json(value: &Value) -> Self {
		let (mut fields, shape) = object_fields(value);

		Self {
			id: take_text(&mut fields, ID_KEYS),
			subject: take_text(&mut fields, EMAIL_SUBJECT_KEYS),
			sender: take_text(&mut fields, EMAIL_SENDER_KEYS),
			received_at: take_text(&mut fields, EMAIL_RECEIVED_KEYS),
			confidence: take_confidence(&mut fields),
			preview: take_text(&mut fields, EMAIL_PREVIEW_KEYS),
			web_link: take_text(&mut fields, EMAIL_URL_KEYS),
			links: take_links(&mut fields),
			handover_fragment: take_raw(&mut fields, FRAGMENT_KEYS),
			extra: fields,
			shape,
		}
	}
}

fn object_fields(value: &Value) -> (Map<String, Value>, HitShape) {
	match value {
		Value::Object(map) => (map.clone(), HitShape::Object),
		Value::Null => (Map::new(), HitShape::NotAnObject),
		other => {
			let mut fields = Map::new();

			fields.insert("rawValue".to_string(), other.clone());

			(fields, HitShape::NotAnObject)
		},
	}
}

/// Takes the first alias holding a non-blank string or number. Only the chosen key is removed;
/// every other alias stays in `fields`.
fn take_text(fields: &mut Map<String, Value>, keys: &[&str]) -> Option<String> {
	for key in keys {
		let text = match fields.get(*key) {
			Some(Value::String(raw)) => raw.trim().to_string(),
			Some(Value::Number(number)) => number.to_string(),
			_ => continue,
		};

		if text.is_empty() {
			continue;
		}

		fields.remove(*key);

		return Some(text);
	}

	None
}

fn take_raw(fields: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
	let key = keys.iter().find(|key| fields.get(**key).is_some_and(|value| !value.is_null()))?;

	fields.remove(*key)
}

fn take_confidence(fields: &mut Map<String, Value>) -> RawConfidence {
	match take_raw(fields, CONFIDENCE_KEYS) {
		None => RawConfidence::Absent,
		Some(Value::Number(number)) => match number.as_f64() {
			Some(value) => RawConfidence::Number(value),
			None => RawConfidence::Invalid(Value::Number(number)),
		},
		Some(other) => RawConfidence::Invalid(other),
	}
}

/// String-valued entries become links; the rest stay under `links` in `extra`.
fn take_links(fields: &mut Map<String, Value>) -> BTreeMap<String, String> {
	let mut links = BTreeMap::new();

	for key in LINKS_KEYS {
		let Some(Value::Object(raw)) = fields.get(*key) else { continue };
		let mut rejected = Map::new();

		for (name, value) in raw {
			match value.as_str().map(str::trim) {
				Some(url) if !url.is_empty() => {
					links.insert(name.clone(), url.to_string());
				},
				_ => {
					rejected.insert(name.clone(), value.clone());
				},
			}
		}

		if rejected.is_empty() {
			fields.remove(*key);
		} else {
			fields.insert((*key).to_string(), Value::Object(rejected));
		}
	}

	links
}

//! Top-level payload validation. Anything rejected here is fatal for the whole run.

use serde_json::{Map, Value};

use celeste_domain::{HandoverTemplate, SourceType};

use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest<'a> {
	pub raw_hits: &'a [Value],
	pub source_type: SourceType,
	pub query: &'a str,
	pub existing_template: Option<HandoverTemplate>,
	pub tracking: Option<&'a Map<String, Value>>,
}

pub fn validate(input: &Value) -> Result<ValidatedRequest<'_>> {
	let Some(root) = input.as_object() else {
		return Err(Error::input_shape("Request must be a JSON object."));
	};

	match root.get("success") {
		Some(Value::Bool(true)) => {},
		Some(Value::Bool(false)) =>
			return Err(Error::input_shape("Upstream search reported success=false.")),
		_ => return Err(Error::input_shape("success must be a boolean.")),
	}

	let Some(payload) = root.get("payload").and_then(Value::as_object) else {
		return Err(Error::input_shape("payload must be an object."));
	};
	let Some(raw_hits) = payload.get("rawHits").and_then(Value::as_array) else {
		return Err(Error::input_shape("payload.rawHits must be an array."));
	};
	let Some(source_type) =
		payload.get("sourceType").and_then(Value::as_str).and_then(SourceType::parse)
	else {
		return Err(Error::input_shape("payload.sourceType must be one of document or email."));
	};
	let Some(query) = payload.get("query").and_then(Value::as_str) else {
		return Err(Error::input_shape("payload.query must be a string."));
	};
	let existing_template = match payload.get("existingHandoverTemplate") {
		None | Some(Value::Null) => None,
		Some(raw) => Some(HandoverTemplate::from_json(raw).map_err(|err| {
			Error::input_shape(format!("payload.existingHandoverTemplate is invalid: {err}"))
		})?),
	};
	let tracking = match payload.get("tracking") {
		None | Some(Value::Null) => None,
		Some(Value::Object(tracking)) => Some(tracking),
		Some(_) => return Err(Error::input_shape("payload.tracking must be an object.")),
	};

	Ok(ValidatedRequest {
		raw_hits: raw_hits.as_slice(),
		source_type,
		query,
		existing_template,
		tracking,
	})
}

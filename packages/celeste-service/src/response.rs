use serde::Serialize;
use time::OffsetDateTime;

use celeste_domain::{HandoverMetadata, HandoverTemplate, Summary, Tiers};

use crate::{Error, ErrorKind, trace::DebugTrace};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
	pub success: bool,
	pub tiers: Tiers,
	pub summary: Summary,
	pub handover_template: HandoverTemplate,
	pub handover_metadata: HandoverMetadata,
	pub debug_trace: DebugTrace,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailureBody {
	pub kind: ErrorKind,
	pub message: String,
	#[serde(with = "celeste_domain::time_serde")]
	pub timestamp: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineFailure {
	pub success: bool,
	pub error: FailureBody,
}
impl PipelineFailure {
	pub fn from_error(err: &Error, timestamp: OffsetDateTime) -> Self {
		Self {
			success: false,
			error: FailureBody { kind: err.kind(), message: err.detail().to_string(), timestamp },
		}
	}
}

/// Serializes to exactly one of the success or failure shapes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineResponse {
	Success(Box<PipelineOutput>),
	Failure(PipelineFailure),
}
impl PipelineResponse {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	pub fn output(&self) -> Option<&PipelineOutput> {
		match self {
			Self::Success(output) => Some(&**output),
			Self::Failure(_) => None,
		}
	}

	pub fn failure(&self) -> Option<&PipelineFailure> {
		match self {
			Self::Success(_) => None,
			Self::Failure(failure) => Some(failure),
		}
	}

	pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
		serde_json::to_value(self)
	}
}

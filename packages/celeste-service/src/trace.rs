use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use celeste_domain::{ConfidenceBandReport, RecordDefect, SourceType, TierName, TierSpec};

const TRACE_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_3a52_9d4e_4f0b_a7c8_2e51_d0b9_7a13);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
	Validate,
	Normalize,
	Rank,
	Partition,
	SynthesizeHandover,
	Aggregate,
	Emit,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Validate => "validate",
			Self::Normalize => "normalize",
			Self::Rank => "rank",
			Self::Partition => "partition",
			Self::SynthesizeHandover => "synthesizeHandover",
			Self::Aggregate => "aggregate",
			Self::Emit => "emit",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCapacity {
	pub name: TierName,
	pub capacity: Option<usize>,
}
impl From<TierSpec> for TierCapacity {
	fn from(spec: TierSpec) -> Self {
		Self { name: spec.name, capacity: spec.capacity }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredRecord {
	pub index: usize,
	pub record_id: String,
	pub defect: RecordDefect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugTrace {
	pub trace_id: Uuid,
	pub source_type: SourceType,
	pub query: String,
	pub stages: Vec<Stage>,
	pub tier_capacities: Vec<TierCapacity>,
	pub confidence_bands: ConfidenceBandReport,
	pub recovered: Vec<RecoveredRecord>,
	pub tracking: Option<Map<String, Value>>,
}

/// Content-derived id, so re-running the same input yields the same trace id.
pub fn trace_id_for(input: &Value) -> Uuid {
	let raw = serde_json::to_vec(input).unwrap_or_default();
	let digest = blake3::hash(&raw);

	Uuid::new_v5(&TRACE_NAMESPACE, digest.as_bytes())
}

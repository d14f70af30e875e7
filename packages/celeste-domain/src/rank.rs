use serde::Serialize;

use crate::record::CanonicalRecord;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecord {
	/// 1-based position after ranking.
	pub rank: u32,
	/// 0-based position in the backend's hit list.
	pub input_index: u32,
	#[serde(flatten)]
	pub record: CanonicalRecord,
}

/// Orders records by confidence, highest first. Equal confidences keep their input order.
pub fn rank(records: &[CanonicalRecord]) -> Vec<RankedRecord> {
	let mut order: Vec<usize> = (0..records.len()).collect();

	order.sort_by(|&a, &b| {
		records[b].confidence.total_cmp(&records[a].confidence).then_with(|| a.cmp(&b))
	});

	order
		.into_iter()
		.enumerate()
		.map(|(position, index)| RankedRecord {
			rank: position as u32 + 1,
			input_index: index as u32,
			record: records[index].clone(),
		})
		.collect()
}

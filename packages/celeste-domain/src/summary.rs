use serde::Serialize;

use crate::{hit::SourceType, record::CanonicalRecord, tier::Tiers};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyMessages {
	pub no_documents: String,
	pub no_emails: String,
}
impl EmptyMessages {
	pub fn from_config(cfg: &celeste_config::Messages) -> Self {
		Self { no_documents: cfg.no_documents.clone(), no_emails: cfg.no_emails.clone() }
	}

	pub fn for_source(&self, source_type: SourceType) -> &str {
		match source_type {
			SourceType::Document => &self.no_documents,
			SourceType::Email => &self.no_emails,
		}
	}
}
impl Default for EmptyMessages {
	fn default() -> Self {
		Self::from_config(&celeste_config::Messages::default())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
	pub found_count: usize,
	pub showing_count: usize,
	pub hidden_count: usize,
	pub avg_confidence: f32,
	pub message: Option<String>,
}

pub fn aggregate(
	found_count: usize,
	tiers: &Tiers,
	records: &[CanonicalRecord],
	source_type: SourceType,
	messages: &EmptyMessages,
) -> Summary {
	let showing_count = tiers.showing_count();

	Summary {
		found_count,
		showing_count,
		hidden_count: found_count.saturating_sub(showing_count),
		avg_confidence: average_confidence(records),
		message: (found_count == 0).then(|| messages.for_source(source_type).to_string()),
	}
}

/// Mean over every record, shown or hidden.
pub fn average_confidence(records: &[CanonicalRecord]) -> f32 {
	if records.is_empty() {
		return 0.0;
	}

	let total: f64 = records.iter().map(|record| f64::from(record.confidence)).sum();

	((total / records.len() as f64) as f32).clamp(0.0, 1.0)
}

/// Informational thresholds. They label records for display and never gate tier membership.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceBands {
	pub high: f32,
	pub medium: f32,
}
impl ConfidenceBands {
	pub fn from_config(cfg: &celeste_config::Confidence) -> Self {
		Self { high: cfg.high, medium: cfg.medium }
	}
}
impl Default for ConfidenceBands {
	fn default() -> Self {
		Self::from_config(&celeste_config::Confidence::default())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceBandReport {
	pub high: f32,
	pub medium: f32,
	pub high_count: usize,
	pub medium_count: usize,
	pub low_count: usize,
}

pub fn band_report(records: &[CanonicalRecord], bands: &ConfidenceBands) -> ConfidenceBandReport {
	let mut report = ConfidenceBandReport {
		high: bands.high,
		medium: bands.medium,
		high_count: 0,
		medium_count: 0,
		low_count: 0,
	};

	for record in records {
		if record.confidence >= bands.high {
			report.high_count += 1;
		} else if record.confidence >= bands.medium {
			report.medium_count += 1;
		} else {
			report.low_count += 1;
		}
	}

	report
}

//! The categorization pipeline: Validate → Normalize → Rank → Partition → SynthesizeHandover →
//! Aggregate → Emit, in a single pass.
//!
//! A [`Pipeline`] holds only immutable settings and an observer handle, so one instance can
//! serve any number of concurrent calls.

use std::sync::Arc;

use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use celeste_config::Config;
use celeste_domain::{
	CanonicalRecord, ConfidenceBands, EmptyMessages, NormalizeOptions, RawHit, TierConfig,
	handover, normalize, rank, summary, tier,
};

use crate::{
	Result,
	observer::{PipelineObserver, TracingObserver},
	request::{self, ValidatedRequest},
	response::{PipelineFailure, PipelineOutput, PipelineResponse},
	trace::{self, DebugTrace, RecoveredRecord, Stage},
};

#[derive(Clone)]
pub struct Pipeline {
	tiers: TierConfig,
	normalize: NormalizeOptions,
	bands: ConfidenceBands,
	messages: EmptyMessages,
	observer: Arc<dyn PipelineObserver>,
}
impl Pipeline {
	pub fn new(cfg: &Config) -> Self {
		Self {
			tiers: TierConfig::from_config(&cfg.tiers),
			normalize: NormalizeOptions::from_config(&cfg.normalize),
			bands: ConfidenceBands::from_config(&cfg.confidence),
			messages: EmptyMessages::from_config(&cfg.messages),
			observer: Arc::new(TracingObserver),
		}
	}

	pub fn with_observer(self, observer: Arc<dyn PipelineObserver>) -> Self {
		Self { observer, ..self }
	}

	pub fn tier_config(&self) -> &TierConfig {
		&self.tiers
	}

	pub fn run(&self, input: &Value) -> PipelineResponse {
		self.run_at(input, OffsetDateTime::now_utc())
	}

	/// Runs with a caller-supplied clock for `generatedAt` and failure timestamps.
	pub fn run_at(&self, input: &Value, now: OffsetDateTime) -> PipelineResponse {
		match self.try_run_at(input, now) {
			Ok(output) => PipelineResponse::Success(Box::new(output)),
			Err(err) => PipelineResponse::Failure(PipelineFailure::from_error(&err, now)),
		}
	}

	/// Same as [`Pipeline::run_at`] but surfaces a rejected payload as an error.
	pub fn try_run_at(&self, input: &Value, now: OffsetDateTime) -> Result<PipelineOutput> {
		let trace_id = trace::trace_id_for(input);

		self.observer.on_stage(trace_id, Stage::Validate);

		match request::validate(input) {
			Ok(request) => Ok(self.categorize(trace_id, request, now)),
			Err(err) => {
				self.observer.on_rejected(trace_id, &err);

				Err(err)
			},
		}
	}

	fn categorize(
		&self,
		trace_id: Uuid,
		request: ValidatedRequest<'_>,
		now: OffsetDateTime,
	) -> PipelineOutput {
		let mut stages = vec![Stage::Validate];
		let mut enter = |stage: Stage| {
			self.observer.on_stage(trace_id, stage);
			stages.push(stage);
		};

		enter(Stage::Normalize);

		let hits: Vec<RawHit> = request
			.raw_hits
			.iter()
			.map(|value| RawHit::from_json(value, request.source_type))
			.collect();
		let normalized = normalize::normalize_all(&hits, &self.normalize);
		let mut recovered = Vec::new();

		for (index, item) in normalized.iter().enumerate() {
			for defect in &item.defects {
				self.observer.on_recovered(trace_id, index, &item.record.id, defect);
				recovered.push(RecoveredRecord {
					index,
					record_id: item.record.id.clone(),
					defect: defect.clone(),
				});
			}
		}

		let records: Vec<CanonicalRecord> =
			normalized.into_iter().map(|normalized| normalized.record).collect();

		enter(Stage::Rank);

		let ranked = rank::rank(&records);

		enter(Stage::Partition);

		let tiers = tier::partition(&ranked, &self.tiers);

		enter(Stage::SynthesizeHandover);

		let handover = handover::synthesize(
			request.existing_template.as_ref(),
			&ranked,
			request.query,
			now,
		);

		enter(Stage::Aggregate);

		let summary = summary::aggregate(
			request.raw_hits.len(),
			&tiers,
			&records,
			request.source_type,
			&self.messages,
		);
		let confidence_bands = summary::band_report(&records, &self.bands);

		enter(Stage::Emit);

		self.observer.on_completed(trace_id, &summary);

		PipelineOutput {
			success: true,
			tiers,
			summary,
			handover_template: handover.template,
			handover_metadata: handover.metadata,
			debug_trace: DebugTrace {
				trace_id,
				source_type: request.source_type,
				query: request.query.to_string(),
				stages,
				tier_capacities: self.tiers.specs().into_iter().map(Into::into).collect(),
				confidence_bands,
				recovered,
				tracking: request.tracking.cloned(),
			},
		}
	}
}
impl Default for Pipeline {
	fn default() -> Self {
		Self::new(&Config::default())
	}
}

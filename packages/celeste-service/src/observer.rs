use uuid::Uuid;

use celeste_domain::{RecordDefect, Summary};

use crate::{Error, trace::Stage};

/// Receives pipeline telemetry. Every hook defaults to doing nothing.
pub trait PipelineObserver
where
	Self: Send + Sync,
{
	fn on_stage(&self, _trace_id: Uuid, _stage: Stage) {}

	fn on_recovered(
		&self,
		_trace_id: Uuid,
		_index: usize,
		_record_id: &str,
		_defect: &RecordDefect,
	) {
	}

	fn on_rejected(&self, _trace_id: Uuid, _err: &Error) {}

	fn on_completed(&self, _trace_id: Uuid, _summary: &Summary) {}
}

pub struct NoopObserver;
impl PipelineObserver for NoopObserver {}

/// Emits each hook as a `tracing` event.
pub struct TracingObserver;
impl PipelineObserver for TracingObserver {
	fn on_stage(&self, trace_id: Uuid, stage: Stage) {
		tracing::debug!(trace_id = %trace_id, stage = stage.as_str(), "Pipeline stage started.");
	}

	fn on_recovered(&self, trace_id: Uuid, index: usize, record_id: &str, defect: &RecordDefect) {
		tracing::warn!(
			trace_id = %trace_id,
			index,
			record_id,
			defect = ?defect,
			"Recovered malformed raw hit."
		);
	}

	fn on_rejected(&self, trace_id: Uuid, err: &Error) {
		tracing::warn!(trace_id = %trace_id, error = %err, "Rejected search payload.");
	}

	fn on_completed(&self, trace_id: Uuid, summary: &Summary) {
		tracing::info!(
			trace_id = %trace_id,
			found = summary.found_count,
			showing = summary.showing_count,
			hidden = summary.hidden_count,
			avg_confidence = summary.avg_confidence,
			"Categorized search hits."
		);
	}
}

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use uuid::Uuid;

use celeste_domain::{RecordDefect, Summary};
use celeste_service::{
	Error, NoopObserver, Pipeline, PipelineObserver, PipelineResponse, Stage,
};
use celeste_testkit::{
	FIXED_CLOCK, decreasing_document_hits, document_hit, email_hit, ids, request,
	request_with_template, tied_document_hits, tier_ids,
};

#[derive(Default)]
struct RecordingObserver {
	events: Mutex<Vec<String>>,
}
impl RecordingObserver {
	fn events(&self) -> Vec<String> {
		self.events.lock().expect("Observer lock must not be poisoned.").clone()
	}

	fn push(&self, event: String) {
		self.events.lock().expect("Observer lock must not be poisoned.").push(event);
	}
}
impl PipelineObserver for RecordingObserver {
	fn on_stage(&self, _trace_id: Uuid, stage: Stage) {
		self.push(format!("stage:{}", stage.as_str()));
	}

	fn on_recovered(
		&self,
		_trace_id: Uuid,
		index: usize,
		_record_id: &str,
		defect: &RecordDefect,
	) {
		self.push(format!("recovered:{index}:{defect:?}"));
	}

	fn on_rejected(&self, _trace_id: Uuid, err: &Error) {
		self.push(format!("rejected:{err}"));
	}

	fn on_completed(&self, _trace_id: Uuid, summary: &Summary) {
		self.push(format!("completed:{}", summary.found_count));
	}
}

fn pipeline() -> Pipeline {
	Pipeline::default().with_observer(Arc::new(NoopObserver))
}

fn run_json(input: &Value) -> Value {
	pipeline().run_at(input, FIXED_CLOCK).to_json().expect("Response must serialize.")
}

#[test]
fn twelve_decreasing_hits_fill_three_tiers() {
	let output = run_json(&request("document", "pump", decreasing_document_hits(12)));

	assert_eq!(output["success"], json!(true));
	assert_eq!(tier_ids(&output["tiers"]["primary"]), ids(0..5));
	assert_eq!(tier_ids(&output["tiers"]["other"]), ids(5..10));
	assert_eq!(tier_ids(&output["tiers"]["all"]), ids(10..12));
	assert_eq!(output["tiers"]["hidden"]["count"], json!(0));
	assert_eq!(output["tiers"]["hidden"]["records"], json!([]));
	assert_eq!(output["summary"]["showingCount"], json!(12));
	assert_eq!(output["summary"]["message"], Value::Null);
}

#[test]
fn twenty_tied_hits_keep_input_order() {
	let output = run_json(&request("document", "pump", tied_document_hits(20, 0.5)));

	assert_eq!(tier_ids(&output["tiers"]["primary"]), ids(0..5));
	assert_eq!(tier_ids(&output["tiers"]["other"]), ids(5..10));
	assert_eq!(tier_ids(&output["tiers"]["all"]), ids(10..15));
	assert_eq!(tier_ids(&output["tiers"]["hidden"]["records"]), ids(15..20));
	assert_eq!(output["tiers"]["hidden"]["count"], json!(5));
	assert_eq!(output["summary"]["foundCount"], json!(20));
	assert_eq!(output["summary"]["hiddenCount"], json!(5));
	assert_eq!(output["summary"]["avgConfidence"], json!(0.5));
}

#[test]
fn zero_hits_is_a_valid_empty_result() {
	let output = run_json(&request("document", "pump", Vec::new()));

	assert_eq!(output["success"], json!(true));
	assert_eq!(output["tiers"]["primary"], json!([]));
	assert_eq!(output["tiers"]["other"], json!([]));
	assert_eq!(output["tiers"]["all"], json!([]));
	assert_eq!(output["tiers"]["hidden"], json!({ "count": 0, "records": [] }));
	assert_eq!(output["summary"]["foundCount"], json!(0));
	assert_eq!(output["summary"]["showingCount"], json!(0));
	assert_eq!(output["summary"]["hiddenCount"], json!(0));
	assert_eq!(output["summary"]["message"], json!("No documents found"));
}

#[test]
fn handover_keeps_user_fields_and_fills_symptoms() {
	let input = request_with_template(
		"document",
		"bilge pump fault",
		Vec::new(),
		json!({ "system": "Engine", "symptoms": "" }),
	);
	let output = run_json(&input);

	assert_eq!(output["handoverTemplate"]["system"], json!("Engine"));
	assert_eq!(output["handoverTemplate"]["symptoms"], json!("bilge pump fault"));
	assert_eq!(output["handoverMetadata"]["autoFilledFieldNames"], json!(["symptoms"]));
	assert_eq!(output["handoverMetadata"]["autoFilledCount"], json!(1));
	assert_eq!(output["handoverMetadata"]["fieldProvenance"]["system"], json!("userSupplied"));
}

#[test]
fn tier_sizes_always_sum_to_input_count() {
	for count in 0..=40 {
		let output = run_json(&request("document", "pump", decreasing_document_hits(count)));
		let tiers = &output["tiers"];
		let total = tier_ids(&tiers["primary"]).len()
			+ tier_ids(&tiers["other"]).len()
			+ tier_ids(&tiers["all"]).len()
			+ tier_ids(&tiers["hidden"]["records"]).len();

		assert_eq!(total, count);
		assert_eq!(output["summary"]["showingCount"], json!(count.min(15)));
		assert_eq!(output["summary"]["hiddenCount"], json!(count.saturating_sub(15)));
	}
}

#[test]
fn identical_input_yields_identical_bytes() {
	let input = request_with_template(
		"email",
		"ballast valve",
		vec![
			email_hit("m1", "Ballast valve stuck", 0.4),
			json!({ "subject": "No id here", "confidenceScore": "n/a" }),
			email_hit("m2", "Valve parts on order", 0.4),
		],
		json!({ "faultCode": "B-3" }),
	);
	let pipeline = pipeline();
	let first = serde_json::to_vec(&pipeline.run_at(&input, FIXED_CLOCK))
		.expect("Response must serialize.");
	let second = serde_json::to_vec(&pipeline.run_at(&input, FIXED_CLOCK))
		.expect("Response must serialize.");

	assert_eq!(first, second);
}

#[test]
fn both_sources_share_one_output_shape() {
	let documents = run_json(&request("document", "pump", vec![document_hit("d0", 0.9)]));
	let emails = run_json(&request("email", "pump", vec![email_hit("m0", "Pump", 0.9)]));
	let keys = |value: &Value| -> Vec<String> {
		value.as_object().map(|map| map.keys().cloned().collect()).unwrap_or_default()
	};

	assert_eq!(keys(&documents), keys(&emails));
	assert_eq!(keys(&documents["summary"]), keys(&emails["summary"]));
	assert_eq!(
		keys(&documents["tiers"]["primary"][0]),
		keys(&emails["tiers"]["primary"][0])
	);
	assert_eq!(emails["tiers"]["primary"][0]["sourceType"], json!("email"));
}

#[test]
fn malformed_hits_are_recovered_not_dropped() {
	let observer = Arc::new(RecordingObserver::default());
	let pipeline = Pipeline::default().with_observer(observer.clone());
	let input = request(
		"document",
		"pump",
		vec![json!("stray"), json!({ "confidenceScore": "high" }), document_hit("d2", 0.3)],
	);
	let output = pipeline
		.run_at(&input, FIXED_CLOCK)
		.to_json()
		.expect("Response must serialize.");
	let primary =
		output["tiers"]["primary"].as_array().expect("Primary tier must be an array.");

	assert_eq!(primary.len(), 3);
	assert!(primary.iter().all(|record| record["id"].as_str().is_some_and(|id| !id.is_empty())));
	assert_eq!(output["summary"]["foundCount"], json!(3));

	let recovered = output["debugTrace"]["recovered"]
		.as_array()
		.expect("Recovered list must be an array.");

	assert!(recovered.iter().any(|entry| entry["defect"]["kind"] == json!("notAnObject")));
	assert!(
		recovered.iter().any(|entry| entry["defect"]["kind"] == json!("nonNumericConfidence"))
	);
	assert!(observer.events().iter().any(|event| event.starts_with("recovered:1:")));
}

#[test]
fn observer_sees_every_stage_in_order() {
	let observer = Arc::new(RecordingObserver::default());
	let pipeline = Pipeline::default().with_observer(observer.clone());
	let output = pipeline.run_at(&request("document", "pump", Vec::new()), FIXED_CLOCK);
	let trace_stages = output
		.output()
		.map(|output| output.debug_trace.stages.clone())
		.expect("Run must succeed.");

	assert_eq!(
		observer.events(),
		vec![
			"stage:validate",
			"stage:normalize",
			"stage:rank",
			"stage:partition",
			"stage:synthesizeHandover",
			"stage:aggregate",
			"stage:emit",
			"completed:0",
		]
	);
	assert_eq!(trace_stages.len(), 7);
}

#[test]
fn missing_raw_hits_is_a_typed_failure() {
	let observer = Arc::new(RecordingObserver::default());
	let pipeline = Pipeline::default().with_observer(observer.clone());
	let input =
		json!({ "success": true, "payload": { "sourceType": "document", "query": "pump" } });
	let response = pipeline.run_at(&input, FIXED_CLOCK);
	let output = response.to_json().expect("Response must serialize.");

	assert!(matches!(response, PipelineResponse::Failure(_)));
	assert_eq!(output["success"], json!(false));
	assert_eq!(output["error"]["kind"], json!("InputShapeError"));
	assert_eq!(output["error"]["message"], json!("payload.rawHits must be an array."));
	assert_eq!(output["error"]["timestamp"], json!("2025-03-14T06:00:00Z"));
	assert!(output.get("tiers").is_none());
	assert!(observer.events().iter().any(|event| event.starts_with("rejected:")));
}

#[test]
fn upstream_failure_is_rejected() {
	let input = json!({
		"success": false,
		"payload": { "rawHits": [], "sourceType": "email", "query": "" }
	});
	let output = run_json(&input);

	assert_eq!(output["success"], json!(false));
	assert_eq!(output["error"]["kind"], json!("InputShapeError"));
}

#[test]
fn try_run_surfaces_input_shape_error() {
	let observer = Arc::new(RecordingObserver::default());
	let pipeline = Pipeline::default().with_observer(observer.clone());
	let err = pipeline
		.try_run_at(&json!([1, 2, 3]), FIXED_CLOCK)
		.expect_err("Expected input shape error.");

	assert!(matches!(err, Error::InputShape { .. }));
	assert_eq!(observer.events().first().map(String::as_str), Some("stage:validate"));
	assert!(observer.events().iter().any(|event| event.starts_with("rejected:")));
}

#[test]
fn both_entry_points_report_the_same_events() {
	let input = request("document", "pump", vec![json!({ "confidenceScore": "high" })]);
	let observed = |try_run: bool| {
		let observer = Arc::new(RecordingObserver::default());
		let pipeline = Pipeline::default().with_observer(observer.clone());

		if try_run {
			pipeline.try_run_at(&input, FIXED_CLOCK).expect("Run must succeed.");
		} else {
			assert!(pipeline.run_at(&input, FIXED_CLOCK).is_success());
		}

		observer.events()
	};

	assert_eq!(observed(true), observed(false));
}

#[test]
fn tracking_is_echoed_and_trace_id_is_stable() {
	let mut input = request("document", "pump", vec![document_hit("d0", 0.9)]);

	input["payload"]["tracking"] = json!({ "sessionId": "s-1" });

	let first = run_json(&input);
	let second = run_json(&input);

	assert_eq!(first["debugTrace"]["tracking"], json!({ "sessionId": "s-1" }));
	assert_eq!(first["debugTrace"]["traceId"], second["debugTrace"]["traceId"]);
	assert_eq!(
		first["debugTrace"]["tierCapacities"][3],
		json!({ "name": "Hidden", "capacity": null })
	);
}

#[test]
fn configured_capacities_drive_partitioning() {
	let mut cfg = celeste_config::Config::default();

	cfg.tiers.primary = 1;
	cfg.tiers.other = 1;
	cfg.tiers.all = 1;

	let pipeline = Pipeline::new(&cfg).with_observer(Arc::new(NoopObserver));
	let output = pipeline
		.run_at(&request("document", "pump", decreasing_document_hits(5)), FIXED_CLOCK)
		.to_json()
		.expect("Response must serialize.");

	assert_eq!(tier_ids(&output["tiers"]["primary"]), ids(0..1));
	assert_eq!(tier_ids(&output["tiers"]["hidden"]["records"]), ids(3..5));
	assert_eq!(pipeline.tier_config().finite_capacity(), 3);
}

use celeste_service::{Error, telemetry};

#[test]
fn tracing_installs_once_per_process() {
	let cfg = celeste_config::Config::default();

	telemetry::init_from_config(&cfg).expect("First subscriber install must succeed.");

	let err = telemetry::init_tracing("debug").expect_err("Second install must be rejected.");

	assert!(matches!(err, Error::Telemetry { .. }));
}

use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use celeste_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = r#"
[service]
log_level = "info"

[tiers]
primary = 5
other   = 5
all     = 5

[confidence]
high   = 0.8
medium = 0.5

[normalize]
snippet_max_chars = 280

[messages]
no_documents = "No documents found"
no_emails    = "No emails found"
"#;

fn sample_toml_with(section: &str, key: &str, replacement: Value) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");
	let table = root
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Sample config must include the requested section.");

	table.insert(key.to_string(), replacement);

	toml::to_string(&value).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("celeste_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> celeste_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = celeste_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation_message(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.tiers.primary, 5);
	assert_eq!(cfg.tiers.other, 5);
	assert_eq!(cfg.tiers.all, 5);
	assert_eq!(cfg.normalize.snippet_max_chars, 280);
	assert_eq!(cfg.messages.no_documents, "No documents found");
}

#[test]
fn empty_file_falls_back_to_defaults() {
	let cfg = load_payload(String::new()).expect("Empty config must load.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.tiers.primary, celeste_config::DEFAULT_TIER_CAPACITY);
	assert_eq!(cfg.confidence.high, celeste_config::DEFAULT_HIGH_CONFIDENCE);
	assert_eq!(cfg.confidence.medium, celeste_config::DEFAULT_MEDIUM_CONFIDENCE);
	assert_eq!(cfg.messages.no_emails, "No emails found");
}

#[test]
fn default_config_passes_validation() {
	celeste_config::validate(&Config::default()).expect("Default config must be valid.");
}

#[test]
fn messages_are_trimmed_on_load() {
	let payload = sample_toml_with(
		"messages",
		"no_documents",
		Value::String("  Nothing matched  ".to_string()),
	);
	let cfg = load_payload(payload).expect("Config must load.");

	assert_eq!(cfg.messages.no_documents, "Nothing matched");
}

#[test]
fn tier_capacity_must_be_positive() {
	expect_validation_message(
		sample_toml_with("tiers", "other", Value::Integer(0)),
		"tiers.other must be greater than zero.",
	);
}

#[test]
fn medium_must_not_exceed_high() {
	expect_validation_message(
		sample_toml_with("confidence", "medium", Value::Float(0.9)),
		"confidence.medium must not exceed confidence.high.",
	);
}

#[test]
fn confidence_must_be_in_unit_range() {
	expect_validation_message(
		sample_toml_with("confidence", "high", Value::Float(1.5)),
		"confidence.high must be in the range 0.0-1.0.",
	);
}

#[test]
fn snippet_max_chars_must_be_positive() {
	expect_validation_message(
		sample_toml_with("normalize", "snippet_max_chars", Value::Integer(0)),
		"normalize.snippet_max_chars must be greater than zero.",
	);
}

#[test]
fn blank_message_is_rejected() {
	expect_validation_message(
		sample_toml_with("messages", "no_emails", Value::String("   ".to_string())),
		"messages.no_emails must be non-empty.",
	);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("celeste_config_test_missing_file.toml");

	let err = celeste_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_file_reports_parse_error() {
	let err = load_payload("[tiers\nprimary = ".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

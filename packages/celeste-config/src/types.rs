use serde::Deserialize;

pub const DEFAULT_TIER_CAPACITY: u32 = 5;
pub const DEFAULT_HIGH_CONFIDENCE: f32 = 0.8;
pub const DEFAULT_MEDIUM_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_SNIPPET_MAX_CHARS: u32 = 280;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	#[serde(default)]
	pub tiers: Tiers,
	#[serde(default)]
	pub confidence: Confidence,
	#[serde(default)]
	pub normalize: Normalize,
	#[serde(default)]
	pub messages: Messages,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: default_log_level() }
	}
}

/// Capacities of the finite disclosure tiers. The hidden tier is always unbounded.
#[derive(Clone, Debug, Deserialize)]
pub struct Tiers {
	#[serde(default = "default_tier_capacity")]
	pub primary: u32,
	#[serde(default = "default_tier_capacity")]
	pub other: u32,
	#[serde(default = "default_tier_capacity")]
	pub all: u32,
}
impl Default for Tiers {
	fn default() -> Self {
		Self {
			primary: DEFAULT_TIER_CAPACITY,
			other: DEFAULT_TIER_CAPACITY,
			all: DEFAULT_TIER_CAPACITY,
		}
	}
}

/// Informational confidence bands. They are reported alongside the output and never gate tier
/// membership.
#[derive(Clone, Debug, Deserialize)]
pub struct Confidence {
	#[serde(default = "default_high_confidence")]
	pub high: f32,
	#[serde(default = "default_medium_confidence")]
	pub medium: f32,
}
impl Default for Confidence {
	fn default() -> Self {
		Self { high: DEFAULT_HIGH_CONFIDENCE, medium: DEFAULT_MEDIUM_CONFIDENCE }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Normalize {
	/// Snippets longer than this many grapheme clusters are truncated.
	#[serde(default = "default_snippet_max_chars")]
	pub snippet_max_chars: u32,
}
impl Default for Normalize {
	fn default() -> Self {
		Self { snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS }
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Messages {
	#[serde(default = "default_no_documents")]
	pub no_documents: String,
	#[serde(default = "default_no_emails")]
	pub no_emails: String,
}
impl Default for Messages {
	fn default() -> Self {
		Self { no_documents: default_no_documents(), no_emails: default_no_emails() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_tier_capacity() -> u32 {
	DEFAULT_TIER_CAPACITY
}

fn default_high_confidence() -> f32 {
	DEFAULT_HIGH_CONFIDENCE
}

fn default_medium_confidence() -> f32 {
	DEFAULT_MEDIUM_CONFIDENCE
}

fn default_snippet_max_chars() -> u32 {
	DEFAULT_SNIPPET_MAX_CHARS
}

fn default_no_documents() -> String {
	"No documents found".to_string()
}

fn default_no_emails() -> String {
	"No emails found".to_string()
}

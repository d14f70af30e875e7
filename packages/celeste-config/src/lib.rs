mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Confidence, Config, DEFAULT_HIGH_CONFIDENCE, DEFAULT_MEDIUM_CONFIDENCE,
	DEFAULT_SNIPPET_MAX_CHARS, DEFAULT_TIER_CAPACITY, Messages, Normalize, Service, Tiers,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.tiers.primary == 0 {
		return Err(Error::Validation {
			message: "tiers.primary must be greater than zero.".to_string(),
		});
	}
	if cfg.tiers.other == 0 {
		return Err(Error::Validation {
			message: "tiers.other must be greater than zero.".to_string(),
		});
	}
	if cfg.tiers.all == 0 {
		return Err(Error::Validation {
			message: "tiers.all must be greater than zero.".to_string(),
		});
	}
	if !cfg.confidence.high.is_finite() {
		return Err(Error::Validation {
			message: "confidence.high must be a finite number.".to_string(),
		});
	}
	if !cfg.confidence.medium.is_finite() {
		return Err(Error::Validation {
			message: "confidence.medium must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.confidence.high) {
		return Err(Error::Validation {
			message: "confidence.high must be in the range 0.0-1.0.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.confidence.medium) {
		return Err(Error::Validation {
			message: "confidence.medium must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.confidence.medium > cfg.confidence.high {
		return Err(Error::Validation {
			message: "confidence.medium must not exceed confidence.high.".to_string(),
		});
	}
	if cfg.normalize.snippet_max_chars == 0 {
		return Err(Error::Validation {
			message: "normalize.snippet_max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.messages.no_documents.trim().is_empty() {
		return Err(Error::Validation {
			message: "messages.no_documents must be non-empty.".to_string(),
		});
	}
	if cfg.messages.no_emails.trim().is_empty() {
		return Err(Error::Validation {
			message: "messages.no_emails must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.messages.no_documents = cfg.messages.no_documents.trim().to_string();
	cfg.messages.no_emails = cfg.messages.no_emails.trim().to_string();
}

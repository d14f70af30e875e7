use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Installs the global `fmt` subscriber for host processes. Fails when one is already set.
pub fn init_tracing(log_level: &str) -> Result<()> {
	let filter = EnvFilter::try_new(log_level)
		.map_err(|err| Error::Telemetry { message: format!("Invalid log filter: {err}") })?;

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.try_init()
		.map_err(|err| Error::Telemetry { message: err.to_string() })
}

pub fn init_from_config(cfg: &celeste_config::Config) -> Result<()> {
	init_tracing(&cfg.service.log_level)
}

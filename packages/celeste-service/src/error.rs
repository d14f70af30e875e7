use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid input shape: {message}")]
	InputShape { message: String },
	#[error("Telemetry error: {message}")]
	Telemetry { message: String },
}
impl Error {
	pub fn input_shape(message: impl Into<String>) -> Self {
		Self::InputShape { message: message.into() }
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InputShape { .. } => ErrorKind::InputShapeError,
			Self::Telemetry { .. } => ErrorKind::TelemetryError,
		}
	}

	/// The message without the kind prefix.
	pub fn detail(&self) -> &str {
		match self {
			Self::InputShape { message } | Self::Telemetry { message } => message,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
	InputShapeError,
	TelemetryError,
}

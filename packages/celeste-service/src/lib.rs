pub mod error;
pub mod observer;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod telemetry;
pub mod trace;

pub use error::{Error, ErrorKind, Result};
pub use observer::{NoopObserver, PipelineObserver, TracingObserver};
pub use pipeline::Pipeline;
pub use request::ValidatedRequest;
pub use response::{FailureBody, PipelineFailure, PipelineOutput, PipelineResponse};
pub use trace::{DebugTrace, RecoveredRecord, Stage, TierCapacity};

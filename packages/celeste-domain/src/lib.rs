pub mod handover;
pub mod hit;
pub mod normalize;
pub mod rank;
pub mod record;
pub mod summary;
pub mod text;
pub mod tier;
pub mod time_serde;

pub use handover::{
	Handover, HandoverField, HandoverMetadata, HandoverTemplate, Provenance, TemplateError,
};
pub use hit::{DocumentHit, EmailHit, HitShape, RawConfidence, RawHit, SourceType};
pub use normalize::{NormalizeOptions, Normalized, RecordDefect};
pub use rank::RankedRecord;
pub use record::CanonicalRecord;
pub use summary::{ConfidenceBandReport, ConfidenceBands, EmptyMessages, Summary};
pub use tier::{HiddenTier, TierConfig, TierName, TierSpec, Tiers};

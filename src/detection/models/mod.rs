//! Detection data models

pub mod pii_type;
pub mod span;

pub use pii_type::{ConfidenceLevel, PiiType, RiskLevel};
pub use span::{DetectionSpan, Metadata, PiiDetectionResult, SpanSource};

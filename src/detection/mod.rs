//! PII detection
//!
//! Text flows one way through this module:
//!
//! 1. [`patterns`] holds the ordered pattern registry (type, matcher,
//!    false-positive filters, risk level).
//! 2. [`extractor`] scans the text with every pattern and consults the
//!    per-type [`validators`] to assign confidence.
//! 3. [`nlp`] locates person and place mentions returned by an entity
//!    extractor.
//! 4. [`confidence`] averages the span weights and filters by threshold.
//! 5. [`pipeline`] ties the steps together and adds suggestions.
//!
//! # Examples
//!
//! ```
//! use piiscope::detection::{DetectionOptions, DetectionPipeline, PiiType};
//!
//! let pipeline = DetectionPipeline::new()?;
//! let options = DetectionOptions::default().with_nlp(false);
//!
//! let counts = pipeline.count_pii_by_type("Emails: a@b.com, c@d.com", &options)?;
//! assert_eq!(counts[&PiiType::Email], 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod confidence;
pub mod extractor;
pub mod models;
pub mod nlp;
pub mod options;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod validators;

pub use extractor::{Extraction, SpanExtractor};
pub use models::{
    ConfidenceLevel, DetectionSpan, Metadata, PiiDetectionResult, PiiType, RiskLevel, SpanSource,
};
pub use nlp::{EntityExtractor, HeuristicEntityExtractor, NlpAdapter};
pub use options::DetectionOptions;
pub use patterns::{PatternRegistry, PiiPattern};
pub use pipeline::DetectionPipeline;
pub use report::ScanReport;
pub use validators::{StructuralValidator, ValidationOutcome, ValidatorTable};

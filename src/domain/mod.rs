//! Domain error and result types for PiiScope.
//!
//! All fallible operations return [`Result<T, PiiScopeError>`]:
//!
//! ```rust
//! use piiscope::domain::{PiiScopeError, Result};
//! use piiscope::detection::DetectionOptions;
//!
//! fn example() -> Result<()> {
//!     let result = piiscope::detect_pii("call 555-123-4567", &DetectionOptions::default())?;
//!     assert!(result.has_pii);
//!     Ok(())
//! }
//! ```
//!
//! Configuration errors are fatal and name the offending field. Collaborator
//! failures ([`CollaboratorError`]) never leave the pipeline.

pub mod errors;
pub mod result;

pub use errors::{CollaboratorError, DetectionError, PiiScopeError, PolicyConfigurationError};
pub use result::Result;

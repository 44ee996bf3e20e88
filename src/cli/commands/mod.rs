//! CLI command implementations
//!
//! Every command returns its process exit code:
//! 0 success, 1 PII found with `--fail-on-pii`, 2 configuration error,
//! 5 fatal error.

pub mod count;
pub mod evaluate;
pub mod init;
pub mod scan;
pub mod validate;

use std::fs;
use std::io::Read;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PII_FOUND: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
pub const EXIT_FATAL: i32 = 5;

/// A text to scan with a display name
#[derive(Debug, Clone)]
pub struct ScanInput {
    pub source: String,
    pub text: String,
}

/// Read every named file, or stdin when none are given
pub(crate) fn read_inputs(files: &[String]) -> anyhow::Result<Vec<ScanInput>> {
    if files.is_empty() {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(vec![ScanInput {
            source: "<stdin>".to_string(),
            text,
        }]);
    }

    files
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {path}: {e}"))?;
            Ok(ScanInput {
                source: path.clone(),
                text,
            })
        })
        .collect()
}

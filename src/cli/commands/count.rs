//! Count command implementation
//!
//! Prints span counts per PII type for each input.

use super::{read_inputs, EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::load_config_or_default;
use crate::detection::{DetectionPipeline, PiiType};
use clap::Args;
use std::collections::BTreeMap;

/// Arguments for the count command
#[derive(Args, Debug, Default)]
pub struct CountArgs {
    /// Files to scan (reads stdin when omitted)
    pub files: Vec<String>,

    /// Only print types with at least one span
    #[arg(long)]
    pub non_zero: bool,
}

impl CountArgs {
    /// Execute the count command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let registry = match config.detection.build_registry() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ Failed to build pattern registry: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let pipeline = DetectionPipeline::with_registry(registry);
        let options = config.detection.to_options();

        let mut exit_code = EXIT_SUCCESS;
        for input in read_inputs(&self.files)? {
            match pipeline.count_pii_by_type(&input.text, &options) {
                Ok(counts) => {
                    let counts = self.select(counts);
                    println!(
                        "{}",
                        serde_json::json!({ "source": input.source, "counts": counts })
                    );
                }
                Err(e) => {
                    tracing::warn!(source = %input.source, error = %e, "Count failed");
                    eprintln!("❌ {}: {e}", input.source);
                    exit_code = EXIT_FATAL;
                }
            }
        }
        Ok(exit_code)
    }

    fn select(&self, counts: BTreeMap<PiiType, usize>) -> BTreeMap<PiiType, usize> {
        if !self.non_zero {
            return counts;
        }
        counts.into_iter().filter(|(_, n)| *n > 0).collect()
    }
}

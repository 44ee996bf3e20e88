//! Scan command implementation
//!
//! This module implements the `scan` command: detect PII in files (or
//! stdin) and print per-input results or a batch report.

use super::{read_inputs, ScanInput, EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_PII_FOUND, EXIT_SUCCESS};
use crate::config::{load_config_or_default, PiiScopeConfig};
use crate::detection::{DetectionOptions, DetectionPipeline, PiiDetectionResult, ScanReport};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the scan command
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Files to scan (reads stdin when omitted)
    pub files: Vec<String>,

    /// Print a batch summary instead of per-input results
    #[arg(long)]
    pub report: bool,

    /// Also write the JSON batch summary to this path
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Override the configured confidence threshold (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Disable name and address detection
    #[arg(long)]
    pub no_nlp: bool,

    /// Drop candidates that fail structural validation
    #[arg(long)]
    pub strict: bool,

    /// Record surrounding text in span metadata
    #[arg(long)]
    pub context: bool,

    /// Output format (json, pretty); defaults to the configured format
    #[arg(long)]
    pub format: Option<String>,

    /// Exit with code 1 when any input contains PII
    #[arg(long)]
    pub fail_on_pii: bool,
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    source: &'a str,
    result: &'a PiiDetectionResult,
}

impl ScanArgs {
    /// Execute the scan command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, files = self.files.len(), "Starting scan");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let options = self.options(&config);
        if let Err(e) = options.validate() {
            eprintln!("❌ {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let registry = match config.detection.build_registry() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ Failed to build pattern registry: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let pipeline = DetectionPipeline::with_registry(registry);

        let inputs = read_inputs(&self.files)?;
        let (results, failures) = scan_inputs(&pipeline, &inputs, &options);

        let format = self
            .format
            .as_deref()
            .unwrap_or(config.application.output_format.as_str());

        if self.report || self.report_file.is_some() {
            let mut report = ScanReport::new();
            for (source, result) in &results {
                report.add_result(source.as_str(), result);
            }
            if let Some(ref path) = self.report_file {
                report.write_to_file(path)?;
                eprintln!("📄 Report written to {}", path.display());
            }
            if self.report {
                match format {
                    "pretty" => print!("{}", report.format_console()),
                    _ => println!("{}", report.format_json()?),
                }
            }
        }

        if !self.report {
            for (source, result) in &results {
                match format {
                    "pretty" => print!("{}", format_pretty(source, result)),
                    _ => println!(
                        "{}",
                        serde_json::to_string(&ScanOutput {
                            source,
                            result
                        })?
                    ),
                }
            }
        }

        let with_pii = results.iter().filter(|(_, r)| r.has_pii).count();
        tracing::info!(
            scanned = results.len(),
            with_pii,
            failures,
            "Scan finished"
        );

        if failures > 0 {
            return Ok(EXIT_FATAL);
        }
        if self.fail_on_pii && with_pii > 0 {
            return Ok(EXIT_PII_FOUND);
        }
        Ok(EXIT_SUCCESS)
    }

    /// Configured options with command-line overrides applied
    pub fn options(&self, config: &PiiScopeConfig) -> DetectionOptions {
        let mut options = config.detection.to_options();
        if let Some(threshold) = self.threshold {
            options = options.with_confidence_threshold(threshold);
        }
        if self.no_nlp {
            options = options.with_nlp(false);
        }
        if self.strict {
            options = options.with_strict_mode(true);
        }
        if self.context {
            let window = options.context_window;
            options = options.with_context(window);
        }
        options
    }
}

/// Detect every input, skipping (and counting) the ones that fail
fn scan_inputs(
    pipeline: &DetectionPipeline,
    inputs: &[ScanInput],
    options: &DetectionOptions,
) -> (Vec<(String, PiiDetectionResult)>, usize) {
    let mut results = Vec::with_capacity(inputs.len());
    let mut failures = 0;

    for input in inputs {
        match pipeline.detect(&input.text, options) {
            Ok(result) => results.push((input.source.clone(), result)),
            Err(e) => {
                failures += 1;
                tracing::warn!(source = %input.source, error = %e, "Scan failed");
                eprintln!("❌ {}: {e}", input.source);
            }
        }
    }

    (results, failures)
}

fn format_pretty(source: &str, result: &PiiDetectionResult) -> String {
    let mut output = String::new();
    if !result.has_pii {
        output.push_str(&format!("✅ {source}: no PII detected\n"));
        return output;
    }

    output.push_str(&format!(
        "⚠️  {source}: {} span(s), confidence {}\n",
        result.total_spans(),
        result.confidence
    ));
    for span in &result.spans {
        output.push_str(&format!(
            "  {:<15} {:>6}..{:<6} {:<10} {}\n",
            span.pii_type.label(),
            span.start,
            span.end,
            span.confidence.to_string(),
            span.source().as_str()
        ));
    }
    for suggestion in &result.suggestions {
        output.push_str(&format!("  • {suggestion}\n"));
    }
    output
}

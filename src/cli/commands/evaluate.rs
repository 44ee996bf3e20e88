//! Evaluate command implementation
//!
//! Resolves a policy decision for one PII type and operation, using either
//! the configured policy or a named preset.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config_or_default;
use crate::detection::PiiType;
use crate::policy::{create_policy_engine, PolicyEngine, PolicyOperation};
use clap::Args;

/// Arguments for the evaluate command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// PII type (email, phone, ssn, credit_card, ip_address, name, address, date_of_birth, zip_code)
    #[arg(short = 't', long = "type")]
    pub pii_type: String,

    /// Operation (log, store, process, display, transfer, export)
    #[arg(short, long)]
    pub operation: String,

    /// Use a preset instead of the configured policy
    #[arg(short, long)]
    pub preset: Option<String>,
}

impl EvaluateArgs {
    /// Execute the evaluate command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let pii_type: PiiType = match self.pii_type.parse() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let operation: PolicyOperation = match self.operation.parse() {
            Ok(op) => op,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let engine = match self.engine(config_path) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let decision = engine.evaluate(pii_type, operation);
        println!("{}", serde_json::to_string_pretty(&decision)?);
        Ok(EXIT_SUCCESS)
    }

    fn engine(&self, config_path: &str) -> crate::domain::Result<PolicyEngine> {
        match self.preset {
            Some(ref preset) => create_policy_engine(preset),
            None => load_config_or_default(config_path)?.policy.build_engine(),
        }
    }
}

pub mod configuration;
pub mod domain;
pub mod probe;
pub mod rest_client;
pub mod telemetry;
pub mod utils;

use crate::configuration::{ConfigurationError, get_configuration};
use crate::probe::{ProbeSummary, run_probe};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Load the settings and run the probe, printing everything to `out`.
///
/// Missing credentials are reported on `out` and yield `Ok(None)`
/// without touching the network.
pub async fn run<W: Write>(
    env_file: &Path,
    process_env: &HashMap<String, String>,
    out: &mut W,
) -> Result<Option<ProbeSummary>, anyhow::Error> {
    let settings = match get_configuration(env_file, process_env, out) {
        Ok(settings) => settings,
        Err(e @ ConfigurationError::MissingKeys(_)) => {
            writeln!(out, "ERROR: {}", e)?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let summary = run_probe(&settings, out).await?;
    Ok(Some(summary))
}

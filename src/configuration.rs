use crate::utils::error_chain_fmt;
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SUPABASE_URL_KEY: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_KEY_KEY: &str = "SUPABASE_SERVICE_KEY";
pub const REQUIRED_KEYS: [&str; 2] = [SUPABASE_URL_KEY, SUPABASE_SERVICE_KEY_KEY];

/// Variable pointing the binary at a different env file.
pub const ENV_FILE_VAR: &str = "SUPABASE_PROBE_ENV_FILE";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Number of key characters echoed back in the report.
pub const KEY_PREFIX_LEN: usize = 20;

#[derive(thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing SUPABASE_URL or SUPABASE_SERVICE_KEY")]
    MissingKeys(Vec<&'static str>),
    #[error("Line {line_number} of {} is not a KEY=VALUE pair.", .path.display())]
    MalformedLine { path: PathBuf, line_number: usize },
    #[error("Failed to read {}.", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write the configuration notice.")]
    Output(#[source] std::io::Error),
    #[error(transparent)]
    Layering(#[from] config::ConfigError),
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub service_key: Secret<String>,
}

impl Settings {
    /// The first `KEY_PREFIX_LEN` characters of the service key.
    pub fn key_prefix(&self) -> String {
        self.service_key
            .expose_secret()
            .chars()
            .take(KEY_PREFIX_LEN)
            .collect()
    }

    pub fn key_length(&self) -> usize {
        self.service_key.expose_secret().chars().count()
    }
}

// Keys are lowercased by `config`.
#[derive(serde::Deserialize)]
struct LayeredSettings {
    supabase_url: Option<String>,
    supabase_service_key: Option<String>,
}

/// Parse a `KEY=VALUE` file, skipping blank lines and `#` comments.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_env_file(path: &Path) -> Result<Option<HashMap<String, String>>, ConfigurationError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigurationError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut vars = HashMap::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ConfigurationError::MalformedLine {
                path: path.to_path_buf(),
                line_number: index + 1,
            })?;
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(Some(vars))
}

/// Resolve the probe settings.
///
/// Values from `env_file` win; empty or absent ones fall back to
/// `process_env`. A missing env file is reported on `out` by path and
/// otherwise treated as having no overrides.
#[tracing::instrument(name = "Loading configuration", skip(process_env, out))]
pub fn get_configuration<W: Write>(
    env_file: &Path,
    process_env: &HashMap<String, String>,
    out: &mut W,
) -> Result<Settings, ConfigurationError> {
    let file_vars = match read_env_file(env_file)? {
        Some(vars) => vars,
        None => {
            tracing::info!("No env file at {}", env_file.display());
            writeln!(out, "No {} file found", env_file.display())
                .map_err(ConfigurationError::Output)?;
            HashMap::new()
        }
    };

    let environment: config::Map<String, String> = process_env
        .iter()
        .filter(|(key, _)| REQUIRED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut builder = config::Config::builder().add_source(
        config::Environment::default()
            .source(Some(environment))
            .ignore_empty(true),
    );
    for key in REQUIRED_KEYS {
        if let Some(value) = file_vars.get(key).filter(|value| !value.is_empty()) {
            builder = builder.set_override(key.to_lowercase(), value.as_str())?;
        }
    }
    let layered: LayeredSettings = builder.build()?.try_deserialize()?;

    match (layered.supabase_url, layered.supabase_service_key) {
        (Some(supabase_url), Some(service_key)) => Ok(Settings {
            supabase_url,
            service_key: Secret::new(service_key),
        }),
        (supabase_url, service_key) => {
            let mut missing = Vec::new();
            if supabase_url.is_none() {
                missing.push(SUPABASE_URL_KEY);
            }
            if service_key.is_none() {
                missing.push(SUPABASE_SERVICE_KEY_KEY);
            }
            tracing::warn!(?missing, "Required configuration keys are missing");
            Err(ConfigurationError::MissingKeys(missing))
        }
    }
}

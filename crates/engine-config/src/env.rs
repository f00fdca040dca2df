use crate::settings::error::SettingsError;
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

/// Environment variables from the process plus an optional `.env` file.
///
/// Process variables win over file entries so that a one-off
/// `CHAIN_SCAN_NODE_URL=... chain-scan balances` still overrides a checked-in
/// `.env`.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Builds a set from explicit pairs, mostly for tests.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads `path` if it exists. Keys already set are left untouched.
    pub fn load_file_if_present<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, SettingsError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Ok(false);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SettingsError::EnvFile(format!("failed to read {}: {e}", path.display()))
        })?;

        let parsed = parse_env_content(&content)?;
        debug!("Loaded {} entries from {}", parsed.len(), path.display());
        for (key, value) in parsed {
            self.vars.entry(key).or_insert(value);
        }

        Ok(true)
    }

    /// Returns the trimmed value, treating blank values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

fn parse_env_content(content: &str) -> Result<Vec<(String, String)>, SettingsError> {
    let mut entries = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err(SettingsError::EnvFile(format!(
                "malformed line {} (expected KEY=VALUE)",
                line_num + 1
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(SettingsError::EnvFile(format!(
                "empty key at line {}",
                line_num + 1
            )));
        }

        entries.push((key.to_string(), unquote_value(value)));
    }

    Ok(entries)
}

fn unquote_value(value: &str) -> String {
    let value = value.trim();

    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }

    value.to_string()
}

use crate::error::CliError;
use chrono::{DateTime, Local, SecondsFormat};
use model::records::{
    enriched::{EnrichedRecord, FailedLookup},
    row::Row,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp embedded in artifact names, e.g. `2020-06-01_09_05`.
pub fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d_%H_%M").to_string()
}

/// Files produced by the `balances` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceArtifacts {
    pub balances_json: PathBuf,
    pub balances_csv: PathBuf,
    pub errors_json: PathBuf,
}

/// Writes one set of timestamped artifacts into an output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
    stamp: String,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>, stamp: impl Into<String>) -> Self {
        ArtifactWriter {
            dir: dir.into(),
            stamp: stamp.into(),
        }
    }

    fn path(&self, prefix: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{prefix}_{}.{ext}", self.stamp))
    }

    pub async fn write_balances(
        &self,
        records: &[EnrichedRecord],
        failures: &[FailedLookup],
    ) -> Result<BalanceArtifacts, CliError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let artifacts = BalanceArtifacts {
            balances_json: self.path("seeds_accounts_balances", "json"),
            balances_csv: self.path("seeds_accounts_balances", "csv"),
            errors_json: self.path("seeds_errors", "json"),
        };

        write_json(&artifacts.errors_json, failures).await?;
        write_json(&artifacts.balances_json, records).await?;
        tokio::fs::write(&artifacts.balances_csv, records_csv(records)?).await?;

        info!(
            "Wrote {} balances to {} and {} failures to {}",
            records.len(),
            artifacts.balances_json.display(),
            failures.len(),
            artifacts.errors_json.display()
        );
        Ok(artifacts)
    }

    pub async fn write_planted(&self, rows: &[Row]) -> Result<PathBuf, CliError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path("planted_balances", "json");
        write_json(&path, rows).await?;

        info!("Wrote {} planted rows to {}", rows.len(), path.display());
        Ok(path)
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// `account,balance,date` lines without a header row.
fn records_csv(records: &[EnrichedRecord]) -> Result<Vec<u8>, CliError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for record in records {
        let date = record.date.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        writer.write_record([
            record.account.as_str(),
            record.balance.as_str(),
            date.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| CliError::Unexpected(format!("Failed to flush CSV buffer: {err}")))
}

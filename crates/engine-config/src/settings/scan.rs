use crate::{env::EnvVars, settings::error::SettingsError};
use model::core::identifiers::{TableId, TokenId};
use std::{path::PathBuf, str::FromStr, time::Duration};

pub const ENV_NODE_URL: &str = "CHAIN_SCAN_NODE_URL";
pub const ENV_TOKEN_CONTRACT: &str = "CHAIN_SCAN_TOKEN_CONTRACT";
pub const ENV_TOKEN_SYMBOL: &str = "CHAIN_SCAN_TOKEN_SYMBOL";
pub const ENV_PLANTED_CONTRACT: &str = "CHAIN_SCAN_PLANTED_CONTRACT";
pub const ENV_SCOPE_PAGE_LIMIT: &str = "CHAIN_SCAN_SCOPE_PAGE_LIMIT";
pub const ENV_ROW_PAGE_LIMIT: &str = "CHAIN_SCAN_ROW_PAGE_LIMIT";
pub const ENV_LOOKUP_BATCH_SIZE: &str = "CHAIN_SCAN_LOOKUP_BATCH_SIZE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CHAIN_SCAN_REQUEST_TIMEOUT_SECS";
pub const ENV_DEADLINE_SECS: &str = "CHAIN_SCAN_DEADLINE_SECS";
pub const ENV_OUTPUT_DIR: &str = "CHAIN_SCAN_OUTPUT_DIR";

const DEFAULT_NODE_URL: &str = "https://node.hypha.earth";
const DEFAULT_TOKEN_CONTRACT: &str = "token.seeds";
const DEFAULT_TOKEN_SYMBOL: &str = "SEEDS";
const DEFAULT_PLANTED_CONTRACT: &str = "harvst.seeds";
const PLANTED_TABLE: &str = "planted";

/// Immutable, validated configuration for a scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    /// Base URL of the node's HTTP API
    pub node_url: String,
    /// Token whose holders and balances are reported
    pub token: TokenId,
    /// Table holding planted (staked) balances
    pub planted: TableId,
    /// Page size for scope scans
    pub scope_page_limit: u32,
    /// Page size for primary-key row scans
    pub row_page_limit: u32,
    /// Balance lookups in flight at once
    pub lookup_batch_size: usize,
    /// Upper bound on any single HTTP request
    pub request_timeout: Duration,
    /// Upper bound on a whole scan
    pub scan_deadline: Duration,
    /// Where artifacts are written
    pub output_dir: PathBuf,
}

impl ScanSettings {
    pub fn builder() -> ScanSettingsBuilder {
        ScanSettingsBuilder::default()
    }

    /// Defaults overridden by any `CHAIN_SCAN_*` variables present.
    pub fn from_env(env: &EnvVars) -> Result<Self, SettingsError> {
        let mut builder = Self::builder();

        if let Some(url) = env.get(ENV_NODE_URL) {
            builder.node_url = Some(url.to_string());
        }
        if let Some(contract) = env.get(ENV_TOKEN_CONTRACT) {
            builder.token_contract = Some(contract.to_string());
        }
        if let Some(symbol) = env.get(ENV_TOKEN_SYMBOL) {
            builder.token_symbol = Some(symbol.to_string());
        }
        if let Some(contract) = env.get(ENV_PLANTED_CONTRACT) {
            builder.planted_contract = Some(contract.to_string());
        }
        if let Some(dir) = env.get(ENV_OUTPUT_DIR) {
            builder.output_dir = Some(PathBuf::from(dir));
        }

        builder.scope_page_limit = parse_var(env, ENV_SCOPE_PAGE_LIMIT)?;
        builder.row_page_limit = parse_var(env, ENV_ROW_PAGE_LIMIT)?;
        builder.lookup_batch_size = parse_var(env, ENV_LOOKUP_BATCH_SIZE)?;
        builder.request_timeout =
            parse_var::<u64>(env, ENV_REQUEST_TIMEOUT_SECS)?.map(Duration::from_secs);
        builder.scan_deadline = parse_var::<u64>(env, ENV_DEADLINE_SECS)?.map(Duration::from_secs);

        builder.build()
    }
}

fn parse_var<T>(env: &EnvVars, key: &str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env.get(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| SettingsError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[derive(Debug, Default, Clone)]
pub struct ScanSettingsBuilder {
    pub node_url: Option<String>,
    pub token_contract: Option<String>,
    pub token_symbol: Option<String>,
    pub planted_contract: Option<String>,
    pub scope_page_limit: Option<u32>,
    pub row_page_limit: Option<u32>,
    pub lookup_batch_size: Option<usize>,
    pub request_timeout: Option<Duration>,
    pub scan_deadline: Option<Duration>,
    pub output_dir: Option<PathBuf>,
}

impl ScanSettingsBuilder {
    pub fn build(self) -> Result<ScanSettings, SettingsError> {
        let node_url = non_empty(self.node_url, DEFAULT_NODE_URL, "node URL")?;
        let token_contract =
            non_empty(self.token_contract, DEFAULT_TOKEN_CONTRACT, "token contract")?;
        let token_symbol = non_empty(self.token_symbol, DEFAULT_TOKEN_SYMBOL, "token symbol")?;
        let planted_contract =
            non_empty(self.planted_contract, DEFAULT_PLANTED_CONTRACT, "planted contract")?;

        let scope_page_limit = positive(self.scope_page_limit.unwrap_or(2000), "scope page limit")?;
        let row_page_limit = positive(self.row_page_limit.unwrap_or(1000), "row page limit")?;
        let lookup_batch_size =
            positive(self.lookup_batch_size.unwrap_or(100), "lookup batch size")?;

        let request_timeout = self.request_timeout.unwrap_or(Duration::from_secs(30));
        if request_timeout.is_zero() {
            return Err(SettingsError::ZeroNotAllowed("request timeout"));
        }
        let scan_deadline = self.scan_deadline.unwrap_or(Duration::from_secs(30 * 60));
        if scan_deadline.is_zero() {
            return Err(SettingsError::ZeroNotAllowed("scan deadline"));
        }

        Ok(ScanSettings {
            node_url,
            token: TokenId::new(token_contract, token_symbol),
            planted: TableId::self_scoped(planted_contract, PLANTED_TABLE),
            scope_page_limit,
            row_page_limit,
            lookup_batch_size,
            request_timeout,
            scan_deadline,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

fn non_empty(
    value: Option<String>,
    default: &str,
    name: &'static str,
) -> Result<String, SettingsError> {
    let value = value.unwrap_or_else(|| default.to_string());
    if value.trim().is_empty() {
        return Err(SettingsError::Empty(name));
    }
    Ok(value.trim().to_string())
}

fn positive<T>(value: T, name: &'static str) -> Result<T, SettingsError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        return Err(SettingsError::ZeroNotAllowed(name));
    }
    Ok(value)
}

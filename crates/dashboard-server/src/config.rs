use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LEDGER_CAPACITY: usize = 1_000;
const DEFAULT_SEED_DEMO: bool = true;
const DEFAULT_DEMO_DAYS: u32 = 30;

const ENV_ADDR: &str = "DASHBOARD_SERVER_ADDR";
const ENV_LEDGER_CAPACITY: &str = "DASHBOARD_LEDGER_CAPACITY";
const ENV_FORECAST_SEED: &str = "DASHBOARD_FORECAST_SEED";
const ENV_SEED_DEMO: &str = "DASHBOARD_SEED_DEMO";
const ENV_DEMO_DAYS: &str = "DASHBOARD_DEMO_DAYS";
const ENV_ALPHA_VANTAGE_KEY: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub ledger_capacity: usize,
    pub forecast_seed: Option<u64>,
    pub seed_demo: bool,
    pub demo_days: u32,
    pub alpha_vantage_api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DASHBOARD_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("DASHBOARD_LEDGER_CAPACITY must be a positive integer")]
    InvalidLedgerCapacity,
    #[error("DASHBOARD_FORECAST_SEED must be an unsigned 64-bit integer")]
    InvalidForecastSeed,
    #[error("DASHBOARD_SEED_DEMO must be true or false")]
    InvalidSeedDemo,
    #[error("DASHBOARD_DEMO_DAYS must be a non-negative integer")]
    InvalidDemoDays,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env(ENV_ADDR)? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(ConfigError::InvalidListenAddr)?,
        };

        let ledger_capacity = match read_env(ENV_LEDGER_CAPACITY)? {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or(ConfigError::InvalidLedgerCapacity)?,
            None => DEFAULT_LEDGER_CAPACITY,
        };

        let forecast_seed = match read_env(ENV_FORECAST_SEED)? {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidForecastSeed)?,
            ),
            None => None,
        };

        let seed_demo = match read_env(ENV_SEED_DEMO)? {
            Some(value) => parse_bool(value.as_str()).ok_or(ConfigError::InvalidSeedDemo)?,
            None => DEFAULT_SEED_DEMO,
        };

        let demo_days = match read_env(ENV_DEMO_DAYS)? {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidDemoDays)?,
            None => DEFAULT_DEMO_DAYS,
        };

        let alpha_vantage_api_key = read_env(ENV_ALPHA_VANTAGE_KEY)?
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        Ok(Self {
            listen_addr,
            ledger_capacity,
            forecast_seed,
            seed_demo,
            demo_days,
            alpha_vantage_api_key,
        })
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

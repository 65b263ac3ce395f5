use clap::{Parser, ValueEnum};
use snip_core::CodeLength;
use snip_engine::EngineSettings;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "SNIP_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SNIP_MYSQL_DSN";
pub const SEED_STRATEGY_ENV: &str = "SNIP_SEED_STRATEGY";
pub const CODE_LENGTH_ENV: &str = "SNIP_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "SNIP_MAX_ATTEMPTS";
pub const STORE_TIMEOUT_MS_ENV: &str = "SNIP_STORE_TIMEOUT_MS";
pub const CACHE_CAPACITY_ENV: &str = "SNIP_CACHE_CAPACITY";
pub const SHUTDOWN_TIMEOUT_SECS_ENV: &str = "SNIP_SHUTDOWN_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9090";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:9090";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

/// Where seeds for new codes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedStrategyArg {
    /// Monotonic counter; persisted in the database when storage is mysql.
    #[value(name = "counter")]
    Counter,
    /// Fresh random seed per attempt.
    #[value(name = "random")]
    Random,
}

impl Display for SeedStrategyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedStrategyArg::Counter => write!(f, "counter"),
            SeedStrategyArg::Random => write!(f, "random"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "snip-gateway", about = "HTTP front end of the snip URL shortener")]
pub struct Config {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix used to build the `short_url` returned on creation.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long = "seed",
        env = SEED_STRATEGY_ENV,
        value_enum,
        default_value_t = SeedStrategyArg::Counter
    )]
    pub seed_strategy: SeedStrategyArg,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value = "7",
        value_parser = parse_code_length
    )]
    pub code_length: CodeLength,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = 2_000)]
    pub store_timeout_ms: u64,

    /// Mappings kept in the in-process read cache; 0 disables it.
    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub cache_capacity: u64,

    /// How long in-flight requests may take to finish after a shutdown signal.
    #[arg(long, env = SHUTDOWN_TIMEOUT_SECS_ENV, default_value_t = 30)]
    pub shutdown_timeout_secs: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}

impl Config {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings::builder()
            .max_attempts(self.max_attempts)
            .store_timeout(Duration::from_millis(self.store_timeout_ms))
            .build()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn parse_code_length(raw: &str) -> Result<CodeLength, String> {
    let length: usize = raw.parse().map_err(|e| format!("{e}"))?;
    CodeLength::new(length).map_err(|e| e.to_string())
}

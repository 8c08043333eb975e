pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::ports::StoreKind;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_socket_addr, validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub use toml_config::TomlConfig;

pub const MONGO_SCHEMES: [&str; 2] = ["mongodb", "mongodb+srv"];
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Parser)]
#[command(name = "books-api")]
#[command(about = "CRUD HTTP service for books backed by MongoDB")]
pub struct CliConfig {
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    #[arg(long, value_enum, default_value_t = StoreKind::Mongo)]
    pub store: StoreKind,

    #[arg(long, default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[arg(long, default_value = "demo")]
    pub database: String,

    #[arg(long, default_value = "books")]
    pub collection: String,

    #[arg(long, default_value = "10")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = "10")]
    pub connect_timeout_secs: u64,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    fn store_kind(&self) -> StoreKind {
        self.store
    }

    fn store_uri(&self) -> &str {
        &self.mongo_uri
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_socket_addr("listen_addr", config.listen_addr())?;

    if config.store_kind() == StoreKind::Mongo {
        validate_url("store.uri", config.store_uri(), &MONGO_SCHEMES)?;
        validate_non_empty_string("store.database", config.database_name())?;
        validate_non_empty_string("store.collection", config.collection_name())?;
    }

    validate_range(
        "request_timeout_secs",
        config.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECS,
    )?;
    validate_range(
        "connect_timeout_secs",
        config.connect_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECS,
    )?;

    Ok(())
}

//! Server configuration from command-line flags and environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use patient_records_core::db::{Database, DbResult};

/// Filter applied when neither `--log-filter` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "patient_records=info,tower_http=info";

/// Database path that selects a throwaway in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Parser)]
#[command(name = "patient-records-api")]
#[command(about = "Patient and encounter records REST API", long_about = None)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "PATIENT_RECORDS_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PATIENT_RECORDS_PORT", default_value_t = 8085)]
    pub port: u16,

    /// SQLite database file, or `:memory:`
    #[arg(long, env = "PATIENT_RECORDS_DATABASE", default_value = "patient_records.db")]
    pub database: PathBuf,

    /// Browser origin allowed by CORS
    #[arg(long, env = "PATIENT_RECORDS_CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Load demo patients and encounters into an empty database
    #[arg(long, env = "PATIENT_RECORDS_SEED")]
    pub seed: bool,

    /// Tracing filter directives
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.as_os_str() == IN_MEMORY_DATABASE
    }

    pub fn open_database(&self) -> DbResult<Database> {
        if self.is_in_memory() {
            Database::open_in_memory()
        } else {
            Database::open(&self.database)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["patient-records-api"]).unwrap();
        assert_eq!(config.port, 8085);
        assert_eq!(config.database, PathBuf::from("patient_records.db"));
        assert!(!config.is_in_memory());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8085");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "patient-records-api",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--database",
            ":memory:",
            "--seed",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert!(config.is_in_memory());
        assert!(config.seed);
        assert_eq!(config.log_filter(), "debug");

        let db = config.open_database().unwrap();
        assert!(db.list_patients().unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["patient-records-api", "--port", "http"]).is_err());
    }
}

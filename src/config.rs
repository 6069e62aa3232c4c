use crate::domain::catalog::ReferenceCatalog;
use crate::error::Result;
use crate::interfaces::csv::transaction_reader::TransactionReader;
use crate::interfaces::json::catalog_reader::CatalogReader;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub service: ServiceConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct ServiceConfig {
    /// JSON catalog of merchants, card profile and transactions. Uses the
    /// built-in dataset when omitted.
    #[arg(long, global = true, env = "PUSH_PROVISIONING_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// CSV transaction history replacing the catalog's transactions
    #[arg(long, global = true, env = "PUSH_PROVISIONING_TRANSACTIONS")]
    pub transactions: Option<PathBuf>,

    /// Upper bound for every token gateway call, in milliseconds
    #[arg(
        long,
        global = true,
        env = "PUSH_PROVISIONING_GATEWAY_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub gateway_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(
        long,
        global = true,
        env = "PUSH_PROVISIONING_LOG_LEVEL",
        default_value = "info"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "PUSH_PROVISIONING_BIND", default_value = "0.0.0.0:8001")]
        bind: String,
    },
    /// Run one push provisioning request and print the response as JSON
    Provision {
        /// Comma separated merchant app ids, e.g. `1,2,3`
        #[arg(long, value_delimiter = ',', required = true)]
        merchant_app_ids: Vec<u32>,

        #[arg(long, default_value = "default_card")]
        card_identifier: String,
    },
    /// Print the merchant apps eligible for push provisioning as JSON
    Merchants,
}

impl ServiceConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }

    /// Loads the reference catalog once, from files if configured.
    pub fn load_catalog(&self) -> Result<ReferenceCatalog> {
        let catalog = match &self.catalog {
            Some(path) => CatalogReader::new(File::open(path)?).read()?,
            None => ReferenceCatalog::default(),
        };
        match &self.transactions {
            Some(path) => {
                let transactions = TransactionReader::new(File::open(path)?).read_all()?;
                catalog.with_transactions(transactions)
            }
            None => Ok(catalog),
        }
    }
}

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::registration::{RegistrationLedger, SimulatedGateway};
use crate::store::{EnrollmentStore, MemoryStore, SqliteStore};
use std::sync::Arc;
use tracing::info;

/// State shared by every request handler.
pub struct AppState {
    pub ledger: RegistrationLedger,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(ledger: RegistrationLedger, config: AppConfig) -> Self {
        Self { ledger, config }
    }

    /// Builds the catalog, store and simulated registrar described by `config`.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load_from_file(path)?,
            None => {
                info!("No catalog file configured, using built-in catalog");
                Catalog::mock()
            }
        };

        let store: Arc<dyn EnrollmentStore> = match &config.database_path {
            Some(path) => Arc::new(SqliteStore::open(path)?),
            None => {
                info!("No database configured, enrollments are kept in memory");
                Arc::new(MemoryStore::new())
            }
        };

        let gateway = Arc::new(SimulatedGateway::new(config.gateway.clone()));
        let ledger = RegistrationLedger::new(catalog, store, gateway, config.max_credits);

        Ok(Self::new(ledger, config))
    }
}

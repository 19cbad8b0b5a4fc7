use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{CredentialService, MemoryUserDirectory, PgUserDirectory, UserDirectory};
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let directory = match &config.database {
            Some(database) => {
                let pool = db::connect(database).await?;
                db::migrate(&pool).await?;
                info!("using postgres user directory");
                Arc::new(PgUserDirectory::new(pool)) as Arc<dyn UserDirectory>
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory");
                Arc::new(MemoryUserDirectory::new()) as Arc<dyn UserDirectory>
            }
        };

        Ok(Self::from_parts(Arc::new(config), directory))
    }

    pub fn from_parts(config: Arc<AppConfig>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            config,
            credentials: CredentialService::new(directory),
        }
    }

    /// Default config over an empty in-memory directory.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::default()),
            Arc::new(MemoryUserDirectory::new()),
        )
    }
}

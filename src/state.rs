use crate::config::AppConfig;
use crate::contacts::{ContactStore, MemoryContactStore, PgContactStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::connect(config).await
    }

    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let store = if config.uses_memory_store() {
            tracing::warn!("using in-memory contact store; data is lost on exit");
            Arc::new(MemoryContactStore::new()) as Arc<dyn ContactStore>
        } else {
            Arc::new(PgContactStore::connect(&config.database_url, config.max_connections).await?)
                as Arc<dyn ContactStore>
        };

        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn ContactStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Empty in-memory state for tests.
    pub fn fake() -> Self {
        Self::from_parts(
            Arc::new(MemoryContactStore::new()),
            Arc::new(AppConfig::in_memory()),
        )
    }
}

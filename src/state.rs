use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{IdentityProvider, LocalIdentity, SupabaseIdentity};
use crate::config::AppConfig;
use crate::database::{MemoryStore, PgStore, Record, Repository, Store};
use crate::market::{HttpMarketData, MarketData, MarketError};

/// Shared handles every handler needs
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn Store>,
    pub market: Option<Arc<dyn MarketData>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn Store>,
        market: Option<Arc<dyn MarketData>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            identity,
            store,
            market,
        }
    }

    /// Wire the hosted backends when configured, local ones otherwise
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.database.url.as_deref() {
            Some(url) => Arc::new(PgStore::connect(url, &config.database).await?),
            None => {
                warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let identity: Arc<dyn IdentityProvider> = if config.identity.uses_supabase() {
            Arc::new(SupabaseIdentity::new(&config.identity)?)
        } else {
            warn!("Supabase credentials not set; using local accounts");
            Arc::new(LocalIdentity::new(&config.identity)?)
        };

        let market: Option<Arc<dyn MarketData>> = match HttpMarketData::new(&config.market) {
            Ok(client) => Some(Arc::new(client)),
            Err(MarketError::NotConfigured) => {
                warn!("STOCK_API_KEY or STOCK_API_BASE_URL not set; quote routes will answer 500");
                None
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Backends: store={}, identity={}, market={}",
            store.backend(),
            identity.name(),
            if market.is_some() { config.market.provider.as_str() } else { "none" }
        );

        Ok(Self::new(config, identity, store, market))
    }

    pub fn repo<T: Record>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }

    pub fn market(&self) -> Result<&Arc<dyn MarketData>, MarketError> {
        self.market.as_ref().ok_or(MarketError::NotConfigured)
    }
}

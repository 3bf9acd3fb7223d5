use std::sync::Arc;

use tracing::info;

use crate::accounts::repo::AccountStore;
use crate::activity::repo::ActivityStore;
use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, StoreBackend};
use crate::db::PgStore;
use crate::measurements::repo::MeasurementStore;
use crate::memory::MemoryStore;
use crate::snapshots::repo::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountStore>,
    pub measurements: Arc<dyn MeasurementStore>,
    pub activities: Arc<dyn ActivityStore>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let clock = Arc::new(SystemClock::new(config.clock_offset)) as Arc<dyn Clock>;

        let state = match config.backend {
            StoreBackend::Postgres => {
                let store = Arc::new(PgStore::connect(&config).await?);
                info!("using postgres store");
                Self::from_store(config, store, clock)
            }
            StoreBackend::Memory => {
                info!("using in-memory store; data is lost on restart");
                Self::from_store(config, Arc::new(MemoryStore::new()), clock)
            }
        };
        Ok(state)
    }

    /// Wire one backend that implements every store trait.
    pub fn from_store<S>(config: Arc<AppConfig>, store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: AccountStore + MeasurementStore + ActivityStore + SnapshotStore + 'static,
    {
        Self {
            config,
            accounts: store.clone(),
            measurements: store.clone(),
            activities: store.clone(),
            snapshots: store,
            clock,
        }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<MemoryStore>, now: time::OffsetDateTime) -> Self {
        use crate::config::JwtConfig;
        use crate::clock::FixedClock;

        let config = Arc::new(AppConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            request_timeout: std::time::Duration::from_secs(5),
            clock_offset: time::UtcOffset::UTC,
        });

        Self::from_store(config, store, Arc::new(FixedClock(now)))
    }
}

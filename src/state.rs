use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::domain::lockout::LockoutPolicy;
use crate::services::{
    AuthService, CategoryService, LiveUpdateService, LoginRateLimiter, MemoryRateLimitStore,
    RateLimitStore, SeaOrmAuthService, SeaOrmCategoryService, SeaOrmLiveUpdateService,
    SeaOrmTagService, TagService, TokenService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: Arc<TokenService>,

    pub auth_service: Arc<dyn AuthService>,

    pub category_service: Arc<dyn CategoryService>,

    pub tag_service: Arc<dyn TagService>,

    pub live_update_service: Arc<dyn LiveUpdateService>,

    pub login_limiter: Arc<LoginRateLimiter>,

    /// Peers whose `X-Forwarded-For` header is believed.
    pub trusted_proxies: Vec<IpAddr>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_rate_limit_store(config, Arc::new(MemoryRateLimitStore::new())).await
    }

    /// Builds the state with a caller-provided counter store, e.g. one shared
    /// between instances.
    pub async fn with_rate_limit_store(
        config: Config,
        rate_limit_store: Arc<dyn RateLimitStore>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenService::from_config(&config.security));
        let policy = LockoutPolicy::from_config(&config.security.lockout);

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens.clone(), policy))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let category_service = Arc::new(SeaOrmCategoryService::new(store.clone()))
            as Arc<dyn CategoryService + Send + Sync + 'static>;

        let tag_service = Arc::new(SeaOrmTagService::new(store.clone()))
            as Arc<dyn TagService + Send + Sync + 'static>;

        let live_update_service = Arc::new(SeaOrmLiveUpdateService::new(
            store.clone(),
            config.content.max_pinned_updates,
        )) as Arc<dyn LiveUpdateService + Send + Sync + 'static>;

        let login_limiter = Arc::new(LoginRateLimiter::from_config(
            &config.security.login_rate_limit,
            rate_limit_store,
        ));

        let trusted_proxies = config
            .security
            .login_rate_limit
            .trusted_proxy_ips
            .iter()
            .filter_map(|ip| match ip.parse::<IpAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(value = %ip, "Ignoring invalid trusted proxy address");
                    None
                }
            })
            .collect();

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            tokens,
            auth_service,
            category_service,
            tag_service,
            live_update_service,
            login_limiter,
            trusted_proxies,
        })
    }
}

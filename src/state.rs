use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::cache::TtlCache;
use crate::clients::posts::PostsClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{PostService, RemotePostService, SlowTaskService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Recipebook/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub cache: Arc<TtlCache>,

    pub post_service: Arc<dyn PostService>,

    pub slow_task: Arc<SlowTaskService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.external_api.request_timeout_seconds)?;
        let posts_client =
            PostsClient::with_shared_client(http_client, &config.external_api.base_url);

        let cache = Arc::new(TtlCache::new());
        let cache_ttl = Duration::from_secs(config.external_api.cache_ttl_seconds);

        let post_service = Arc::new(RemotePostService::new(
            posts_client,
            cache.clone(),
            cache_ttl,
            config.external_api.default_user_id,
        )) as Arc<dyn PostService>;

        let slow_task = Arc::new(SlowTaskService::new(
            cache.clone(),
            cache_ttl,
            Duration::from_millis(config.external_api.slow_task_delay_ms),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            cache,
            post_service,
            slow_task,
        })
    }
}

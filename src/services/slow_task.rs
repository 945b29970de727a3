use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cache::TtlCache;
use crate::web::Flashes;

/// Cache key holding the result of the simulated long computation.
pub const SLOW_TASK_CACHE_KEY: &str = "mon_texte_long";

const SLOW_TASK_RESULT: &str = "That took a while!";

/// A deliberately slow computation whose result is cached, independent of
/// anything fetched from the posts API.
pub struct SlowTaskService {
    cache: Arc<TtlCache>,
    cache_ttl: Duration,
    delay: Duration,
}

impl SlowTaskService {
    #[must_use]
    pub const fn new(cache: Arc<TtlCache>, cache_ttl: Duration, delay: Duration) -> Self {
        Self {
            cache,
            cache_ttl,
            delay,
        }
    }

    /// Cached result; blocks for the configured delay on a miss.
    pub async fn result(&self, flashes: &mut Flashes) -> String {
        let delay = self.delay;
        let lookup = self
            .cache
            .get_or_compute(SLOW_TASK_CACHE_KEY, self.cache_ttl, || async move {
                info!(delay_ms = delay.as_millis(), "Running slow task");
                tokio::time::sleep(delay).await;
                SLOW_TASK_RESULT.to_string()
            })
            .await;

        if lookup.computed {
            flashes.info("Slow task executed (not found in cache or expired).");
        }

        lookup.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_slow_task_blocks_only_on_miss() {
        let service = SlowTaskService::new(
            Arc::new(TtlCache::new()),
            Duration::from_secs(20),
            Duration::from_secs(8),
        );

        let start = tokio::time::Instant::now();
        let mut flashes = Flashes::new();
        assert_eq!(service.result(&mut flashes).await, SLOW_TASK_RESULT);
        assert!(start.elapsed() >= Duration::from_secs(8));
        assert_eq!(flashes.len(), 1);

        let start = tokio::time::Instant::now();
        let mut flashes = Flashes::new();
        service.result(&mut flashes).await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(flashes.is_empty());

        tokio::time::advance(Duration::from_secs(21)).await;
        let mut flashes = Flashes::new();
        service.result(&mut flashes).await;
        assert_eq!(flashes.len(), 1);
    }
}

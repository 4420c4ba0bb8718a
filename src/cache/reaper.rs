//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are never read again still converge out of the cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::engine::Shared;

/// Spawns the background reaper for a cache instance.
///
/// Each tick collects the expired keys under a read lock, releases it, and
/// then deletes them one by one through the regular delete path. Store calls
/// therefore never run behind the index lock, and a key already removed by a
/// concurrent caller is deleted again harmlessly.
///
/// The task exits when the shutdown channel signals `true`, or when the
/// sender side is dropped along with the cache.
pub(crate) fn spawn_reaper_task<V>(
    shared: Arc<Shared<V>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("starting TTL reaper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // happens one full interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = sweep(&shared).await;
                    if removed > 0 {
                        info!("reaper removed {} expired entries", removed);
                    } else {
                        debug!("reaper found no expired entries");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("TTL reaper stopped");
    })
}

/// Deletes every key whose expiry has passed. Returns the number removed.
async fn sweep<V>(shared: &Shared<V>) -> usize
where
    V: Clone + Send + Sync + 'static,
{
    let expired = shared.expired_keys(Instant::now()).await;
    let count = expired.len();

    for key in &expired {
        shared.delete(key).await;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::config::CacheConfig;
    use tokio::time::sleep;

    fn reaping_cache(interval_ms: u64) -> Cache<String> {
        let config = CacheConfig {
            reap_interval: Duration::from_millis(interval_ms),
            ..Default::default()
        };
        Cache::new(config).expect("valid config")
    }

    #[tokio::test]
    async fn test_reaper_converges_without_reads() {
        let cache = reaping_cache(100);

        cache
            .set("short", "v".to_string(), Some(Duration::from_millis(30)))
            .await;

        // Never read the key; the reaper alone must remove it within one
        // interval plus a margin.
        sleep(Duration::from_millis(300)).await;

        assert_eq!(cache.tracked_keys().await, 0);
        cache.close().await;
    }

    #[tokio::test]
    async fn test_reaper_preserves_live_entries() {
        let cache = reaping_cache(50);

        cache
            .set("long", "v".to_string(), Some(Duration::from_secs(60)))
            .await;
        cache.set("none", "v".to_string(), None).await;

        sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("long").await, Some("v".to_string()));
        assert_eq!(cache.get("none").await, Some("v".to_string()));
        assert_eq!(cache.tracked_keys().await, 1);
        cache.close().await;
    }

    #[tokio::test]
    async fn test_reaper_tolerates_races_with_delete() {
        let cache = reaping_cache(30);

        for i in 0..20 {
            cache
                .set(
                    format!("k{}", i),
                    "v".to_string(),
                    Some(Duration::from_millis(10)),
                )
                .await;
        }

        // Delete half the keys ourselves while the reaper sweeps the rest.
        for i in 0..10 {
            cache.delete(&format!("k{}", i)).await;
        }

        sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.tracked_keys().await, 0);
        for i in 0..20 {
            assert_eq!(cache.get(&format!("k{}", i)).await, None);
        }
        cache.close().await;
    }
}

//! Caching layer in front of the network collaborators

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::market::{HistoryPeriod, PriceBar};
use crate::providers::{HeadlineProvider, PriceHistoryProvider};

/// Cache key for price history requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub ticker: String,
    pub period: HistoryPeriod,
    pub interval: String,
}

/// Cache key for headline requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadlineKey {
    pub ticker: String,
    pub count: usize,
}

/// Thread-safe cache with a fixed time-to-live
pub struct StockCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
}

impl<K, V> StockCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value, caching only values accepted by `keep`
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: K,
        keep: impl FnOnce(&V) -> bool,
        fetcher: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        if keep(&value) {
            self.insert(key, value.clone()).await;
        }

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &K) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for StockCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Price provider that remembers non-empty histories for a TTL
pub struct CachedPriceProvider<P> {
    inner: P,
    cache: StockCache<HistoryKey, Vec<PriceBar>>,
}

impl<P: PriceHistoryProvider> CachedPriceProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: StockCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &StockCache<HistoryKey, Vec<PriceBar>> {
        &self.cache
    }
}

#[async_trait]
impl<P: PriceHistoryProvider> PriceHistoryProvider for CachedPriceProvider<P> {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: &str,
    ) -> Result<Vec<PriceBar>> {
        let key = HistoryKey {
            ticker: ticker.to_string(),
            period,
            interval: interval.to_string(),
        };
        self.cache
            .get_or_fetch(
                key,
                |bars| !bars.is_empty(),
                || self.inner.fetch_history(ticker, period, interval),
            )
            .await
    }
}

/// Headline provider that remembers non-empty headline lists for a TTL
pub struct CachedHeadlineProvider<H> {
    inner: H,
    cache: StockCache<HeadlineKey, Vec<String>>,
}

impl<H: HeadlineProvider> CachedHeadlineProvider<H> {
    pub fn new(inner: H, ttl: Duration) -> Self {
        Self {
            inner,
            cache: StockCache::new(ttl),
        }
    }
}

#[async_trait]
impl<H: HeadlineProvider> HeadlineProvider for CachedHeadlineProvider<H> {
    async fn fetch_headlines(&self, ticker: &str, count: usize) -> Result<Vec<String>> {
        let key = HeadlineKey {
            ticker: ticker.to_string(),
            count,
        };
        self.cache
            .get_or_fetch(
                key,
                |headlines| !headlines.is_empty(),
                || self.inner.fetch_headlines(ticker, count),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockHeadlineProvider, MockPriceHistoryProvider};
    use chrono::Utc;

    fn key(ticker: &str) -> HistoryKey {
        HistoryKey {
            ticker: ticker.to_string(),
            period: HistoryPeriod::SixMonths,
            interval: "1d".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache: StockCache<HistoryKey, Vec<PriceBar>> = StockCache::new(Duration::from_secs(60));
        let bars = vec![PriceBar::flat(Utc::now(), 150.0)];

        cache.insert(key("AAPL"), bars.clone()).await;

        assert_eq!(cache.get(&key("AAPL")).await, Some(bars));
        assert_eq!(cache.get(&key("MSFT")).await, None);
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache: StockCache<HistoryKey, Vec<PriceBar>> = StockCache::new(Duration::from_secs(60));
        for ticker in ["A", "B", "C"] {
            cache.insert(key(ticker), vec![PriceBar::flat(Utc::now(), 1.0)]).await;
        }
        assert_eq!(cache.len().await, 3);

        cache.invalidate(&key("A")).await;
        assert!(cache.get(&key("A")).await.is_none());
        assert_eq!(cache.len().await, 2);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cached_provider_fetches_once() {
        let bars = vec![PriceBar::flat(Utc::now(), 42.0)];
        let returned = bars.clone();

        let mut inner = MockPriceHistoryProvider::new();
        inner
            .expect_fetch_history()
            .times(1)
            .returning(move |_, _, _| Ok(returned.clone()));

        let provider = CachedPriceProvider::new(inner, Duration::from_secs(60));
        let first = provider
            .fetch_history("AAPL", HistoryPeriod::SixMonths, "1d")
            .await
            .unwrap();
        let second = provider
            .fetch_history("AAPL", HistoryPeriod::SixMonths, "1d")
            .await
            .unwrap();

        assert_eq!(first, bars);
        assert_eq!(second, bars);
        assert_eq!(provider.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_history_not_cached() {
        let mut inner = MockPriceHistoryProvider::new();
        inner
            .expect_fetch_history()
            .times(2)
            .returning(|_, _, _| Ok(Vec::new()));

        let provider = CachedPriceProvider::new(inner, Duration::from_secs(60));
        for _ in 0..2 {
            let bars = provider
                .fetch_history("NOPE", HistoryPeriod::OneMonth, "1d")
                .await
                .unwrap();
            assert!(bars.is_empty());
        }
    }

    #[tokio::test]
    async fn test_cached_headlines() {
        let mut inner = MockHeadlineProvider::new();
        inner
            .expect_fetch_headlines()
            .times(1)
            .returning(|_, _| Ok(vec!["Apple beats estimates".to_string()]));

        let provider = CachedHeadlineProvider::new(inner, Duration::from_secs(300));
        for _ in 0..3 {
            let headlines = provider.fetch_headlines("AAPL", 20).await.unwrap();
            assert_eq!(headlines.len(), 1);
        }
    }
}

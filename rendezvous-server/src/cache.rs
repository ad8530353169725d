//! Caching layer for flight offer lookups.
//!
//! Repeated searches from the same group tend to price the same legs again
//! within minutes. Offers are cached per leg query (route, date and every
//! provider option), so two queries differing in any option never share an
//! entry. Failed lookups are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::amadeus::AmadeusError;
use crate::domain::{Offer, PriceQuery};
use crate::planner::OfferSource;

/// Cached offer list for one leg.
type OfferEntry = Arc<Vec<Offer>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Offer source with caching.
///
/// Wraps any [`OfferSource`] and caches its successful responses.
pub struct CachedOfferSource<S> {
    source: S,
    offers: MokaCache<PriceQuery, OfferEntry>,
}

impl<S: OfferSource> CachedOfferSource<S> {
    /// Create a new cached source.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        let offers = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, offers }
    }

    /// Get offers for a leg, using the cache if available.
    ///
    /// Concurrent misses on the same query share one provider call.
    pub async fn get_offers(&self, query: &PriceQuery) -> Result<OfferEntry, AmadeusError> {
        self.offers
            .try_get_with_by_ref(query, async {
                trace!(
                    origin = %query.origin,
                    destination = %query.destination,
                    "offer cache miss"
                );
                self.source.search_offers(query).await.map(Arc::new)
            })
            .await
            .map_err(AmadeusError::from_shared)
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: OfferSource> OfferSource for CachedOfferSource<S> {
    async fn search_offers(&self, query: &PriceQuery) -> Result<Vec<Offer>, AmadeusError> {
        let entry = self.get_offers(query).await?;
        Ok(entry.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IataCode, SearchOptions};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts calls; fails while `failing` is set.
    struct CountingSource {
        calls: AtomicUsize,
        failing: AtomicBool,
        delay: Option<Duration>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                delay: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OfferSource for CountingSource {
        async fn search_offers(&self, _query: &PriceQuery) -> Result<Vec<Offer>, AmadeusError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(AmadeusError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(vec![Offer::new("99.00")])
        }
    }

    fn query(destination: &str, options: SearchOptions) -> PriceQuery {
        PriceQuery::new(
            IataCode::parse("MAD").unwrap(),
            IataCode::parse(destination).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            options,
        )
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn repeated_query_hits_cache() {
        let cached = CachedOfferSource::new(CountingSource::new(), &CacheConfig::default());
        let q = query("LIS", SearchOptions::default());

        let first = cached.search_offers(&q).await.unwrap();
        let second = cached.search_offers(&q).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.source().calls(), 1);
    }

    #[tokio::test]
    async fn options_are_part_of_the_key() {
        let cached = CachedOfferSource::new(CountingSource::new(), &CacheConfig::default());

        cached
            .search_offers(&query("LIS", SearchOptions::default()))
            .await
            .unwrap();
        cached
            .search_offers(&query("LIS", SearchOptions::default().with_non_stop(Some(true))))
            .await
            .unwrap();
        cached
            .search_offers(&query("AMS", SearchOptions::default()))
            .await
            .unwrap();

        assert_eq!(cached.source().calls(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedOfferSource::new(CountingSource::new(), &CacheConfig::default());
        let q = query("LIS", SearchOptions::default());

        cached.source().failing.store(true, Ordering::SeqCst);
        assert!(cached.search_offers(&q).await.is_err());

        cached.source().failing.store(false, Ordering::SeqCst);
        assert!(cached.search_offers(&q).await.is_ok());
        assert_eq!(cached.source().calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_call() {
        let mut source = CountingSource::new();
        source.delay = Some(Duration::from_millis(20));
        let cached = CachedOfferSource::new(source, &CacheConfig::default());
        let q = query("LIS", SearchOptions::default());

        let (a, b, c) = tokio::join!(
            cached.search_offers(&q),
            cached.search_offers(&q),
            cached.search_offers(&q)
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert!(c.is_ok());
        assert_eq!(cached.source().calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_failure_reaches_every_caller() {
        let mut source = CountingSource::new();
        source.delay = Some(Duration::from_millis(20));
        *source.failing.get_mut() = true;
        let cached = CachedOfferSource::new(source, &CacheConfig::default());
        let q = query("LIS", SearchOptions::default());

        let (a, b) = tokio::join!(cached.search_offers(&q), cached.search_offers(&q));

        for result in [a, b] {
            assert!(matches!(result, Err(AmadeusError::Api { status: 503, .. })));
        }
        assert_eq!(cached.source().calls(), 1);
    }
}

//! Read-through TTL cache for product metadata.
//!
//! Lookups for a key that is already being fetched attach to the running
//! fetch instead of issuing their own (single-flight). Fetches run in
//! spawned tasks so an abandoned caller cannot cancel the lookup for the
//! rest, and every fetch is bounded by a timeout. Failures are shared with
//! all waiters but never cached; expired entries are evicted lazily.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::warn;

use pantry_core::{CatalogSettings, Clock, ProductId, SystemClock};

use crate::fetcher::{CatalogError, CatalogFetcher};
use crate::metadata::ProductMetadata;

/// Entries stamped this far ahead of the current clock are treated as
/// ordinary clock skew; anything beyond it is corruption.
const MAX_FUTURE_SKEW_SECS: i64 = 60;

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub fetch_timeout: StdDuration,
    pub max_batch_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(7),
            fetch_timeout: StdDuration::from_secs(3),
            max_batch_size: 50,
        }
    }
}

impl CacheConfig {
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self {
            ttl: Duration::days(i64::from(settings.ttl_days)),
            fetch_timeout: StdDuration::from_secs(settings.fetch_timeout_secs),
            max_batch_size: settings.max_batch_size,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub metadata: ProductMetadata,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub loads: u64,
    pub failures: u64,
    pub evictions: u64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] CatalogError),
    #[error("metadata cache is corrupted: {0}")]
    Corrupted(String),
}

type FetchOutcome = Result<ProductMetadata, CatalogError>;

enum Lookup {
    Fresh(ProductMetadata),
    InFlight(watch::Receiver<Option<FetchOutcome>>),
    Absent,
}

struct CacheInner {
    entries: HashMap<ProductId, CacheEntry>,
    inflight: HashMap<ProductId, watch::Receiver<Option<FetchOutcome>>>,
    stats: CacheStats,
}

impl CacheInner {
    fn new() -> Self {
        Self { entries: HashMap::new(), inflight: HashMap::new(), stats: CacheStats::default() }
    }

    fn lookup(
        &mut self,
        product_id: &ProductId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Lookup, CacheError> {
        if let Some(entry) = self.entries.get(product_id) {
            let ahead = entry.fetched_at - now;
            if ahead.num_seconds() > MAX_FUTURE_SKEW_SECS {
                return Err(CacheError::Corrupted(format!(
                    "metadata for `{product_id}` was fetched at {}, which is {}s ahead of now",
                    entry.fetched_at,
                    ahead.num_seconds(),
                )));
            }

            if now - entry.fetched_at < ttl {
                self.stats.hits += 1;
                return Ok(Lookup::Fresh(entry.metadata.clone()));
            }

            self.entries.remove(product_id);
            self.stats.evictions += 1;
        }

        if let Some(receiver) = self.inflight.get(product_id) {
            // A dead sender means the fetch task aborted before reporting;
            // drop the stale registration and fetch again.
            if receiver.has_changed().is_ok() {
                self.stats.coalesced += 1;
                return Ok(Lookup::InFlight(receiver.clone()));
            }
            self.inflight.remove(product_id);
        }

        self.stats.misses += 1;
        Ok(Lookup::Absent)
    }
}

pub struct ProductCache {
    fetcher: Arc<dyn CatalogFetcher>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    inner: Arc<Mutex<CacheInner>>,
}

impl ProductCache {
    pub fn new(fetcher: Arc<dyn CatalogFetcher>, config: CacheConfig) -> Self {
        Self::with_clock(fetcher, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        fetcher: Arc<dyn CatalogFetcher>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { fetcher, config, clock, inner: Arc::new(Mutex::new(CacheInner::new())) }
    }

    pub async fn get(&self, product_id: &ProductId) -> Result<ProductMetadata, CacheError> {
        let now = self.clock.now();
        let receiver = {
            let mut inner = self.inner.lock().await;
            match inner.lookup(product_id, now, self.config.ttl)? {
                Lookup::Fresh(metadata) => return Ok(metadata),
                Lookup::InFlight(receiver) => receiver,
                Lookup::Absent => self.spawn_fetch(&mut inner, product_id),
            }
        };

        await_outcome(receiver).await
    }

    /// Resolves a batch of ids against the cache in one partitioning pass,
    /// then fetches whatever is left in `max_batch_size` chunks. Products
    /// that fail to resolve are absent from the result map; only cache
    /// corruption is an error.
    pub async fn get_batch(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductMetadata>, CacheError> {
        let now = self.clock.now();
        let mut found = HashMap::new();
        let mut waiters = Vec::new();

        {
            let mut inner = self.inner.lock().await;
            let mut seen = HashSet::new();
            let mut to_fetch = Vec::new();

            for product_id in product_ids {
                if !seen.insert(product_id.clone()) {
                    continue;
                }
                match inner.lookup(product_id, now, self.config.ttl)? {
                    Lookup::Fresh(metadata) => {
                        found.insert(product_id.clone(), metadata);
                    }
                    Lookup::InFlight(receiver) => waiters.push((product_id.clone(), receiver)),
                    Lookup::Absent => to_fetch.push(product_id.clone()),
                }
            }

            for chunk in to_fetch.chunks(self.config.max_batch_size.max(1)) {
                let receivers = self.spawn_chunk_fetch(&mut inner, chunk);
                waiters.extend(chunk.iter().cloned().zip(receivers));
            }
        }

        for (product_id, receiver) in waiters {
            match await_outcome(receiver).await {
                Ok(metadata) => {
                    found.insert(product_id, metadata);
                }
                Err(CacheError::Fetch(_)) => {}
                Err(corrupted) => return Err(corrupted),
            }
        }

        Ok(found)
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    pub async fn entry_count(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Proactive sweep of expired entries; returns how many were dropped.
    /// Routine eviction stays lazy, this exists for operators who want to
    /// reclaim memory without waiting for the next access.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.config.ttl;
        let mut inner = self.inner.lock().await;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| now - entry.fetched_at < ttl);
        let removed = before - inner.entries.len();
        inner.stats.evictions += removed as u64;
        removed
    }

    fn spawn_fetch(
        &self,
        inner: &mut CacheInner,
        product_id: &ProductId,
    ) -> watch::Receiver<Option<FetchOutcome>> {
        let (sender, receiver) = watch::channel(None);
        inner.inflight.insert(product_id.clone(), receiver.clone());

        let fetcher = Arc::clone(&self.fetcher);
        let shared = Arc::clone(&self.inner);
        let clock = Arc::clone(&self.clock);
        let limit = self.config.fetch_timeout;
        let product_id = product_id.clone();

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(limit, fetcher.fetch(&product_id)).await {
                Ok(result) => result,
                Err(_) => Err(CatalogError::Timeout { limit }),
            };

            {
                let mut inner = shared.lock().await;
                match &outcome {
                    Ok(metadata) => {
                        inner.entries.insert(
                            product_id.clone(),
                            CacheEntry { metadata: metadata.clone(), fetched_at: clock.now() },
                        );
                        inner.stats.loads += 1;
                    }
                    Err(error) => {
                        inner.stats.failures += 1;
                        warn!(product_id = %product_id, error = %error, "catalog fetch failed");
                    }
                }
                inner.inflight.remove(&product_id);
            }

            sender.send_replace(Some(outcome));
        });

        receiver
    }

    fn spawn_chunk_fetch(
        &self,
        inner: &mut CacheInner,
        chunk: &[ProductId],
    ) -> Vec<watch::Receiver<Option<FetchOutcome>>> {
        let mut senders = Vec::with_capacity(chunk.len());
        let mut receivers = Vec::with_capacity(chunk.len());
        for product_id in chunk {
            let (sender, receiver) = watch::channel(None);
            inner.inflight.insert(product_id.clone(), receiver.clone());
            senders.push(sender);
            receivers.push(receiver);
        }

        let fetcher = Arc::clone(&self.fetcher);
        let shared = Arc::clone(&self.inner);
        let clock = Arc::clone(&self.clock);
        let limit = self.config.fetch_timeout;
        let chunk = chunk.to_vec();

        tokio::spawn(async move {
            let result = match tokio::time::timeout(limit, fetcher.fetch_batch(&chunk)).await {
                Ok(result) => result,
                Err(_) => Err(CatalogError::Timeout { limit }),
            };

            let mut outcomes: Vec<FetchOutcome> = Vec::with_capacity(chunk.len());
            {
                let mut inner = shared.lock().await;
                match result {
                    Ok(mut fetched) => {
                        for product_id in &chunk {
                            match fetched.remove(product_id) {
                                Some(metadata) => {
                                    inner.entries.insert(
                                        product_id.clone(),
                                        CacheEntry {
                                            metadata: metadata.clone(),
                                            fetched_at: clock.now(),
                                        },
                                    );
                                    inner.stats.loads += 1;
                                    outcomes.push(Ok(metadata));
                                }
                                None => {
                                    inner.stats.failures += 1;
                                    outcomes.push(Err(CatalogError::NotFound));
                                }
                            }
                        }
                    }
                    Err(error) => {
                        warn!(
                            products = chunk.len(),
                            error = %error,
                            "catalog batch fetch failed",
                        );
                        inner.stats.failures += chunk.len() as u64;
                        outcomes.extend(chunk.iter().map(|_| Err(error.clone())));
                    }
                }
                for product_id in &chunk {
                    inner.inflight.remove(product_id);
                }
            }

            for (sender, outcome) in senders.into_iter().zip(outcomes) {
                sender.send_replace(Some(outcome));
            }
        });

        receivers
    }
}

async fn await_outcome(
    mut receiver: watch::Receiver<Option<FetchOutcome>>,
) -> Result<ProductMetadata, CacheError> {
    loop {
        if let Some(outcome) = receiver.borrow_and_update().clone() {
            return outcome.map_err(CacheError::Fetch);
        }
        if receiver.changed().await.is_err() {
            return Err(CacheError::Corrupted(
                "catalog fetch task stopped without reporting an outcome".to_string(),
            ));
        }
    }
}

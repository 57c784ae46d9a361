// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Offset-based incremental loading for infinite-scroll lists.
//!
//! A [`PaginatedFeed`] owns the accumulated items of one list and pulls
//! further pages from a [`PageFetcher`] whenever the UI asks for more
//! (typically when a sentinel row scrolls into view). The controller knows
//! nothing about visibility; it only guarantees that:
//!
//! - at most one fetch is in flight per feed, however often `load_more`
//!   is called;
//! - a short page marks the feed exhausted for good;
//! - a failed fetch leaves items and offset untouched;
//! - a response that arrives after a `refresh` is dropped;
//! - a `load_more` future dropped mid-fetch does not block later loads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, FetchError, Result};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Retrieves one page of items.
///
/// Implementations must return fewer than `limit` items only when the
/// underlying list has truly run out, and must report transport or query
/// failures as errors rather than empty pages.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<T>>;
}

/// Feed settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: usize,
    /// Give up on a fetch after this long; `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: None,
        }
    }
}

/// One fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage<T> {
    pub items: Vec<T>,
    pub requested_limit: usize,
    pub offset: usize,
}

impl<T> FeedPage<T> {
    /// A page shorter than requested is the only end-of-list signal.
    pub fn is_last(&self) -> bool {
        self.items.len() < self.requested_limit
    }
}

/// Where a feed is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    /// Last fetch failed; the next `load_more` retries.
    Errored,
    /// A short page was received; only `refresh` leaves this state.
    Exhausted,
}

/// What a `load_more` or `refresh` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was appended.
    Loaded { items: usize, exhausted: bool },
    /// Another fetch was already in flight; nothing was requested.
    InFlight,
    /// The feed is exhausted; nothing was requested.
    Exhausted,
    /// The fetch failed and the error was recorded.
    Failed,
    /// The feed was refreshed while this fetch was in flight, so its
    /// result was dropped.
    Stale,
}

/// Snapshot of a feed's state.
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    pub accumulated: Vec<T>,
    pub next_offset: usize,
    pub is_loading: bool,
    pub has_more: bool,
    pub last_error: Option<Arc<FetchError>>,
}

struct FeedInner<T> {
    accumulated: Vec<T>,
    next_offset: usize,
    phase: FeedPhase,
    last_error: Option<Arc<FetchError>>,
    /// Bumped on every refresh; a fetch only applies if it still matches.
    generation: u64,
}

/// Incremental loader backing one infinite-scroll list.
pub struct PaginatedFeed<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    config: FeedConfig,
    inner: Mutex<FeedInner<T>>,
}

impl<T: Send + 'static> PaginatedFeed<T> {
    /// Create an empty, idle feed. Nothing is fetched until `load_more`.
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, config: FeedConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(Error::precondition("feed page size must be at least 1"));
        }
        Ok(Self {
            fetcher,
            config,
            inner: Mutex::new(FeedInner {
                accumulated: Vec::new(),
                next_offset: 0,
                phase: FeedPhase::Idle,
                last_error: None,
                generation: 0,
            }),
        })
    }

    /// Create a feed and perform its initial load.
    ///
    /// A failed initial load is recorded in `last_error` like any other
    /// fetch failure; the feed is still returned.
    pub async fn mount(fetcher: Arc<dyn PageFetcher<T>>, config: FeedConfig) -> Result<Self> {
        let feed = Self::new(fetcher, config)?;
        let needs_initial_load = {
            let inner = feed.lock();
            inner.accumulated.is_empty() && inner.phase != FeedPhase::Loading
        };
        if needs_initial_load {
            feed.load_more().await;
        }
        Ok(feed)
    }

    /// Fetch and append the next page.
    ///
    /// Returns immediately without fetching while another load is in flight
    /// or once the feed is exhausted, so redundant triggers are harmless.
    pub async fn load_more(&self) -> LoadOutcome {
        let (generation, offset) = {
            let mut inner = self.lock();
            match inner.phase {
                FeedPhase::Loading => {
                    tracing::trace!("load_more ignored: fetch already in flight");
                    return LoadOutcome::InFlight;
                }
                FeedPhase::Exhausted => {
                    tracing::trace!("load_more ignored: feed exhausted");
                    return LoadOutcome::Exhausted;
                }
                FeedPhase::Idle | FeedPhase::Errored => {}
            }
            inner.phase = FeedPhase::Loading;
            (inner.generation, inner.next_offset)
        };
        let mut pending = PendingLoad {
            feed: self,
            generation,
            settled: false,
        };

        let limit = self.config.page_size;
        tracing::debug!(offset, limit, generation, "Fetching feed page");
        let result = self.fetch_page(limit, offset).await;
        pending.settled = true;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                offset,
                generation,
                current_generation = inner.generation,
                "Dropping page fetched before refresh"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(items) => {
                let page = FeedPage {
                    items,
                    requested_limit: limit,
                    offset,
                };
                let returned = page.items.len();
                let exhausted = page.is_last();

                inner.accumulated.extend(page.items);
                inner.next_offset += returned;
                inner.last_error = None;
                inner.phase = if exhausted {
                    FeedPhase::Exhausted
                } else {
                    FeedPhase::Idle
                };

                tracing::debug!(
                    offset,
                    returned,
                    total = inner.accumulated.len(),
                    exhausted,
                    "Feed page loaded"
                );
                LoadOutcome::Loaded {
                    items: returned,
                    exhausted,
                }
            }
            Err(err) => {
                tracing::warn!(offset, limit, error = %err, "Feed page fetch failed");
                inner.last_error = Some(Arc::new(err));
                inner.phase = FeedPhase::Errored;
                LoadOutcome::Failed
            }
        }
    }

    /// Discard everything and load the first page again.
    ///
    /// Safe to call mid-load: the in-flight fetch still completes but its
    /// result is dropped.
    pub async fn refresh(&self) -> LoadOutcome {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.accumulated.clear();
            inner.next_offset = 0;
            inner.phase = FeedPhase::Idle;
            inner.last_error = None;
            tracing::debug!(generation = inner.generation, "Feed refreshed");
        }
        self.load_more().await
    }

    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> std::result::Result<Vec<T>, FetchError> {
        let fetch = self.fetcher.fetch(limit, offset);
        match self.config.fetch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch)
                .await
                .map_err(|_| FetchError::Timeout(timeout))?
                .map_err(FetchError::Source),
            None => fetch.await.map_err(FetchError::Source),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == FeedPhase::Loading
    }

    pub fn has_more(&self) -> bool {
        self.phase() != FeedPhase::Exhausted
    }

    pub fn len(&self) -> usize {
        self.lock().accumulated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn next_offset(&self) -> usize {
        self.lock().next_offset
    }

    pub fn last_error(&self) -> Option<Arc<FetchError>> {
        self.lock().last_error.clone()
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Borrow the accumulated items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.lock().accumulated)
    }
}

impl<T> PaginatedFeed<T> {
    fn lock(&self) -> MutexGuard<'_, FeedInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts a feed back to `Idle` when a `load_more` future is dropped before
/// its fetch returns, so the abandoned load does not block later ones.
struct PendingLoad<'a, T> {
    feed: &'a PaginatedFeed<T>,
    generation: u64,
    settled: bool,
}

impl<T> Drop for PendingLoad<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.feed.lock();
        if inner.generation == self.generation && inner.phase == FeedPhase::Loading {
            tracing::debug!(generation = self.generation, "Feed load cancelled mid-fetch");
            inner.phase = FeedPhase::Idle;
        }
    }
}

impl<T: Clone + Send + 'static> PaginatedFeed<T> {
    pub fn snapshot(&self) -> FeedState<T> {
        let inner = self.lock();
        FeedState {
            accumulated: inner.accumulated.clone(),
            next_offset: inner.next_offset,
            is_loading: inner.phase == FeedPhase::Loading,
            has_more: inner.phase != FeedPhase::Exhausted,
            last_error: inner.last_error.clone(),
        }
    }
}

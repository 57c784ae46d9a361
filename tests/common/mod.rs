// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use fitlog::db::{Direction, FilterOp, TableQuery, TableRequest};
use fitlog::{DayKey, PageFetcher};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Parse a `YYYY-MM-DD` literal.
#[allow(dead_code)]
pub fn key(s: &str) -> DayKey {
    s.parse().expect("test day key")
}

/// Fetcher that serves `0..total` and counts its calls.
#[allow(dead_code)]
pub struct CountingFetcher {
    total: usize,
    calls: AtomicUsize,
    fail_next: AtomicBool,
    requests: Mutex<Vec<(usize, usize)>>,
}

#[allow(dead_code)]
impl CountingFetcher {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next fetch fail once.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// `(limit, offset)` of every fetch so far.
    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher<usize> for CountingFetcher {
    async fn fetch(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<usize>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((limit, offset));
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        // Yield so concurrent callers get a chance to observe the Loading state.
        tokio::task::yield_now().await;
        Ok((offset..self.total.min(offset + limit)).collect())
    }
}

/// Fetcher that returns pre-scripted page sizes, ignoring the limit.
#[allow(dead_code)]
pub struct ScriptedFetcher {
    pages: Mutex<Vec<usize>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new(page_sizes: &[usize]) -> Self {
        Self {
            pages: Mutex::new(page_sizes.iter().rev().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher<String> for ScriptedFetcher {
    async fn fetch(&self, _limit: usize, offset: usize) -> anyhow::Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let size = self.pages.lock().unwrap().pop().unwrap_or(0);
        Ok((offset..offset + size).map(|i| format!("item-{}", i)).collect())
    }
}

/// Fetcher whose first call blocks until released; later calls return
/// immediately. Items are tagged with the call number that produced them.
#[allow(dead_code)]
pub struct GatedFetcher {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
    fail_first: bool,
}

#[allow(dead_code)]
impl GatedFetcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
            fail_first: false,
        }
    }

    /// Like `new`, but the gated first call fails once released.
    pub fn failing_first() -> Self {
        Self {
            fail_first: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until the first (gated) fetch has started.
    pub async fn first_started(&self) {
        self.started.notified().await;
    }

    /// Let the first fetch complete.
    pub fn release_first(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl PageFetcher<String> for GatedFetcher {
    async fn fetch(&self, limit: usize, offset: usize) -> anyhow::Result<Vec<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            self.started.notify_one();
            self.release.notified().await;
            if self.fail_first {
                anyhow::bail!("gateway timeout");
            }
        }
        Ok((offset..offset + limit)
            .map(|i| format!("call{}-{}", call, i))
            .collect())
    }
}

/// In-memory stand-in for the hosted backend.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryTables {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    fail: AtomicBool,
}

#[allow(dead_code)]
impl MemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.as_str().unwrap_or("").cmp(b.as_str().unwrap_or("")),
    }
}

#[async_trait]
impl TableQuery for MemoryTables {
    async fn select(&self, request: &TableRequest) -> anyhow::Result<Vec<Value>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("backend unavailable");
        }
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(&request.table)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| {
                request.filters.iter().all(|f| {
                    let ord = compare_values(&row[&f.field], &f.value);
                    match f.op {
                        FilterOp::Eq => row[&f.field] == f.value,
                        FilterOp::Gt => ord.is_gt(),
                        FilterOp::Gte => ord.is_ge(),
                        FilterOp::Lt => ord.is_lt(),
                        FilterOp::Lte => ord.is_le(),
                    }
                })
            })
            .collect();

        if let Some((field, direction)) = &request.order_by {
            rows.sort_by(|a, b| {
                let ord = compare_values(&a[field], &b[field]);
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        let limit = request.limit.unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(request.offset).take(limit).collect())
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feeds bound to backend tables.

use fitlog::db::{collections, TableFetcher};
use fitlog::models::MealLog;
use fitlog::services::{FeedConfig, FeedPhase, PaginatedFeed};
use fitlog::{FetchError, PageFetcher};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::MemoryTables;

fn seed_meals(tables: &MemoryTables, user_id: &str, count: u32) {
    for i in 0..count {
        tables.insert(
            collections::MEAL_LOGS,
            json!({
                "id": format!("{}-{}", user_id, i),
                "user_id": user_id,
                "logged_at": format!("2024-05-{:02}T12:00:00Z", i + 1),
                "name": format!("Meal {}", i),
                "calories": 500.0,
                "protein_g": 30.0
            }),
        );
    }
}

#[tokio::test]
async fn test_meal_feed_pages_newest_first() {
    let tables = Arc::new(MemoryTables::new());
    seed_meals(&tables, "alice", 12);
    seed_meals(&tables, "bob", 4);

    let fetcher = Arc::new(TableFetcher::<MealLog>::meal_logs(tables.clone(), "alice"));
    let config = FeedConfig {
        page_size: 5,
        fetch_timeout: None,
    };
    let feed = PaginatedFeed::<MealLog>::mount(fetcher, config).await.unwrap();
    assert_eq!(feed.len(), 5);

    feed.load_more().await;
    feed.load_more().await;

    assert_eq!(feed.phase(), FeedPhase::Exhausted);
    let ids: Vec<String> = feed.with_items(|meals| meals.iter().map(|m| m.id.clone()).collect());
    assert_eq!(ids.len(), 12);
    assert_eq!(ids.first().map(String::as_str), Some("alice-11"));
    assert_eq!(ids.last().map(String::as_str), Some("alice-0"));
    // Missing macro columns default to zero.
    feed.with_items(|meals| assert_eq!(meals[0].carbs_g, 0.0));
}

#[tokio::test]
async fn test_backend_failure_surfaces_as_fetch_error() {
    let tables = Arc::new(MemoryTables::new());
    seed_meals(&tables, "alice", 3);
    tables.set_failing(true);

    let fetcher = Arc::new(TableFetcher::<MealLog>::meal_logs(tables.clone(), "alice"));
    let feed = PaginatedFeed::<MealLog>::mount(fetcher, FeedConfig::default())
        .await
        .unwrap();

    let err = feed.last_error().expect("error recorded");
    assert!(matches!(*err, FetchError::Source(_)));
    assert!(feed.is_empty());

    tables.set_failing(false);
    feed.load_more().await;
    assert_eq!(feed.len(), 3);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn test_undecodable_row_is_an_error() {
    let tables = Arc::new(MemoryTables::new());
    tables.insert(
        collections::MEAL_LOGS,
        json!({ "id": "x", "user_id": "alice", "logged_at": "yesterday", "name": "?" }),
    );

    let fetcher = TableFetcher::<MealLog>::meal_logs(tables, "alice");
    let err = fetcher.fetch(10, 0).await.unwrap_err();

    assert!(format!("{:#}", err).contains("could not be decoded"));
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitlog: aggregation and incremental loading for a fitness and
//! nutrition tracker.
//!
//! This crate holds the logic behind the dashboard widgets: logging
//! streaks, the activity heatmap, week-over-week comparisons and the
//! paginated feeds behind the meal and workout history lists. Rendering
//! and the backend client stay with the caller; rows come in already
//! fetched and pages come in through a [`PageFetcher`].

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

pub use error::{Error, FetchError, Result};
pub use services::PageFetcher;
pub use time_utils::{days_between, DayKey};

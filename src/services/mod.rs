// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - aggregation and loading logic consumed by the UI.

pub mod activity_level;
pub mod feed;
pub mod macros;
pub mod period;
pub mod streak;

pub use activity_level::{
    level_for_count, ActivityHeatmap, ActivityRecord, ActivityWeights, DailyActivity, DailyCounts,
};
pub use feed::{FeedConfig, FeedPage, FeedPhase, FeedState, LoadOutcome, PageFetcher, PaginatedFeed};
pub use macros::MacroBreakdown;
pub use period::{
    classify, percent_change, MetricComparison, MetricRow, MetricSpec, PeriodComparator,
    PeriodStats, Trend, WeekWindow, WeeklyComparison,
};
pub use streak::{ActiveDays, StreakCalculator, StreakState, StreakSummary};

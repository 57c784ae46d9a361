// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heatmap intensity levels over a trailing window of days.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{Error, Result};
use crate::time_utils::DayKey;

/// Default trailing window for the activity heatmap.
pub const DEFAULT_WINDOW_DAYS: usize = 90;

/// Highest intensity level.
pub const MAX_LEVEL: u8 = 4;

/// How much a single logged item counts toward a day's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWeights {
    pub meal: u32,
    pub workout: u32,
}

impl Default for ActivityWeights {
    fn default() -> Self {
        Self {
            meal: 1,
            workout: 2,
        }
    }
}

impl ActivityWeights {
    /// Both weights must be at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.meal == 0 || self.workout == 0 {
            return Err(Error::precondition(format!(
                "activity weights must be >= 1 (meal={}, workout={})",
                self.meal, self.workout
            )));
        }
        Ok(())
    }
}

/// One unit of logged activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRecord {
    pub day: DayKey,
    pub weight: u32,
}

/// Weighted activity count per day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyCounts(BTreeMap<DayKey, u32>);

impl DailyCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum record weights per day. A zero weight is rejected rather than
    /// silently ignored.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let mut counts = Self::new();
        for record in records {
            counts.add(record)?;
        }
        Ok(counts)
    }

    pub fn add(&mut self, record: ActivityRecord) -> Result<()> {
        if record.weight == 0 {
            return Err(Error::precondition(format!(
                "activity record on {} has zero weight",
                record.day
            )));
        }
        let count = self.0.entry(record.day).or_insert(0);
        *count = count.saturating_add(record.weight);
        Ok(())
    }

    pub fn get(&self, day: DayKey) -> u32 {
        self.0.get(&day).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DayKey, u32)> for DailyCounts {
    fn from_iter<I: IntoIterator<Item = (DayKey, u32)>>(iter: I) -> Self {
        DailyCounts(iter.into_iter().collect())
    }
}

/// Map a weighted daily count to an intensity level in `0..=4`.
///
/// Thresholds: 0 → 0, 1–2 → 1, 3–4 → 2, 5–7 → 3, 8+ → 4.
pub fn level_for_count(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=7 => 3,
        _ => MAX_LEVEL,
    }
}

/// Bucketed view of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyActivity {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub day: DayKey,
    pub count: u32,
    pub level: u8,
}

/// Fixed-length trailing window of daily activity, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityHeatmap {
    pub days: Vec<DailyActivity>,
    pub active_day_count: u32,
}

impl ActivityHeatmap {
    /// Build exactly `window_days` entries covering
    /// `[end - (window_days - 1), end]`. Days without activity get count 0.
    pub fn build(counts: &DailyCounts, window_days: usize, end: DayKey) -> Result<Self> {
        if window_days == 0 {
            return Err(Error::precondition("heatmap window must cover at least one day"));
        }
        let span = i64::try_from(window_days - 1).map_err(|_| {
            Error::precondition(format!("heatmap window {} is too large", window_days))
        })?;
        let start = end.add_days(-span)?;

        let mut days = Vec::with_capacity(window_days);
        let mut day = start;
        for offset in 0..window_days {
            if offset > 0 {
                day = day.add_days(1)?;
            }
            let count = counts.get(day);
            days.push(DailyActivity {
                day,
                count,
                level: level_for_count(count),
            });
        }

        let active_day_count = days.iter().filter(|d| d.count > 0).count() as u32;
        Ok(Self {
            days,
            active_day_count,
        })
    }

    pub fn window_days(&self) -> usize {
        self.days.len()
    }

    /// Share of days in the window with any activity, in percent.
    pub fn active_percentage(&self) -> f64 {
        if self.days.is_empty() {
            return 0.0;
        }
        self.active_day_count as f64 / self.days.len() as f64 * 100.0
    }

    /// [`active_percentage`](Self::active_percentage) rounded for display.
    pub fn active_percentage_display(&self) -> u32 {
        self.active_percentage().round() as u32
    }

    /// Sum of weighted counts across the window.
    pub fn total_count(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }

    /// Day with the highest count; the earliest one wins ties. `None` when
    /// the window has no activity at all.
    pub fn busiest_day(&self) -> Option<&DailyActivity> {
        self.days
            .iter()
            .filter(|d| d.count > 0)
            .fold(None, |best: Option<&DailyActivity>, d| match best {
                Some(b) if b.count >= d.count => Some(b),
                _ => Some(d),
            })
    }

    /// Split into calendar-week columns that each begin on `week_start`.
    ///
    /// The first column holds only the days before the first `week_start` in
    /// the window and the last column stops at the final day, so either may
    /// be shorter than seven.
    pub fn weeks(&self, week_start: Weekday) -> Vec<&[DailyActivity]> {
        let Some(first) = self.days.first() else {
            return Vec::new();
        };
        let lead = ((7 - first.day.days_into_week(week_start)) % 7) as usize;
        let (head, rest) = self.days.split_at(lead.min(self.days.len()));

        let mut columns = Vec::with_capacity(rest.len() / 7 + 2);
        if !head.is_empty() {
            columns.push(head);
        }
        columns.extend(rest.chunks(7));
        columns
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day streaks over sparse activity days.
//!
//! The same calculation backs the meal streak, the workout streak and the
//! combined "logged anything" streak; callers only choose which set of days
//! to feed in.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::time_utils::DayKey;

/// Deduplicated set of days on which something was logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveDays(HashSet<DayKey>);

impl ActiveDays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from raw timestamps, normalised to days in `tz`.
    pub fn from_instants<I>(instants: I, tz: Tz) -> Result<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        instants
            .into_iter()
            .map(|instant| DayKey::from_instant(instant, tz))
            .collect()
    }

    /// Returns `true` if the day was not already present.
    pub fn insert(&mut self, day: DayKey) -> bool {
        self.0.insert(day)
    }

    pub fn contains(&self, day: DayKey) -> bool {
        self.0.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Days active in either set.
    pub fn union(&self, other: &ActiveDays) -> ActiveDays {
        ActiveDays(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<DayKey> for ActiveDays {
    fn from_iter<I: IntoIterator<Item = DayKey>>(iter: I) -> Self {
        ActiveDays(iter.into_iter().collect())
    }
}

impl Extend<DayKey> for ActiveDays {
    fn extend<I: IntoIterator<Item = DayKey>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Current streak length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub length: u32,
}

/// Streaks shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    /// Consecutive days with at least one meal logged
    pub meals: u32,
    /// Consecutive days with at least one workout
    pub workouts: u32,
    /// Consecutive days with either
    pub combined: u32,
    /// Longest combined run ever recorded
    pub longest_combined: u32,
}

/// Computes streaks relative to a fixed "today".
#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    today: DayKey,
}

impl StreakCalculator {
    pub fn new(today: DayKey) -> Self {
        Self { today }
    }

    /// Convenience constructor using the current day in `tz`.
    pub fn for_today(tz: Tz) -> Self {
        Self::new(DayKey::today(tz))
    }

    pub fn today(&self) -> DayKey {
        self.today
    }

    /// Length of the run of active days ending today or yesterday.
    ///
    /// An inactive today is tolerated as long as yesterday was active (the
    /// user may simply not have logged yet); two missing days reset the
    /// streak to zero. Walks backward with set lookups, so the cost is
    /// proportional to the streak length rather than the history size.
    pub fn current(&self, days: &ActiveDays) -> StreakState {
        let start = if days.contains(self.today) {
            self.today
        } else {
            match self.today.pred() {
                Some(yesterday) if days.contains(yesterday) => yesterday,
                _ => return StreakState::default(),
            }
        };

        let mut length = 0;
        let mut cursor = Some(start);
        while let Some(day) = cursor.filter(|day| days.contains(*day)) {
            length += 1;
            cursor = day.pred();
        }
        StreakState { length }
    }

    /// Longest run of consecutive active days anywhere in the history.
    pub fn longest(days: &ActiveDays) -> u32 {
        let mut sorted: Vec<DayKey> = days.iter().collect();
        sorted.sort_unstable();

        let mut best = 0;
        let mut run = 0;
        let mut previous: Option<DayKey> = None;
        for day in sorted {
            run = match previous.and_then(DayKey::succ) {
                Some(expected) if expected == day => run + 1,
                _ => 1,
            };
            best = best.max(run);
            previous = Some(day);
        }
        best
    }

    /// Meal, workout and combined streaks from the two day sets.
    pub fn summarize(&self, meal_days: &ActiveDays, workout_days: &ActiveDays) -> StreakSummary {
        let combined = meal_days.union(workout_days);
        StreakSummary {
            meals: self.current(meal_days).length,
            workouts: self.current(workout_days).length,
            combined: self.current(&combined).length,
            longest_combined: Self::longest(&combined),
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week-over-week comparison of nutrition and training metrics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Weekday;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{Error, Result};
use crate::time_utils::DayKey;

/// Changes smaller than this many percent are reported as no change.
pub const NO_CHANGE_DEADBAND_PERCENT: f64 = 1.0;

/// Metric names shared by the row models and the comparator.
pub mod metrics {
    pub const CALORIES: &str = "calories";
    pub const PROTEIN: &str = "protein";
    pub const SESSIONS: &str = "sessions";
    pub const VOLUME: &str = "volume";
}

/// Named metric values contributed by one logged row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub day: DayKey,
    pub values: BTreeMap<String, f64>,
}

impl MetricRow {
    pub fn new(day: DayKey) -> Self {
        Self {
            day,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, metric: &str, value: f64) -> Self {
        self.values.insert(metric.to_string(), value);
        self
    }
}

/// Seven consecutive days starting on the configured week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: DayKey,
    pub end: DayKey,
}

impl WeekWindow {
    /// The week containing `reference`.
    pub fn current(reference: DayKey, week_start: Weekday) -> Result<Self> {
        let into_week = reference.days_into_week(week_start);
        Self::starting(reference.add_days(-i64::from(into_week))?)
    }

    /// The seven days immediately before this window.
    pub fn previous(&self) -> Result<Self> {
        Self::starting(self.start.add_days(-7)?)
    }

    fn starting(start: DayKey) -> Result<Self> {
        Ok(Self {
            start,
            end: start.add_days(6)?,
        })
    }

    pub fn contains(&self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }

    /// All seven days, oldest first.
    pub fn days(&self) -> Vec<DayKey> {
        let mut days = Vec::with_capacity(7);
        let mut cursor = Some(self.start);
        while let Some(day) = cursor.filter(|d| *d <= self.end) {
            days.push(day);
            cursor = day.succ();
        }
        days
    }
}

/// Metric totals over one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Primary metric total divided by `sample_days`
    pub avg_primary: f64,
    pub totals: BTreeMap<String, f64>,
    /// Days in the window with at least one value for the primary metric
    pub sample_days: u32,
    /// Days in the window with at least one value, per metric
    pub metric_days: BTreeMap<String, u32>,
}

impl PeriodStats {
    /// Sum every metric over the rows that fall inside `window`.
    ///
    /// Averages divide by the number of days that actually carry the metric,
    /// not by the window length: calories logged on three days average over
    /// three, even if workouts were logged on a fourth.
    pub fn aggregate<'a, I>(window: &WeekWindow, rows: I, primary: &str) -> Result<Self>
    where
        I: IntoIterator<Item = &'a MetricRow>,
    {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut days: BTreeMap<String, BTreeSet<DayKey>> = BTreeMap::new();

        for row in rows.into_iter().filter(|r| window.contains(r.day)) {
            for (metric, value) in &row.values {
                if !value.is_finite() || *value < 0.0 {
                    return Err(Error::precondition(format!(
                        "metric '{}' on {} has invalid value {}",
                        metric, row.day, value
                    )));
                }
                *totals.entry(metric.clone()).or_insert(0.0) += value;
                days.entry(metric.clone()).or_default().insert(row.day);
            }
        }

        let metric_days: BTreeMap<String, u32> = days
            .into_iter()
            .map(|(metric, set)| (metric, set.len() as u32))
            .collect();
        let mut stats = Self {
            avg_primary: 0.0,
            totals,
            sample_days: 0,
            metric_days,
        };
        stats.sample_days = stats.days_with(primary);
        stats.avg_primary = stats.average(primary);
        Ok(stats)
    }

    pub fn total(&self, metric: &str) -> f64 {
        self.totals.get(metric).copied().unwrap_or(0.0)
    }

    /// Number of days in the window on which `metric` was logged.
    pub fn days_with(&self, metric: &str) -> u32 {
        self.metric_days.get(metric).copied().unwrap_or(0)
    }

    /// Per-logged-day average of `metric`; zero when it was never logged.
    pub fn average(&self, metric: &str) -> f64 {
        match self.days_with(metric) {
            0 => 0.0,
            days => self.total(metric) / f64::from(days),
        }
    }
}

/// Relative change from `previous` to `current`, in percent.
///
/// A zero baseline reports 100 for any growth and 0 otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Direction of a change, judged against whether the metric should grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Trend {
    Improved,
    Worse,
    NoChange,
}

pub fn classify(percent_change: f64, higher_is_better: bool) -> Trend {
    if percent_change.abs() < NO_CHANGE_DEADBAND_PERCENT {
        Trend::NoChange
    } else if (percent_change > 0.0) == higher_is_better {
        Trend::Improved
    } else {
        Trend::Worse
    }
}

/// Which figure of a [`PeriodStats`] a metric is compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Total divided by logged days (calories/day, protein/day)
    DailyAverage,
    /// Raw total over the window (sessions, volume)
    Total,
}

/// A metric to compare and the direction that counts as progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub basis: Basis,
    pub higher_is_better: bool,
}

impl MetricSpec {
    pub const CALORIES: MetricSpec = MetricSpec {
        name: metrics::CALORIES,
        basis: Basis::DailyAverage,
        higher_is_better: false,
    };
    pub const PROTEIN: MetricSpec = MetricSpec {
        name: metrics::PROTEIN,
        basis: Basis::DailyAverage,
        higher_is_better: true,
    };
    pub const SESSIONS: MetricSpec = MetricSpec {
        name: metrics::SESSIONS,
        basis: Basis::Total,
        higher_is_better: true,
    };
    pub const VOLUME: MetricSpec = MetricSpec {
        name: metrics::VOLUME,
        basis: Basis::Total,
        higher_is_better: true,
    };

    fn value(&self, stats: &PeriodStats) -> f64 {
        match self.basis {
            Basis::DailyAverage => stats.average(self.name),
            Basis::Total => stats.total(self.name),
        }
    }
}

/// One metric compared across two windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MetricComparison {
    pub metric: String,
    pub current: f64,
    pub previous: f64,
    pub percent_change: f64,
    pub trend: Trend,
}

/// Result of [`PeriodComparator::weekly`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    pub current_window: WeekWindow,
    pub previous_window: WeekWindow,
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub metrics: Vec<MetricComparison>,
}

/// Compares a fixed set of metrics between adjacent periods.
#[derive(Debug, Clone)]
pub struct PeriodComparator {
    specs: Vec<MetricSpec>,
}

impl Default for PeriodComparator {
    /// Nutrition and training metrics shown on the progress page.
    fn default() -> Self {
        Self::new(vec![
            MetricSpec::CALORIES,
            MetricSpec::PROTEIN,
            MetricSpec::SESSIONS,
            MetricSpec::VOLUME,
        ])
    }
}

impl PeriodComparator {
    pub fn new(specs: Vec<MetricSpec>) -> Self {
        Self { specs }
    }

    pub fn compare(&self, current: &PeriodStats, previous: &PeriodStats) -> Vec<MetricComparison> {
        self.specs
            .iter()
            .map(|spec| {
                let (now, before) = (spec.value(current), spec.value(previous));
                let change = percent_change(now, before);
                MetricComparison {
                    metric: spec.name.to_string(),
                    current: now,
                    previous: before,
                    percent_change: change,
                    trend: classify(change, spec.higher_is_better),
                }
            })
            .collect()
    }

    /// Window, aggregate and compare in one step.
    ///
    /// The current week runs from the latest `week_start` through
    /// `reference`; rows dated after `reference` are ignored.
    pub fn weekly(
        &self,
        rows: &[MetricRow],
        reference: DayKey,
        week_start: Weekday,
        primary: &str,
    ) -> Result<WeeklyComparison> {
        let current_window = WeekWindow::current(reference, week_start)?;
        let previous_window = current_window.previous()?;

        let current = PeriodStats::aggregate(
            &current_window,
            rows.iter().filter(|r| r.day <= reference),
            primary,
        )?;
        let previous = PeriodStats::aggregate(&previous_window, rows, primary)?;
        let metrics = self.compare(&current, &previous);

        Ok(WeeklyComparison {
            current_window,
            previous_window,
            current,
            previous,
            metrics,
        })
    }
}

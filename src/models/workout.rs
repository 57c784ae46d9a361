// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout session row as stored in the `workout_logs` table.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::activity_level::{ActivityRecord, ActivityWeights};
use crate::services::period::{metrics, MetricRow};
use crate::time_utils::DayKey;

/// One completed workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Row ID assigned by the backend
    pub id: String,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Workout name (e.g. "Push day")
    pub name: String,
    /// Session length in minutes
    #[serde(default)]
    pub duration_minutes: u32,
    /// Total lifted volume (sets × reps × weight) in kilograms
    #[serde(default)]
    pub volume_kg: f64,
}

impl WorkoutLog {
    /// Local calendar day the session started on.
    pub fn day(&self, tz: Tz) -> Result<DayKey> {
        DayKey::from_instant(self.started_at, tz)
    }

    pub fn activity_record(&self, tz: Tz, weights: &ActivityWeights) -> Result<ActivityRecord> {
        Ok(ActivityRecord {
            day: self.day(tz)?,
            weight: weights.workout,
        })
    }

    /// Training metrics contributed by this session: one session plus its volume.
    pub fn metric_row(&self, tz: Tz) -> Result<MetricRow> {
        Ok(MetricRow::new(self.day(tz)?)
            .with(metrics::SESSIONS, 1.0)
            .with(metrics::VOLUME, self.volume_kg))
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Meal log row as stored in the `meal_logs` table.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::activity_level::{ActivityRecord, ActivityWeights};
use crate::services::period::{metrics, MetricRow};
use crate::time_utils::DayKey;

/// One logged meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLog {
    /// Row ID assigned by the backend
    pub id: String,
    /// When the meal was logged
    pub logged_at: DateTime<Utc>,
    /// Free-form meal name
    pub name: String,
    /// Energy in kcal
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
}

impl MealLog {
    /// Local calendar day the meal belongs to.
    pub fn day(&self, tz: Tz) -> Result<DayKey> {
        DayKey::from_instant(self.logged_at, tz)
    }

    pub fn activity_record(&self, tz: Tz, weights: &ActivityWeights) -> Result<ActivityRecord> {
        Ok(ActivityRecord {
            day: self.day(tz)?,
            weight: weights.meal,
        })
    }

    /// Nutrition metrics contributed by this meal.
    pub fn metric_row(&self, tz: Tz) -> Result<MetricRow> {
        Ok(MetricRow::new(self.day(tz)?)
            .with(metrics::CALORIES, self.calories)
            .with(metrics::PROTEIN, self.protein_g))
    }
}

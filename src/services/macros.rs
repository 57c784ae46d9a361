// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Macronutrient calorie split.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{Error, Result};
use crate::models::MealLog;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Calories contributed by each macronutrient and their share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MacroBreakdown {
    pub protein_kcal: f64,
    pub carbs_kcal: f64,
    pub fat_kcal: f64,
    /// Whole-number display percentages (protein, carbs, fat). They add up
    /// to exactly 100 unless every macro is zero.
    pub percentages: [u32; 3],
}

impl MacroBreakdown {
    pub fn from_grams(protein_g: f64, carbs_g: f64, fat_g: f64) -> Result<Self> {
        for (name, grams) in [("protein", protein_g), ("carbs", carbs_g), ("fat", fat_g)] {
            if !grams.is_finite() || grams < 0.0 {
                return Err(Error::precondition(format!(
                    "{} grams must be a non-negative number, got {}",
                    name, grams
                )));
            }
        }

        let kcal = [
            protein_g * KCAL_PER_GRAM_PROTEIN,
            carbs_g * KCAL_PER_GRAM_CARBS,
            fat_g * KCAL_PER_GRAM_FAT,
        ];
        Ok(Self {
            protein_kcal: kcal[0],
            carbs_kcal: kcal[1],
            fat_kcal: kcal[2],
            percentages: largest_remainder_percentages(kcal),
        })
    }

    /// Breakdown over the summed macros of several meals.
    pub fn from_meals<'a, I>(meals: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a MealLog>,
    {
        let (protein, carbs, fat) = meals.into_iter().fold((0.0, 0.0, 0.0), |acc, m| {
            (acc.0 + m.protein_g, acc.1 + m.carbs_g, acc.2 + m.fat_g)
        });
        Self::from_grams(protein, carbs, fat)
    }

    pub fn total_kcal(&self) -> f64 {
        self.protein_kcal + self.carbs_kcal + self.fat_kcal
    }
}

/// Round shares down, then hand the leftover points to the largest
/// fractional parts so the result sums to 100.
fn largest_remainder_percentages(kcal: [f64; 3]) -> [u32; 3] {
    let total: f64 = kcal.iter().sum();
    if total <= 0.0 {
        return [0; 3];
    }

    let exact = kcal.map(|k| k / total * 100.0);
    let mut floors = exact.map(|e| e.floor() as u32);
    let assigned: u32 = floors.iter().sum();

    let mut order = [0usize, 1, 2];
    order.sort_by(|a, b| {
        let ra = exact[*a] - exact[*a].floor();
        let rb = exact[*b] - exact[*b].floor();
        rb.total_cmp(&ra)
    });
    for idx in order.iter().take(100u32.saturating_sub(assigned) as usize) {
        floors[*idx] += 1;
    }
    floors
}

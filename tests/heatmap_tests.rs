// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity heatmap tests.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use fitlog::models::{MealLog, WorkoutLog};
use fitlog::services::{level_for_count, ActivityHeatmap, ActivityWeights, DailyCounts};
use fitlog::{days_between, Error};

mod common;
use common::key;

#[test]
fn test_bucket_boundaries() {
    let counts = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
    let expected = [0, 1, 1, 2, 2, 3, 3, 3, 4, 4];
    for (count, level) in counts.iter().zip(expected) {
        assert_eq!(level_for_count(*count), level, "count {}", count);
    }
}

#[test]
fn test_window_is_complete_and_ordered() {
    let end = key("2024-03-31");
    let sparse: DailyCounts = [(key("2024-01-05"), 2), (key("2024-03-31"), 9)]
        .into_iter()
        .collect();

    for counts in [DailyCounts::new(), sparse] {
        let heatmap = ActivityHeatmap::build(&counts, 90, end).unwrap();

        assert_eq!(heatmap.days.len(), 90);
        assert_eq!(heatmap.days.last().unwrap().day, end);
        assert_eq!(days_between(heatmap.days[0].day, end), 89);
        for pair in heatmap.days.windows(2) {
            assert_eq!(days_between(pair[0].day, pair[1].day), 1);
        }
    }
}

#[test]
fn test_missing_days_are_zero() {
    let counts: DailyCounts = [(key("2024-03-30"), 5)].into_iter().collect();
    let heatmap = ActivityHeatmap::build(&counts, 3, key("2024-03-31")).unwrap();

    let levels: Vec<(u32, u8)> = heatmap.days.iter().map(|d| (d.count, d.level)).collect();
    assert_eq!(levels, vec![(0, 0), (5, 3), (0, 0)]);
}

#[test]
fn test_active_percentage() {
    let counts: DailyCounts = (0..30)
        .map(|i| (key("2024-03-31").add_days(-i).unwrap(), 1))
        .collect();
    let heatmap = ActivityHeatmap::build(&counts, 90, key("2024-03-31")).unwrap();

    assert_eq!(heatmap.active_day_count, 30);
    assert!((heatmap.active_percentage() - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(heatmap.active_percentage_display(), 33);
}

#[test]
fn test_meals_and_workouts_are_weighted() {
    let tz = Tz::UTC;
    let weights = ActivityWeights::default();
    let at = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

    let meal = MealLog {
        id: "m1".to_string(),
        logged_at: at,
        name: "Oats".to_string(),
        calories: 350.0,
        protein_g: 12.0,
        carbs_g: 60.0,
        fat_g: 6.0,
    };
    let workout = WorkoutLog {
        id: "w1".to_string(),
        started_at: at,
        name: "Legs".to_string(),
        duration_minutes: 55,
        volume_kg: 8200.0,
    };

    // Three meals (1 each) plus two workouts (2 each) = 7 → level 3.
    let records = std::iter::repeat(meal.activity_record(tz, &weights).unwrap())
        .take(3)
        .chain(std::iter::repeat(workout.activity_record(tz, &weights).unwrap()).take(2));
    let counts = DailyCounts::from_records(records).unwrap();
    let heatmap = ActivityHeatmap::build(&counts, 1, key("2024-03-31")).unwrap();

    assert_eq!(heatmap.days[0].count, 7);
    assert_eq!(heatmap.days[0].level, 3);
}

#[test]
fn test_custom_weights() {
    let weights = ActivityWeights {
        meal: 1,
        workout: 1,
    };
    assert!(weights.validate().is_ok());

    let zero = ActivityWeights {
        meal: 1,
        workout: 0,
    };
    assert!(matches!(
        zero.validate(),
        Err(Error::PreconditionViolation(_))
    ));
}

#[test]
fn test_heatmap_serializes_day_keys_as_strings() {
    let heatmap = ActivityHeatmap::build(&DailyCounts::new(), 1, key("2024-03-31")).unwrap();
    let json = serde_json::to_value(&heatmap).unwrap();
    assert_eq!(json["days"][0]["day"], "2024-03-31");
    assert_eq!(json["days"][0]["level"], 0);
}

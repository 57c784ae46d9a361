// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar-day keys normalised to a reference timezone.
//!
//! Every aggregation in this crate works on [`DayKey`]s rather than raw
//! timestamps. A key is produced by converting an instant into the
//! configured zone first and only then dropping the time of day, so a meal
//! logged at 23:30 in Los Angeles lands on the local day instead of the
//! following UTC day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// One calendar day in the reference timezone, rendered as `YYYY-MM-DD`.
///
/// Ordering of keys is chronological and matches the lexicographic order
/// of their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wrap an already-local calendar date. Only years 0000 through 9999 fit
    /// the fixed `YYYY-MM-DD` form.
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(Error::invalid_input(format!(
                "date {} is outside years {:04}-{:04}",
                date, MIN_YEAR, MAX_YEAR
            )));
        }
        Ok(Self(date))
    }

    /// Normalise an instant to the calendar day it falls on in `tz`.
    pub fn from_instant(instant: DateTime<Utc>, tz: Tz) -> Result<Self> {
        Self::from_date(instant.with_timezone(&tz).date_naive())
    }

    /// Parse an RFC 3339 timestamp and normalise it to a day in `tz`.
    pub fn from_rfc3339(raw: &str, tz: Tz) -> Result<Self> {
        let instant = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| Error::invalid_input(format!("invalid timestamp '{}': {}", raw, e)))?;
        Self::from_instant(instant.with_timezone(&Utc), tz)
    }

    /// Normalise a Unix timestamp in milliseconds to a day in `tz`.
    pub fn from_timestamp_millis(millis: i64, tz: Tz) -> Result<Self> {
        let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            Error::invalid_input(format!("timestamp {} ms is out of range", millis))
        })?;
        Self::from_instant(instant, tz)
    }

    /// The current day in `tz`.
    pub fn today(tz: Tz) -> Self {
        Self(Utc::now().with_timezone(&tz).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Days since the most recent `week_start` (0 when this key is one).
    pub fn days_into_week(&self, week_start: Weekday) -> u32 {
        (7 + self.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7
    }

    /// The key `n` days later (earlier for negative `n`).
    pub fn add_days(self, n: i64) -> Result<Self> {
        let magnitude = Days::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map_or_else(
            || {
                Err(Error::invalid_input(format!(
                    "{} shifted by {} days is out of range",
                    self, n
                )))
            },
            Self::from_date,
        )
    }

    /// The previous day, if representable.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().and_then(|d| Self::from_date(d).ok())
    }

    /// The next day, if representable.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().and_then(|d| Self::from_date(d).ok())
    }
}

/// Whole days from `a` to `b`; positive when `b` is after `a`.
pub fn days_between(a: DayKey, b: DayKey) -> i64 {
    (b.0 - a.0).num_days()
}

/// Parse an IANA timezone name such as `America/Los_Angeles`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::invalid_input(format!("unknown timezone '{}'", name)))
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = Error;

    /// Accepts exactly `YYYY-MM-DD`; anything with a time component or an
    /// impossible date is rejected.
    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(Error::invalid_input(format!(
                "day key '{}' is not in YYYY-MM-DD form",
                s
            )));
        }
        NaiveDate::parse_from_str(s, DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|e| Error::invalid_input(format!("invalid day key '{}': {}", s, e)))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

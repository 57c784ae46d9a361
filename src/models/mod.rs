// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Row models read from the backend tables.

pub mod meal;
pub mod workout;

pub use meal::MealLog;
pub use workout::WorkoutLog;

//! SM-2 spaced repetition calculator.
//!
//! Quality ratings run from 0 to 5; anything at or above 3 counts as a
//! successful recall. Successful recalls grow the interval (1 day, 6 days,
//! then interval times easiness) and nudge the easiness factor, failures
//! bring the item back tomorrow and restart the repetition count.
//! Intervals stop growing at [`MAX_INTERVAL_DAYS`].

use chrono::{Datelike, Duration, NaiveDateTime, Utc};

use crate::data::models::ScheduleState;

pub const INITIAL_EASINESS: f64 = 2.5;
pub const MIN_EASINESS: f64 = 1.3;
pub const PASSING_QUALITY: i32 = 3;
/// About a century; keeps `next_review` within four digit years
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

/// Pure calculator, holds no state and performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedRepetitionEngine;

impl SpacedRepetitionEngine {
    pub fn new() -> Self {
        SpacedRepetitionEngine
    }

    /// Schedule for a (user, word) pair seen for the first time
    pub fn create_initial_schedule(&self) -> ScheduleState {
        self.create_initial_schedule_at(Utc::now().naive_utc())
    }

    pub fn create_initial_schedule_at(&self, now: NaiveDateTime) -> ScheduleState {
        ScheduleState {
            next_review: now,
            interval: 0,
            repetitions: 0,
            easiness_factor: INITIAL_EASINESS,
            last_reviewed: now,
        }
    }

    pub fn calculate_next_review(
        &self,
        interval: i32,
        repetitions: i32,
        easiness: f64,
        quality: i32,
    ) -> ScheduleState {
        self.calculate_next_review_at(interval, repetitions, easiness, quality, Utc::now().naive_utc())
    }

    /// Grades one review at `now`.
    ///
    /// Interval, repetitions and easiness depend only on the four inputs,
    /// `now` only moves the timestamps.
    pub fn calculate_next_review_at(
        &self,
        interval: i32,
        repetitions: i32,
        easiness: f64,
        quality: i32,
        now: NaiveDateTime,
    ) -> ScheduleState {
        let (new_interval, new_repetitions, new_easiness) = if quality >= PASSING_QUALITY {
            let next_interval = match repetitions {
                0 => 1,
                1 => 6,
                // Ties round to even
                _ => (interval as f64 * easiness)
                    .round_ties_even()
                    .min(MAX_INTERVAL_DAYS as f64) as i32,
            };
            let q = (5 - quality) as f64;
            let next_easiness = easiness + (0.1 - q * (0.08 + q * 0.02));
            (next_interval.clamp(1, MAX_INTERVAL_DAYS), repetitions.saturating_add(1), next_easiness)
        } else {
            (1, 0, easiness)
        };

        let new_easiness = new_easiness.max(MIN_EASINESS);

        ScheduleState {
            next_review: add_days(now, new_interval),
            interval: new_interval,
            repetitions: new_repetitions,
            easiness_factor: new_easiness,
            last_reviewed: now,
        }
    }
}

/// Dates past year 9999 stop sorting correctly once stored as text, so those
/// fall back to `now`.
fn add_days(now: NaiveDateTime, days: i32) -> NaiveDateTime {
    now.checked_add_signed(Duration::days(days as i64))
        .filter(|next| next.year() <= 9999)
        .unwrap_or(now)
}

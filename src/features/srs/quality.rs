//! Mapping from a quiz answer to an SM-2 quality score.

pub const DEFAULT_AVG_TIME_SECONDS: f64 = 10.0;

/// Quality for a correct answer in the binary mapping (and for a timed answer without timing)
pub const CORRECT_QUALITY: i32 = 4;
pub const INCORRECT_QUALITY: i32 = 1;

/// Full estimator: correctness first, answer speed as a secondary signal.
///
/// A missing or zero time counts as "no timing data" and never penalises a
/// correct answer. Callers reject negative times before they get here.
pub fn estimate_quality(was_correct: bool, time_taken_seconds: Option<f64>, avg_time_seconds: f64) -> i32 {
    if !was_correct {
        return INCORRECT_QUALITY;
    }

    let time_taken = match time_taken_seconds {
        Some(t) if t != 0.0 => t,
        _ => return CORRECT_QUALITY,
    };

    if time_taken < avg_time_seconds * 0.5 {
        5
    } else if time_taken < avg_time_seconds {
        4
    } else {
        3
    }
}

/// Simplified mapping used by quiz submission
pub fn binary_quality(was_correct: bool) -> i32 {
    if was_correct { CORRECT_QUALITY } else { INCORRECT_QUALITY }
}

/// Strategy used when grading a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum QualityMode {
    #[default]
    Binary,
    Timed { avg_time_seconds: f64 },
}

impl QualityMode {
    pub fn quality_for(&self, was_correct: bool, time_taken_seconds: Option<f64>) -> i32 {
        match *self {
            QualityMode::Binary => binary_quality(was_correct),
            QualityMode::Timed { avg_time_seconds } => {
                estimate_quality(was_correct, time_taken_seconds, avg_time_seconds)
            }
        }
    }
}

pub fn describe_quality(quality: i32) -> &'static str {
    match quality {
        5 => "Perfect recall",
        4 => "Correct after hesitation",
        3 => "Correct with difficulty",
        1 | 2 => "Incorrect",
        _ => "Blackout",
    }
}

use std::str::FromStr;

use thiserror::Error;

use crate::features::srs::{DEFAULT_AVG_TIME_SECONDS, QualityMode};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be positive, got {value}")]
    NotPositive { key: &'static str, value: String },
    #[error("{key} must be at most {max}, got {value}")]
    TooLarge { key: &'static str, value: String, max: i64 },
}

/// Longest idle session lifetime accepted from the environment
pub const MAX_SESSION_INACTIVITY_DAYS: i64 = 365;

/// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Glob of tera templates overriding the built-in question phrasing
    pub question_templates: Option<String>,
    pub quality_mode: QualityMode,
    pub session_secure: bool,
    pub session_inactivity_days: i64,
    pub default_quiz_limit: usize,
    pub max_quiz_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let avg_answer_seconds: f64 = parse_or(&get, "AVG_ANSWER_SECONDS", DEFAULT_AVG_TIME_SECONDS)?;
        if avg_answer_seconds <= 0.0 || !avg_answer_seconds.is_finite() {
            return Err(ConfigError::NotPositive {
                key: "AVG_ANSWER_SECONDS",
                value: avg_answer_seconds.to_string(),
            });
        }

        let quality_mode = match get("QUALITY_MODE").map(|m| m.to_ascii_lowercase()).as_deref() {
            None | Some("binary") => QualityMode::Binary,
            Some("timed") => QualityMode::Timed {
                avg_time_seconds: avg_answer_seconds,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "QUALITY_MODE",
                    value: other.to_string(),
                });
            }
        };

        let session_inactivity_days: i64 = parse_or(&get, "SESSION_INACTIVITY_DAYS", 1)?;
        let default_quiz_limit: usize = parse_or(&get, "DEFAULT_QUIZ_LIMIT", 10)?;
        let max_quiz_limit: usize = parse_or(&get, "MAX_QUIZ_LIMIT", 50)?;
        for (key, value) in [
            ("SESSION_INACTIVITY_DAYS", session_inactivity_days),
            ("DEFAULT_QUIZ_LIMIT", default_quiz_limit as i64),
            ("MAX_QUIZ_LIMIT", max_quiz_limit as i64),
        ] {
            if value <= 0 {
                return Err(ConfigError::NotPositive {
                    key,
                    value: value.to_string(),
                });
            }
        }
        if session_inactivity_days > MAX_SESSION_INACTIVITY_DAYS {
            return Err(ConfigError::TooLarge {
                key: "SESSION_INACTIVITY_DAYS",
                value: session_inactivity_days.to_string(),
                max: MAX_SESSION_INACTIVITY_DAYS,
            });
        }

        Ok(Config {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "lexavia.db".into()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".into()),
            question_templates: get("QUESTION_TEMPLATES"),
            quality_mode,
            session_secure: parse_or(&get, "SESSION_SECURE", false)?,
            session_inactivity_days,
            default_quiz_limit: default_quiz_limit.min(max_quiz_limit),
            max_quiz_limit,
        })
    }

    /// Requested quiz size, defaulted and clamped to `1..=max_quiz_limit`
    pub fn quiz_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_quiz_limit)
            .clamp(1, self.max_quiz_limit)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

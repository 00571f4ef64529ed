// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("display surface unavailable: {0}")]
    Surface(#[from] std::io::Error),

    #[error(
        "text display region missing: terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}"
    )]
    MissingTextRegion {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {flag} {value} (must be a finite number)")]
    NotFinite { flag: &'static str, value: f64 },

    #[error("invalid {flag}: {reason}")]
    Invalid { flag: &'static str, reason: String },
}

impl ConfigError {
    pub fn out_of_range(
        flag: &'static str,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            flag,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

// Logged as warnings by the caller, never propagated.
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
#[derive(Debug, Error)]
pub enum ToneError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("failed to play tone: {0}")]
    Playback(String),
}

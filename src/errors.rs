// ABOUTME: Unified error handling for the training intelligence engine
// ABOUTME: Defines AppError with stable error codes and helper constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trainlab

//! # Error Handling
//!
//! Errors in this crate are reserved for caller contract violations: zero or
//! negative durations, non-positive smoothing windows, and the like. Missing
//! optional data (absent samples, absent summary fields) never produces an
//! error - analytics degrade to `None` or empty results instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Convenient result type used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Input violated a documented precondition
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Input value was outside its valid range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange,
    /// Unexpected internal computation failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            Self::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{name}")
    }
}

/// Application error with a stable code and human-readable message
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct AppError {
    /// Stable machine-readable error code
    pub code: ErrorCode,
    /// Human-readable description of what went wrong
    pub message: String,
}

impl AppError {
    /// Create a new error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Input violated a documented precondition
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Input value was outside its valid range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Unexpected internal computation failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_code() {
        let err = AppError::invalid_input("window must be positive");
        assert_eq!(format!("{err}"), "[INVALID_INPUT] window must be positive");
    }

    #[test]
    fn test_error_codes_distinct() {
        assert_ne!(
            AppError::invalid_input("a").code,
            AppError::internal("a").code
        );
    }
}

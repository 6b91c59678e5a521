//! Error types for the Pipestat core library
//!
//! Two layers of failure exist. [`Error`] covers sessions that cannot be
//! configured, while [`CoercionError`] describes why a single field of a
//! single record could not be read as a number. Coercion failures are tallied by the
//! aggregator and never escape it.
//!
//! Copyright (c) 2025 Pipestat Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for Pipestat operations
#[derive(Error, Debug)]
pub enum Error {
    /// The session could not be configured
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A tracked field name was rejected
    #[error("Invalid field name {name:?}: {message}")]
    InvalidField { name: String, message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error without a field reference
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: None,
        }
    }
}

/// Why a tracked field could not be evaluated for one record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The record has no value under the field name
    #[error("field is missing")]
    Missing,

    /// The value is of a JSON kind that never converts to a number
    #[error("{kind} value is not numeric")]
    NotNumeric { kind: ValueKind },

    /// A string was present but did not parse as a number
    #[error("cannot parse {text:?} as a number")]
    Unparsable { text: String },

    /// The value parsed but is NaN or infinite
    #[error("value {value} is not finite")]
    NonFinite { value: f64 },
}

/// JSON value kinds, used when reporting coercion failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ValueKind::Null,
            serde_json::Value::Bool(_) => ValueKind::Bool,
            serde_json::Value::Number(_) => ValueKind::Number,
            serde_json::Value::String(_) => ValueKind::String,
            serde_json::Value::Array(_) => ValueKind::Array,
            serde_json::Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Array => write!(f, "array"),
            ValueKind::Object => write!(f, "object"),
        }
    }
}

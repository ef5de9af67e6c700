// Error types

use thiserror::Error;

use crate::dialect::Dialect;

/// Errors raised while building a rule table
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Replacement rules are written as `FROM=TO`
    #[error("invalid replacement '{0}', expected FROM=TO")]
    InvalidReplacement(String),

    #[error("drop marker must not be empty")]
    EmptyMarker,
}

/// Top-level transpiler errors
#[derive(Error, Debug)]
pub enum TranspileError {
    #[error("Unknown dialect: '{0}'. Supported: mysql, oracle, postgresql, sqlite, sqlserver")]
    UnknownDialect(String),

    #[error("Unsupported conversion: {from} -> {to}")]
    UnsupportedConversion { from: Dialect, to: Dialect },

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Reading the source dump or writing the converted one failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

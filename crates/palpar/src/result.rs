//! Result and error types for Palpar.
//!
//! The error taxonomy separates three situations that must never be
//! confused at a call site:
//!
//! - **Not found / not disappeared**: the UI simply is not in the desired
//!   state yet. Retriable; surfaced as an error only when the caller asked
//!   for an asserting wait.
//! - **Assertion**: a condition was checked and found false where the test
//!   requires it true. Always a test failure, never retried automatically.
//! - **Technical crash**: malformed query, XML parse failure, transport
//!   breakdown. A defect of the automation stack, not of the product under
//!   test; handled by session recovery at a higher layer.

use thiserror::Error;

/// Result type for Palpar operations
pub type PalparResult<T> = Result<T, PalparError>;

/// Errors that can occur in Palpar
#[derive(Debug, Error)]
pub enum PalparError {
    /// View was not found on screen within the wait budget
    #[error("View not found: {message}")]
    ViewNotFound {
        /// Error message
        message: String,
    },

    /// View is still on screen although it should have disappeared
    #[error("View not disappeared: {message}")]
    ViewNotDisappeared {
        /// Error message
        message: String,
    },

    /// A checked condition was false where the test requires it true
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// A waited condition was not met within the timeout
    #[error("Condition '{condition}' was not met within {elapsed_ms}ms{message}")]
    Timeout {
        /// Human-readable condition name
        condition: String,
        /// Time spent waiting, in milliseconds
        elapsed_ms: u64,
        /// Optional caller-supplied detail (empty or prefixed with ". ")
        message: String,
    },

    /// Scroll search exhausted its budget or hit an inconsistent order
    #[error("Scroll failed: {message}")]
    Scroll {
        /// Error message
        message: String,
    },

    /// Infrastructure breakdown — not a product defect
    #[error("Technical crash of the automation stack: {message}")]
    TechnicalCrash {
        /// Error message
        message: String,
    },

    /// Device transport failure (backend command did not complete)
    #[error("Device backend error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Page-source XML could not be parsed or rewritten
    #[error("Page-source XML error: {message}")]
    Xml {
        /// Error message
        message: String,
    },

    /// Query is structurally invalid (e.g. empty XPath)
    #[error("Invalid query for {view}: {message}")]
    InvalidQuery {
        /// View the query was composed for
        view: String,
        /// Error message
        message: String,
    },
}

impl PalparError {
    /// Combine a common message with an optional caller-supplied one,
    /// custom message first — mirrors how failures read in test logs.
    #[must_use]
    pub fn combine(common: &str, custom: Option<&str>) -> String {
        match custom {
            Some(custom) => format!("{custom} | {common}"),
            None => common.to_string(),
        }
    }

    /// True for errors the wait/scroll engines may keep polling through.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::ViewNotFound { .. } | Self::ViewNotDisappeared { .. } | Self::Timeout { .. }
        )
    }
}

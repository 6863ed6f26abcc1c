//! Error types for permit engine operations
//!
//! Two failure families exist and they never mix:
//! - Configuration errors: the policy definition itself is unusable
//!   (bad version gate, dangling cross-references, malformed document).
//!   Always fatal to engine construction.
//! - Validation-input errors: one permit application is malformed
//!   (mismatched vehicle/axle arrays, zero axle counts). Per-call; the
//!   engine and other calls are unaffected.
//!
//! Business-rule outcomes (violations, warnings) are NOT errors - they are
//! carried inside a successful [`ValidationResult`](crate::ValidationResult).
//!
//! Each error variant has a unique, stable error code (e.g.,
//! `ENGINE_VERSION_TOO_OLD`) for client handling, logging, and i18n.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for permit engine operations
pub type Result<T> = std::result::Result<T, PolicyEngineError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Policy definition is malformed or internally inconsistent (fatal to construction)
    Configuration,
    /// Permit application input is malformed (per-call)
    ValidationInput,
    /// Serialization or I/O failure at the document boundary
    External,
    /// Internal error that shouldn't happen
    Internal,
}

/// Errors that can occur in permit engine operations
#[derive(Error, Debug)]
pub enum PolicyEngineError {
    // ═══════════════════════════════════════════════════════════════════════
    // Configuration errors (policy definition loading and merging)
    // ═══════════════════════════════════════════════════════════════════════

    /// Declared minimum-engine version string is not a valid semantic version
    #[error("Invalid version format: '{version}'. Use MAJOR.MINOR.PATCH (e.g., 1.0.0).")]
    InvalidVersionFormat { version: String },

    /// Configuration document requires a newer engine than the one running
    #[error("Policy requires engine version {declared} or newer; this engine is {engine}.")]
    EngineVersionTooOld { declared: String, engine: String },

    /// Policy document is malformed or internally inconsistent
    #[error("Invalid policy document: {reason}")]
    InvalidPolicyDocument { reason: String },

    /// Failed to load a policy document from a file or directory
    #[error("Failed to load policy document from '{path}': {reason}")]
    DocumentLoadError { path: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Validation-input errors (per-application shape problems)
    // ═══════════════════════════════════════════════════════════════════════

    /// Vehicle sequence and axle configuration cannot be reconciled
    #[error("Mismatched vehicle/axle configuration: {reason}")]
    MismatchedConfiguration { reason: String },

    /// An axle unit in the application is structurally invalid
    #[error("Invalid axle configuration: {reason}")]
    InvalidAxleConfiguration { reason: String },

    /// A required application field is absent
    #[error("Missing required application field: '{field}'")]
    MissingApplicationField { field: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════════════════

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Internal error that shouldn't happen
    #[error("Internal error: {reason}. This is a bug; please report it.")]
    InternalError { reason: String },
}

impl PolicyEngineError {
    /// Returns true if this error is fatal to engine construction
    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Returns true if this error is scoped to a single validation call
    pub fn is_validation_input_error(&self) -> bool {
        self.category() == ErrorCategory::ValidationInput
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            PolicyEngineError::InvalidVersionFormat { .. }
            | PolicyEngineError::EngineVersionTooOld { .. }
            | PolicyEngineError::InvalidPolicyDocument { .. } => ErrorCategory::Configuration,

            PolicyEngineError::MismatchedConfiguration { .. }
            | PolicyEngineError::InvalidAxleConfiguration { .. }
            | PolicyEngineError::MissingApplicationField { .. } => ErrorCategory::ValidationInput,

            PolicyEngineError::JsonError(_) | PolicyEngineError::DocumentLoadError { .. } => {
                ErrorCategory::External
            }

            PolicyEngineError::InternalError { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the stable error code for this error
    ///
    /// Error codes are uppercase, underscore-separated identifiers that
    /// remain stable across versions.
    pub fn error_code(&self) -> &'static str {
        match self {
            PolicyEngineError::InvalidVersionFormat { .. } => "INVALID_VERSION_FORMAT",
            PolicyEngineError::EngineVersionTooOld { .. } => "ENGINE_VERSION_TOO_OLD",
            PolicyEngineError::InvalidPolicyDocument { .. } => "INVALID_POLICY_DOCUMENT",
            PolicyEngineError::DocumentLoadError { .. } => "DOCUMENT_LOAD_ERROR",
            PolicyEngineError::MismatchedConfiguration { .. } => "MISMATCHED_CONFIGURATION",
            PolicyEngineError::InvalidAxleConfiguration { .. } => "INVALID_AXLE_CONFIGURATION",
            PolicyEngineError::MissingApplicationField { .. } => "MISSING_APPLICATION_FIELD",
            PolicyEngineError::JsonError(_) => "JSON_ERROR",
            PolicyEngineError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    ///
    /// Use this when building HTTP API responses around the engine.
    pub fn http_status_code(&self) -> u16 {
        match self.category() {
            // Bad application input from the caller
            ErrorCategory::ValidationInput => 400,
            // The loaded policy set itself is unusable
            ErrorCategory::Configuration => 500,
            ErrorCategory::External => 502,
            ErrorCategory::Internal => 500,
        }
    }

    /// Converts this error to a JSON-serializable response object
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
            },
        }
    }
}

/// JSON-serializable error response for APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "ENGINE_VERSION_TOO_OLD")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
}

//! Error types shared by the cache, registry, and formatter modules
//!
//! [`CommonError`] covers the failures every module can raise: bad
//! configuration, bad caller input, and canonical-key rendering. Each error
//! type implements [`ErrorClassification`] so callers can decide whether to
//! re-invoke an operation and at which [`ErrorSeverity`] to log it.
//!
//! Module errors wrap `CommonError` instead of repeating its variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum RegistryError {
//!     #[error("singleton `{key}` is not a `{expected}`")]
//!     TypeMismatch { key: String, expected: &'static str },
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! | Variant | Raised for |
//! |---------|------------|
//! | `Config` | Zero capacities, out-of-range load factors |
//! | `Validation` | Empty singleton keys, malformed patterns, unparsable input |
//! | `Serialization` | Singleton arguments that cannot be rendered as JSON |
//!
//! Cache misses are never errors: a cleared or evicted value is reported as
//! `None` and the caller recomputes it.

use std::fmt;
use std::time::Duration;

/// Result alias for operations failing with [`CommonError`]
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures shared across modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A configuration value is out of range
    Config { message: String, field: Option<String> },

    /// A caller-supplied argument was rejected
    Validation { field: String, message: String, value: Option<String> },

    /// A value could not be serialized or deserialized
    Serialization { message: String, format: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message, field: Some(field) } => {
                write!(f, "Configuration error in field '{field}': {message}")
            }
            Self::Config { message, field: None } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message, value: Some(value) } => {
                write!(f, "Validation error for field '{field}' (value: '{value}'): {message}")
            }
            Self::Validation { field, message, value: None } => {
                write!(f, "Validation error for field '{field}': {message}")
            }
            Self::Serialization { message, format: Some(format) } => {
                write!(f, "Serialization error ({format}): {message}")
            }
            Self::Serialization { message, format: None } => {
                write!(f, "Serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        // Re-invoking with the same arguments fails the same way.
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config { .. } => ErrorSeverity::Critical,
            Self::Validation { .. } | Self::Serialization { .. } => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Configuration error naming the offending field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Validation error for `field`
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: None }
    }

    /// Validation error that echoes the rejected value
    pub fn validation_with_value<F: Into<String>, M: Into<String>, V: Into<String>>(
        field: F,
        message: M,
        value: V,
    ) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: Some(value.into()) }
    }

    /// Serialization error tagged with its format
    pub fn serialization_format<S: Into<String>, F: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

/// Classification shared by every error type in the crate
pub trait ErrorClassification {
    /// Whether re-invoking the failed operation can succeed
    ///
    /// Construction failures are retryable; argument and configuration
    /// errors are not.
    fn is_retryable(&self) -> bool;

    /// Level to log the error at
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error points at a misconfigured process
    fn is_critical(&self) -> bool;

    /// Suggested delay before retrying, if any
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Expected in normal operation but worth monitoring
    Warning,
    /// The operation failed and the caller must act
    Error,
    /// The process is misconfigured
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Implement [`ErrorClassification`] for a module error by delegating its
/// `CommonError` variant and listing the rest
///
/// # Usage
///
/// ```rust,ignore
/// impl_error_classification!(RegistryError, Common,
///     Self::TypeMismatch { .. } => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

//! Registry-specific errors composed with [`CommonError`]

use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};
use crate::impl_error_classification;

/// Boxed error returned by singleton constructors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while looking up or constructing singletons
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The instance stored under `key` has a different concrete type
    #[error("singleton `{key}` is not a `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },

    /// No factory was registered under the requested name
    #[error("no singleton type registered as `{name}`")]
    UnknownType { name: String },

    /// Constructor arguments could not be decoded for the named type
    #[error("invalid constructor arguments for `{name}`: {message}")]
    InvalidArguments { name: String, message: String },

    /// The constructor failed; nothing was cached
    #[error("failed to construct singleton `{key}`: {source}")]
    Construction {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl RegistryError {
    /// Registry key involved in the failure, when there is one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { key, .. } | Self::Construction { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl_error_classification!(RegistryError, Common,
    Self::TypeMismatch { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::UnknownType { .. } => {
        retryable: false,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::InvalidArguments { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::Construction { .. } => {
        retryable: true,
        severity: ErrorSeverity::Error,
        critical: false,
    },
);

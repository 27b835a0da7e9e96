//! Error types for type mapping resolution.

use std::path::PathBuf;

/// Errors arising while resolving a mapping or loading resolver config.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// A structural comparer cannot be built for the exact type.
    ///
    /// Fatal for the call: the mapping is never degraded to a plain one.
    #[error("cannot build comparer for `{type_name}`: {reason}")]
    Configuration { type_name: String, reason: String },

    /// The fallback catalog has no mapping for the type.
    #[error("no type mapping found for `{type_name}`")]
    Unmapped { type_name: String },

    /// A foreign fallback resolver failed.
    #[error("fallback resolver failed: {0}")]
    Delegated(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to read resolver config at {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse resolver config: {source}")]
    ConfigParse { source: toml::de::Error },

    #[error("invalid resolver config: {0}")]
    InvalidConfig(String),
}

impl MappingError {
    pub fn configuration(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn unmapped(type_name: impl Into<String>) -> Self {
        Self::Unmapped {
            type_name: type_name.into(),
        }
    }

    /// Wrap a foreign fallback failure without interpreting it.
    pub fn delegated(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delegated(Box::new(error))
    }
}

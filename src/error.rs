//! Error types for environment operations and configuration.
//!
//! Missing page elements are not errors anywhere in this crate; components
//! skip them. These types cover the operations that can genuinely fail in a
//! browser (a throwing DOM call, storage disabled by privacy settings) and
//! rejected configuration.

/// A failed environment operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A DOM or storage call threw; carries the stringified exception.
    #[error("javascript exception: {0}")]
    Js(String),

    /// A browser global (`window`, `document`, `localStorage`) is missing.
    #[error("browser global unavailable: {0}")]
    Unavailable(&'static str),

    /// The node is not attached to a parent it could be removed from.
    #[error("node is detached from the document")]
    Detached,

    /// The node does not support the requested operation.
    #[error("unsupported on this node: {0}")]
    Unsupported(&'static str),
}

/// A rejected [`crate::config::PageConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

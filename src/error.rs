//! Errors raised while configuring a store.

use thiserror::Error;

/// A reducer binding that cannot be installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The binding key is the empty string.
    #[error("reducer key must not be empty")]
    EmptyKey,

    /// The binding key contains the path separator.
    #[error("reducer key `{key}` must not contain '.'")]
    InvalidKey { key: String },

    /// Two bindings share the same key.
    #[error("reducer key `{key}` is bound more than once")]
    DuplicateKey { key: String },
}

/// Errors returned by [`Store`](crate::Store) construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_render_the_key() {
        let err = StoreError::from(ConfigurationError::DuplicateKey {
            key: "todos".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "invalid store configuration: reducer key `todos` is bound more than once"
        );
    }
}

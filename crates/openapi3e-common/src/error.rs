//! Error context helpers shared across crates

use std::fmt;

/// Attach human-readable context to foreign errors.
///
/// Works like anyhow's `context()` but yields a plain message, so library
/// crates can fold it into their own typed error enums.
pub trait ErrorContext<T> {
    /// Prefix the error with `context`
    ///
    /// # Errors
    /// Returns the original error rendered as `"{context}: {error}"`
    fn context<C>(self, context: C) -> Result<T, String>
    where
        C: fmt::Display;

    /// Lazily computed variant of [`ErrorContext::context`]
    ///
    /// # Errors
    /// Returns the original error rendered as `"{context}: {error}"`
    fn with_context<C, F>(self, f: F) -> Result<T, String>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context<C>(self, context: C) -> Result<T, String>
    where
        C: fmt::Display,
    {
        self.map_err(|e| format!("{context}: {e}"))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, String>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| format!("{}: {e}", f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct Boom;

    #[test]
    fn test_context_prefixes_message() {
        let result: Result<(), Boom> = Err(Boom);
        let message = result.context("while reading docs.toml").unwrap_err();
        assert_eq!(message, "while reading docs.toml: disk on fire");
    }

    #[test]
    fn test_with_context_is_lazy_on_success() {
        let result: Result<u8, Boom> = Ok(7);
        let value = result
            .with_context(|| -> String { unreachable!("context evaluated on success") })
            .unwrap();
        assert_eq!(value, 7);
    }
}

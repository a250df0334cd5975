//! Result type alias for lint operations

use crate::error::LintelError;

/// Standard Result type for lint operations
pub type Result<T> = std::result::Result<T, LintelError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Turn a recoverable error into `Ok(None)`, keeping fatal ones
    fn recoverable(self) -> Result<Option<T>>;

    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("Continuing after error: {}", err);
                } else {
                    tracing::error!("Continuing after non-recoverable error: {}", err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_swallows_only_recoverable_errors() {
        let ok: Result<u8> = Ok(1);
        assert!(matches!(ok.recoverable(), Ok(Some(1))));

        let parse: Result<u8> = Err(LintelError::parse_error("bad"));
        assert!(matches!(parse.recoverable(), Ok(None)));

        let dup: Result<u8> = Err(LintelError::duplicate_rule("js/a"));
        assert!(dup.recoverable().is_err());
    }

    #[test]
    fn test_log_and_continue() {
        let err: Result<u8> = Err(LintelError::internal_error("x"));
        assert_eq!(err.log_and_continue(), None);
    }
}

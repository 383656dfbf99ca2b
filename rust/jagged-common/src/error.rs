use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn resource_exhausted(
        buffer: &'static str,
        requested: usize,
        source: TryReserveError,
    ) -> Error {
        Error(
            ErrorKind::ResourceExhausted {
                buffer,
                requested,
                source,
            }
            .into(),
        )
    }

    pub fn cursor_out_of_range(position: isize, len: usize) -> Error {
        Error(ErrorKind::CursorOutOfRange { position, len }.into())
    }

    /// Returns `true` if this error was caused by a failed buffer allocation.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self.kind(), ErrorKind::ResourceExhausted { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("failed to reserve {requested} more slots in the {buffer} buffer")]
    ResourceExhausted {
        buffer: &'static str,
        requested: usize,
        source: TryReserveError,
    },

    #[error("cursor position {position} is outside of 0..={len}")]
    CursorOutOfRange { position: isize, len: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arg_display() {
        let err = Error::invalid_arg("offsets", "offsets[0] == 0");
        assert_eq!(
            err.to_string(),
            "invalid argument offsets: offsets[0] == 0"
        );
        assert!(!err.is_resource_exhausted());
    }

    #[test]
    fn test_resource_exhausted() {
        let source = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err = Error::resource_exhausted("values", usize::MAX, source);
        assert!(err.is_resource_exhausted());
        assert!(err.to_string().contains("values buffer"));
        match err.into_kind() {
            ErrorKind::ResourceExhausted {
                buffer, requested, ..
            } => {
                assert_eq!(buffer, "values");
                assert_eq!(requested, usize::MAX);
            }
            other => panic!("unexpected error kind {other:?}"),
        }
    }

    #[test]
    fn test_cursor_out_of_range_display() {
        let err = Error::cursor_out_of_range(-1, 3);
        assert_eq!(err.to_string(), "cursor position -1 is outside of 0..=3");
    }
}

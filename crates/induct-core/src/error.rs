//! Error types produced by induct-core.
//!
//! Only unexpected input is an error. A field that is missing from a message
//! falls back to its default, and a message with no recoverable train
//! identifier still yields a (semantically incomplete) record; neither goes
//! through this type.

use thiserror::Error;

/// Input the extractor refuses to look at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    /// Message bytes are not valid UTF-8.
    #[error("message is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    /// Message exceeds the configured size guard.
    #[error("message of {len} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { len: usize, limit: usize },
}

impl From<std::str::Utf8Error> for NormalizeError {
    fn from(err: std::str::Utf8Error) -> Self {
        NormalizeError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let err = NormalizeError::MessageTooLarge { len: 20, limit: 10 };
        assert_eq!(err.to_string(), "message of 20 bytes exceeds limit of 10 bytes");

        let bytes = vec![b'o', b'k', 0xff];
        let err: NormalizeError = std::str::from_utf8(&bytes).unwrap_err().into();
        assert_eq!(err, NormalizeError::InvalidUtf8 { valid_up_to: 2 });
        assert!(err.to_string().contains("offset 2"));
    }
}

//! Errors returned by the editor core.
//!
//! Most editing failures are not errors at all: a motion past the end of the
//! buffer is a no-op, a failed search is a minibuffer message. What is left
//! is file I/O, option parsing, and the bounded edit accumulator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    /// The pending edit already holds `capacity` bytes. Callers commit before
    /// this happens; seeing it means an insertion path skipped the check.
    #[error("edit accumulator full ({capacity} bytes)")]
    AccumulatorFull { capacity: usize },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("buffer is read-only")]
    ReadOnly,

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value for {name}: {value}")]
    InvalidOption { name: String, value: String },
}

pub type Result<T, E = EditError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = EditError::Read {
            path: PathBuf::from("/tmp/x.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot read /tmp/x.txt: denied");
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error as _;
        let err = EditError::Write {
            path: PathBuf::from("out"),
            source: io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
        assert!(EditError::ReadOnly.source().is_none());
    }

    #[test]
    fn option_errors() {
        assert_eq!(
            EditError::UnknownOption("bogus".into()).to_string(),
            "unknown option: bogus"
        );
        assert_eq!(
            EditError::InvalidOption {
                name: "tabwidth".into(),
                value: "abc".into()
            }
            .to_string(),
            "invalid value for tabwidth: abc"
        );
        assert_eq!(
            EditError::AccumulatorFull { capacity: 64 }.to_string(),
            "edit accumulator full (64 bytes)"
        );
    }
}

//! Error types for Valgrind report parsing.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for valgrind-report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The part of an `<error>` block that was required but never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingPart {
    /// No `<kind>` tag, or an empty one.
    Kind,
    /// Neither a `<what>` nor an `<xwhat>` tag carried any text.
    Message,
    /// No `<stack>` tag was opened.
    Stack,
}

impl fmt::Display for MissingPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPart::Kind => write!(f, "missing <kind>"),
            MissingPart::Message => write!(f, "missing <what> or <xwhat>"),
            MissingPart::Stack => write!(f, "missing <stack>"),
        }
    }
}

/// Which class of failure aborted a parse.
///
/// Callers that only care that "the report could not be read" can ignore
/// this; it is kept so diagnostics can tell markup problems apart from
/// schema problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The XML itself could not be tokenized.
    MalformedInput,
    /// Well-formed XML, but an `<error>` block was incomplete.
    StructuralIncompleteness,
    /// Reading from the underlying stream or file failed.
    Io,
}

/// Errors that can occur while parsing a Valgrind report.
#[derive(Debug, Error)]
pub enum Error {
    /// The tokenizer could not make progress: bad syntax, bad encoding,
    /// invalid escapes or a premature end of stream.
    #[error("malformed XML at byte {position}: {message}")]
    MalformedInput { message: String, position: u64 },

    /// An `<error>` block closed without one of its required parts.
    #[error("incomplete <error> block ending at byte {position}: {missing}")]
    StructuralIncompleteness { missing: MissingPart, position: u64 },

    /// The input stream could not be read.
    #[error("failed to read report: {0}")]
    Io(#[from] std::io::Error),

    /// A failure attributed to a specific report file.
    #[error("{}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The class of failure, looking through [`Error::Report`].
    pub fn class(&self) -> FailureClass {
        match self {
            Error::MalformedInput { .. } => FailureClass::MalformedInput,
            Error::StructuralIncompleteness { .. } => FailureClass::StructuralIncompleteness,
            Error::Io(_) => FailureClass::Io,
            Error::Report { source, .. } => source.class(),
        }
    }

    /// The missing part, if this is a structural failure.
    pub fn missing_part(&self) -> Option<MissingPart> {
        match self {
            Error::StructuralIncompleteness { missing, .. } => Some(*missing),
            Error::Report { source, .. } => source.missing_part(),
            _ => None,
        }
    }

    /// Attach the path of the report this error came from.
    pub(crate) fn in_report(self, path: impl Into<PathBuf>) -> Self {
        Error::Report {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Map a quick-xml error, keeping the underlying I/O error when there is one.
    pub(crate) fn from_xml(err: quick_xml::Error, position: u64) -> Self {
        match err {
            quick_xml::Error::Io(io) => Error::Io(
                Arc::try_unwrap(io)
                    .unwrap_or_else(|shared| std::io::Error::new(shared.kind(), shared)),
            ),
            other => Error::MalformedInput {
                message: other.to_string(),
                position,
            },
        }
    }
}

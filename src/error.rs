//! Errors reported by [`LineAnnotatingWriter`](crate::LineAnnotatingWriter).

use std::{
    collections::TryReserveError,
    fmt,
    io,
};

use thiserror::Error;

/// The write step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Writing the prefix in front of a line.
    Prefix,
    /// Flushing bytes buffered by earlier writes.
    Pending,
    /// Writing the body of a line.
    Body,
    /// Writing the line terminator (`\n` or `\r\n`).
    Terminator,
    /// Writing the suffix in front of the terminator.
    Suffix,
    /// Appending an incomplete line to the pending buffer.
    BufferAppend,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Prefix => "prefix",
            Self::Pending => "buffered remainder",
            Self::Body => "line body",
            Self::Terminator => "line terminator",
            Self::Suffix => "suffix",
            Self::BufferAppend => "buffer append",
        };

        f.write_str(label)
    }
}

/// Failure of a single write step.
#[derive(Debug, Error)]
pub enum Error {
    /// The sink returned an error.
    #[error("failed to write {step}: {source}")]
    Sink {
        /// Step that was being written.
        step: Step,
        /// Error returned by the sink.
        #[source]
        source: io::Error,
    },

    /// The sink reported success but accepted a different number of bytes.
    #[error("inconsistency when writing {step}: {step} len = {expected}, actually written = {actual}")]
    ShortWrite {
        /// Step that was being written.
        step: Step,
        /// Length of the segment handed to the sink.
        expected: usize,
        /// Count the sink reported.
        actual: usize,
    },

    /// The pending buffer could not grow to hold an incomplete line.
    #[error("failed to append {len} bytes to the buffer")]
    BufferAppend {
        /// Number of bytes that did not fit.
        len: usize,
        /// Allocation failure.
        #[source]
        source: TryReserveError,
    },
}

impl Error {
    /// The step during which the error occurred.
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Sink { step, .. } | Self::ShortWrite { step, .. } => *step,
            Self::BufferAppend { .. } => Step::BufferAppend,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            // Callers like `write_all` retry `Interrupted` as if nothing had
            // been written, which would repeat the prefix.
            Error::Sink { source, .. } if source.kind() == io::ErrorKind::Interrupted => {
                io::ErrorKind::Other
            }
            Error::Sink { source, .. } => source.kind(),
            Error::ShortWrite { actual: 0, .. } => io::ErrorKind::WriteZero,
            Error::ShortWrite { .. } => io::ErrorKind::Other,
            Error::BufferAppend { .. } => io::ErrorKind::OutOfMemory,
        };

        io::Error::new(kind, err)
    }
}

/// A failed write together with the number of input bytes accepted before
/// the failure.
///
/// Bytes of the line that was being written when the failure happened are
/// not part of [`WriteError::accepted`], though its prefix or the buffered
/// remainder may already have reached the sink. Retrying the same input is
/// therefore not guaranteed to produce clean output.
#[derive(Debug, Error)]
#[error("write aborted after accepting {accepted} bytes")]
pub struct WriteError {
    accepted: usize,
    #[source]
    source: Error,
}

impl WriteError {
    pub(crate) fn new(accepted: usize, source: Error) -> Self {
        Self { accepted, source }
    }

    /// Number of input bytes accepted before the failure.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// The step failure that aborted the write.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Consume the `WriteError` and return the step failure.
    #[must_use]
    pub fn into_error(self) -> Error {
        self.source
    }
}

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> Self {
        err.source.into()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io;

    use super::{
        Error,
        Step,
        WriteError,
    };

    #[test]
    fn sink_error_message() {
        let err = Error::Sink {
            step: Step::Prefix,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "prefix error"),
        };

        assert_eq!("failed to write prefix: prefix error", err.to_string());
        assert_eq!(Step::Prefix, err.step());
    }

    #[test]
    fn short_write_message() {
        let err = Error::ShortWrite {
            step: Step::Terminator,
            expected: 1,
            actual: 2,
        };

        assert_eq!(
            "inconsistency when writing line terminator: line terminator len = 1, actually \
             written = 2",
            err.to_string()
        );
    }

    #[test]
    fn io_error_keeps_sink_kind() {
        let err = WriteError::new(
            3,
            Error::Sink {
                step: Step::Body,
                source: io::Error::new(io::ErrorKind::BrokenPipe, "gone"),
            },
        );

        assert_eq!(3, err.accepted());

        let io_err: io::Error = err.into();
        assert_eq!(io::ErrorKind::BrokenPipe, io_err.kind());
    }

    #[test]
    fn io_error_hides_interrupted() {
        let io_err: io::Error = Error::Sink {
            step: Step::Body,
            source: io::Error::from(io::ErrorKind::Interrupted),
        }
        .into();

        assert_eq!(io::ErrorKind::Other, io_err.kind());
    }

    #[test]
    fn io_error_for_short_writes() {
        let zero: io::Error = Error::ShortWrite {
            step: Step::Suffix,
            expected: 3,
            actual: 0,
        }
        .into();
        let partial: io::Error = Error::ShortWrite {
            step: Step::Suffix,
            expected: 3,
            actual: 2,
        }
        .into();

        assert_eq!(io::ErrorKind::WriteZero, zero.kind());
        assert_eq!(io::ErrorKind::Other, partial.kind());
    }
}

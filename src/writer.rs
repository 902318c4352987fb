use std::io::{
    self,
    Write,
};

use tracing::{
    debug,
    trace,
};

use crate::{
    error::{
        Error,
        Step,
        WriteError,
    },
    scan::{
        next_line,
        Line,
    },
};

/// Scans lines and writes each one to the inner writer surrounded by a
/// prefix and a suffix. Will work even when a write contains multiple lines
/// or incomplete lines between writes.
///
/// The prefix is written before the body of every line, empty lines
/// included. The suffix is written after the body, before the `\n` or
/// `\r\n` terminator. An incomplete line is held back until its terminator
/// arrives or [`LineAnnotatingWriter::close`] is called.
#[derive(Debug)]
pub struct LineAnnotatingWriter<W: Write> {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
    writer: W,

    pending: Vec<u8>,
}

impl<W: Write> LineAnnotatingWriter<W> {
    /// Create a new [`LineAnnotatingWriter`] writing the annotated lines to
    /// the writer. Lines are passed through unchanged until a prefix or
    /// suffix is set.
    pub fn new(writer: W) -> Self {
        Self {
            prefix: Vec::new(),
            suffix: Vec::new(),
            writer,

            pending: Vec::new(),
        }
    }

    /// Set the prefix written in front of every line.
    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self
        }
    }

    /// Set the suffix written between the body of every line and its
    /// terminator.
    #[must_use]
    pub fn with_suffix(self, suffix: impl Into<Vec<u8>>) -> Self {
        Self {
            suffix: suffix.into(),
            ..self
        }
    }

    /// The prefix written in front of every line.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The suffix written in front of every line terminator.
    #[must_use]
    pub fn suffix(&self) -> &[u8] {
        &self.suffix
    }

    /// Bytes of the incomplete line that have not been written yet.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Reference to the inner writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Mutable reference to the inner writer. Writing to it directly
    /// bypasses the line tracking.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwrap the inner writer. An incomplete line that was not written with
    /// [`LineAnnotatingWriter::close`] is lost.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write every complete line in `buf` and keep the incomplete rest for
    /// the next call. Returns the number of bytes of `buf` that were
    /// accepted, which is `buf.len()` unless a write fails.
    ///
    /// The returned count covers bytes of `buf` written as line bodies and
    /// terminators or appended to the pending buffer. Prefix, suffix and
    /// previously buffered bytes are not counted.
    ///
    /// # Errors
    ///
    /// Fails on the first write the inner writer rejects or only partially
    /// accepts, and on failing to grow the pending buffer. The
    /// [`WriteError`] tells how many bytes were accepted before that.
    pub fn write_lines(&mut self, buf: &[u8]) -> Result<usize, WriteError> {
        let mut accepted = 0;
        let mut rest = buf;

        while let Some(line) = next_line(rest) {
            if let Err(err) = self.write_line(&line, &mut accepted) {
                return Err(aborted(accepted, err));
            }

            rest = &rest[line.consumed..];
        }

        if !rest.is_empty() {
            if let Err(source) = self.pending.try_reserve(rest.len()) {
                let err = Error::BufferAppend {
                    len: rest.len(),
                    source,
                };

                return Err(aborted(accepted, err));
            }

            self.pending.extend_from_slice(rest);
            accepted += rest.len();

            trace!(
                buffered = rest.len(),
                pending = self.pending.len(),
                "holding back incomplete line"
            );
        }

        Ok(accepted)
    }

    /// Write the incomplete line held back from earlier writes, with the
    /// prefix but without suffix or terminator. Does nothing if no bytes are
    /// pending.
    ///
    /// # Errors
    ///
    /// Fails if the inner writer rejects or only partially accepts the
    /// prefix or the pending bytes. The pending bytes are kept in that case.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.pending.is_empty() {
            return Ok(());
        }

        trace!(pending = self.pending.len(), "writing incomplete line");

        write_exact(&mut self.writer, &self.prefix, Step::Prefix)
            .and_then(|()| write_exact(&mut self.writer, &self.pending, Step::Pending))
            .inspect_err(|err| debug!(step = %err.step(), error = %err, "failed to close"))?;

        self.pending.clear();

        Ok(())
    }

    fn write_line(&mut self, line: &Line<'_>, accepted: &mut usize) -> Result<(), Error> {
        // A `\r` that ended the previous write belongs to this terminator.
        let carried_cr = line.body.is_empty()
            && line.terminator == b"\n"
            && self.pending.last() == Some(&b'\r');

        let (held, terminator): (&[u8], &[u8]) = if carried_cr {
            (&self.pending[..self.pending.len() - 1], b"\r\n".as_slice())
        } else {
            (&self.pending[..], line.terminator)
        };

        write_exact(&mut self.writer, &self.prefix, Step::Prefix)?;
        write_exact(&mut self.writer, held, Step::Pending)?;
        self.pending.clear();

        write_exact(&mut self.writer, line.body, Step::Body)?;
        *accepted += line.body.len();

        write_exact(&mut self.writer, &self.suffix, Step::Suffix)?;
        write_exact(&mut self.writer, terminator, Step::Terminator)?;
        *accepted += line.terminator.len();

        Ok(())
    }
}

impl<W: Write> Write for LineAnnotatingWriter<W> {
    /// See [`LineAnnotatingWriter::write_lines`]. A failure after some bytes
    /// were accepted is reported as a short write.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.write_lines(buf) {
            Ok(accepted) => Ok(accepted),
            Err(err) if err.accepted() > 0 => Ok(err.accepted()),
            Err(err) => Err(err.into()),
        }
    }

    /// Flushes the inner writer. The incomplete line is not written, use
    /// [`LineAnnotatingWriter::close`] for that.
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Hand `bytes` to the writer in a single call and fail unless all of them
/// were accepted. Empty segments are skipped.
fn write_exact<W: Write>(writer: &mut W, bytes: &[u8], step: Step) -> Result<(), Error> {
    if bytes.is_empty() {
        return Ok(());
    }

    let written = writer
        .write(bytes)
        .map_err(|source| Error::Sink { step, source })?;

    if written != bytes.len() {
        return Err(Error::ShortWrite {
            step,
            expected: bytes.len(),
            actual: written,
        });
    }

    Ok(())
}

fn aborted(accepted: usize, err: Error) -> WriteError {
    debug!(step = %err.step(), accepted, error = %err, "write aborted");

    WriteError::new(accepted, err)
}

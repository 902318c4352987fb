#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(rust_2018_idioms, unused_lifetimes, missing_debug_implementations)]

//! Crate for a writer that annotates every line written to it with a
//! prefix and a suffix, no matter how the lines are split across writes.
//!
//! Useful for tagging the output of subprocesses or workers with a label
//! without the producer knowing about it.
//!
//! ```
//! use line_annotating_writer::LineAnnotatingWriter;
//! use std::io::Write;
//!
//! let mut output = Vec::new();
//! let mut writer = LineAnnotatingWriter::new(&mut output)
//!     .with_prefix("[build] ")
//!     .with_suffix(" <");
//!
//! writer.write_all(b"compiling\nlink")?;
//! writer.write_all(b"ing\ndone")?;
//! writer.close()?;
//!
//! assert_eq!(output, b"[build] compiling <\n[build] linking <\n[build] done");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A line ends at `\n`. A `\r` directly in front of it is part of the
//! terminator, so the suffix lands before the `\r\n`. Whatever follows the
//! last terminator is held back until more input arrives or
//! [`LineAnnotatingWriter::close`] writes it as a final line with prefix
//! only.
//!
//! The writer emits [`tracing`] events at `trace` and `debug` level and
//! never installs a subscriber.

mod error;
mod scan;
mod writer;

pub use error::{
    Error,
    Step,
    WriteError,
};
pub use writer::LineAnnotatingWriter;

//! Decoding of recordings stored in files.
//!
//! Most users should begin with [`parse_exercise`]. Failures are reported as
//! a [`ParseError`] naming the offending path, classified by an
//! [`ErrorKind`].

pub mod reader;

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::sans::{DecodeError, ErrorKind};

pub use reader::parse_exercise;

/// The underlying cause of a [`ParseError`].
#[derive(Debug, Error)]
pub enum Cause {
    /// The file could not be opened or read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The file contents could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A failure to parse an exercise file.
#[derive(Debug, Error)]
#[error("Failed to parse exercise file `{}`: {source}", .path.display())]
pub struct ParseError {
    kind: ErrorKind,
    path: PathBuf,
    #[source]
    source: Cause,
}

impl ParseError {
    pub(crate) fn new(path: &Path, source: impl Into<Cause>) -> Self {
        let source = source.into();

        let kind = match &source {
            Cause::Io(_) => ErrorKind::FileNotFound,
            Cause::Decode(err) => err.kind(),
        };

        Self {
            kind,
            path: path.to_path_buf(),
            source,
        }
    }

    /// The broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The file which failed to parse.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The I/O or decoding error which caused the failure.
    pub fn cause(&self) -> &Cause {
        &self.source
    }
}

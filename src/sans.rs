//! Decoding of raw recordings held in memory.
//!
//! Nothing in this module performs I/O. See [`crate::avec`] for decoding
//! from a path.
//!
//! # Layout
//!
//! Every supported generation shares the same outline:
//!
//! ```text
//! ┌──────────────────────┐
//! │ Document header      │ declared length, signature
//! ├──────────────────────┤
//! │ Exercise header      │ start, duration, recording flags
//! ├──────────────────────┤
//! │ Summaries            │ one sub-record per recording flag set
//! ├──────────────────────┤
//! │ Device totals        │
//! ├──────────────────────┤
//! │ Heart rate limits    │ count-prefixed
//! ├──────────────────────┤
//! │ Laps                 │ count-prefixed, gated by recording flags
//! ├──────────────────────┤
//! │ Samples              │ gated by recording flags
//! ├──────────────────────┤
//! │ Checksum             │
//! └──────────────────────┘
//! ```
//!
//! Generations differ in field widths, time encodings, units and checksum
//! algorithm. Each is implemented by its own [`Generation`], selected by the
//! signature in the document header.

pub mod check;

mod blocks;
mod header;
mod hsr;
mod packed;
mod srd;

use thiserror::Error;
use tracing::debug;

use crate::exercise::Exercise;

use self::check::Checksum;

/// Broad classification of a failure to parse an exercise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file does not exist or cannot be read.
    FileNotFound,
    /// The signature matches no known generation.
    UnsupportedFormat,
    /// A structural or consistency check failed.
    CorruptData,
    /// The data ended before a mandatory field.
    TruncatedData,
}

/// Errors occurring while decoding a recording.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Unexpectedly reached the end of the data.
    #[error("Unexpectedly reached the end of the data at offset {offset}.")]
    EndOfData { offset: usize },
    /// No generation uses this signature.
    #[error("Unknown file signature ({family:#04X}, {model:#04X}).")]
    UnknownSignature { family: u8, model: u8 },
    /// The data is shorter than its declared length.
    #[error("Declared length ({declared}) exceeds the data length ({actual}).")]
    Truncated { declared: usize, actual: usize },
    /// The data is longer than its declared length, or the declared length
    /// cannot hold a recording.
    #[error("Declared length ({declared}) does not match the data length ({actual}).")]
    Length { declared: usize, actual: usize },
    /// Calculated and found checksums do not match.
    #[error("Calculated ({calculated:#06X}) and found ({found:#06X}) checksums do not match.")]
    Checksum { found: u16, calculated: u16 },
    /// A packed decimal byte holds a nibble above nine.
    #[error("Invalid packed decimal byte ({0:#04X}).")]
    InvalidBcd(u8),
    /// A value lies outside the range permitted for its field.
    #[error("Value {value} out of range for {field}.")]
    OutOfRange { field: &'static str, value: u32 },
    /// A recording flag is set for a channel the device cannot record.
    #[error("Recording flag set for unsupported channel `{0}`.")]
    UnsupportedChannel(&'static str),
    /// Decoded values contradict each other.
    #[error("Inconsistent data: {0}.")]
    Inconsistent(&'static str),
    /// Decoding finished before the checksum.
    #[error("Found {remaining} unread bytes before the checksum.")]
    TrailingData { remaining: usize },
}

impl DecodeError {
    /// The broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EndOfData { .. } | Self::Truncated { .. } => ErrorKind::TruncatedData,
            Self::UnknownSignature { .. } => ErrorKind::UnsupportedFormat,
            _ => ErrorKind::CorruptData,
        }
    }
}

/// A device generation's decoder.
pub(crate) trait Generation: Sync {
    /// Bytes following the declared length in the document header.
    fn signature(&self) -> [u8; 2];

    /// Algorithm of the trailing checksum.
    fn checksum(&self) -> Checksum;

    /// Decode the exercise following the document header.
    fn decode(&self, r: &mut Cursor<'_>) -> Result<Exercise, DecodeError>;
}

/// Known generations, looked up by signature.
static GENERATIONS: [&dyn Generation; 3] = [&hsr::Hsr, &srd::S610, &srd::S710];

/// Length of the document header.
const HEADER_LEN: usize = 4;
/// Length of the trailing checksum.
const CHECKSUM_LEN: usize = 2;

/// Decode a complete recording.
pub fn decode(bytes: &[u8]) -> Result<Exercise, DecodeError> {
    let mut r = Cursor::new(bytes);

    let (declared, signature) = header::document_header(r.take()?);
    let declared = usize::from(declared);

    let generation = GENERATIONS
        .iter()
        .find(|g| g.signature() == signature)
        .ok_or(DecodeError::UnknownSignature {
            family: signature[0],
            model: signature[1],
        })?;

    debug!(?signature, declared, actual = bytes.len(), "Found exercise recording.");

    let actual = bytes.len();
    if actual < declared {
        Err(DecodeError::Truncated { declared, actual })?;
    }
    if actual > declared || declared < HEADER_LEN + CHECKSUM_LEN {
        Err(DecodeError::Length { declared, actual })?;
    }

    // Apply the checksum before continuing.
    let (body, trailer) = bytes.split_at(declared - CHECKSUM_LEN);
    let found = u16::from_le_bytes(Cursor::new(trailer).take()?);
    let calculated = generation.checksum().compute(body);

    if found != calculated {
        Err(DecodeError::Checksum { found, calculated })?;
    }

    let mut r = Cursor {
        bytes: body,
        offset: HEADER_LEN,
    };

    let exercise = generation.decode(&mut r)?;

    let remaining = r.remaining();
    if remaining != 0 {
        Err(DecodeError::TrailingData { remaining })?;
    }

    Ok(exercise)
}

/// Width of an unsigned integer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Width {
    U16,
    U24,
    U32,
}

impl Width {
    /// The all-ones value marking a field as absent.
    fn marker(self) -> u32 {
        match self {
            Self::U16 => 0xFFFF,
            Self::U24 => 0xFF_FFFF,
            Self::U32 => u32::MAX,
        }
    }
}

/// A read position within a slice of recording data.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    /// Take an exact number of bytes, advancing the offset.
    pub(crate) fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let s = self.offset;
        let r = self
            .bytes
            .get(s..s + N)
            .ok_or(DecodeError::EndOfData { offset: s })?;

        let mut buf = [0; N];
        buf.copy_from_slice(r);
        self.offset += N;

        Ok(buf)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(u8::from_le_bytes(self.take()?))
    }

    pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub(crate) fn i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    /// Read an unsigned integer of the given width.
    pub(crate) fn uint(&mut self, width: Width) -> Result<u32, DecodeError> {
        Ok(match width {
            Width::U16 => self.u16()?.into(),
            Width::U24 => {
                let [a, b, c] = self.take()?;
                u32::from_le_bytes([a, b, c, 0])
            }
            Width::U32 => self.u32()?,
        })
    }

    /// Read an unsigned integer of the given width, or `None` if it holds the
    /// all-ones marker.
    pub(crate) fn counter(&mut self, width: Width) -> Result<Option<u32>, DecodeError> {
        let value = self.uint(width)?;
        Ok((value != width.marker()).then_some(value))
    }
}

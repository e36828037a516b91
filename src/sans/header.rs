//! Document and exercise headers.

use chrono::NaiveDateTime;
use tartan_bitfield::bitfield;
use tracing::warn;
use zerocopy::FromBytes;

use crate::exercise::RecordingMode;

use super::{DecodeError, packed};

/// Interval code marking an exercise recorded without samples.
const NO_RECORDING: u8 = 0xFF;

/// Decode a document header.
///
/// Returns the declared length of the document and its signature.
pub(crate) fn document_header(r: [u8; 4]) -> (u16, [u8; 2]) {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct DocumentHeader {
        length: [u8; 2],
        signature: [u8; 2],
    }

    let DocumentHeader { length, signature } = zerocopy::transmute!(r);

    (u16::from_le_bytes(length), signature)
}

/// Channels a device model is able to record.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Channels {
    pub altitude: bool,
    pub power: bool,
}

bitfield! {
    struct RecordingFlags(u8) {
        [0] heart_rate,
        [1] speed,
        [2] cadence,
        [3] altitude,
        [4] power,
        [5..7] bike: u8,
        [7] imperial,
    }
}

/// The fixed part at the start of every exercise.
#[derive(Debug)]
pub(crate) struct ExerciseHeader {
    pub start: NaiveDateTime,
    /// Encoded differently by each generation.
    pub duration: [u8; 4],
    pub mode: RecordingMode,
    pub imperial: bool,
    pub sport: u8,
    pub interval: u8,
}

impl ExerciseHeader {
    pub(crate) fn decode(r: [u8; 13], channels: Channels) -> Result<Self, DecodeError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Header {
            start: [u8; 6],
            duration: [u8; 4],
            flags: u8,
            sport: u8,
            interval: u8,
        }

        let Header {
            start,
            duration,
            flags,
            sport,
            interval,
        } = zerocopy::transmute!(r);

        let flags = RecordingFlags(flags);

        if flags.altitude() && !channels.altitude {
            Err(DecodeError::UnsupportedChannel("altitude"))?;
        }
        if flags.power() && !channels.power {
            Err(DecodeError::UnsupportedChannel("power"))?;
        }

        let bike = flags.bike();
        if bike != 0 && !flags.speed() {
            warn!(bike, "Ignoring bike number of an exercise without speed.");
        }

        let mode = RecordingMode {
            heart_rate: flags.heart_rate(),
            altitude: flags.altitude(),
            speed: flags.speed(),
            cadence: flags.cadence(),
            power: flags.power(),
            bike_number: (bike != 0 && flags.speed()).then_some(bike),
        };

        Ok(Self {
            start: packed::date_time(start)?,
            duration,
            mode,
            imperial: flags.imperial(),
            sport,
            interval,
        })
    }

    /// Look up the sport type in a device vocabulary.
    pub(crate) fn sport_type(&self, table: &[&'static str]) -> Result<&'static str, DecodeError> {
        table
            .get(usize::from(self.sport))
            .copied()
            .ok_or(DecodeError::OutOfRange {
                field: "sport type index",
                value: self.sport.into(),
            })
    }

    /// Look up the recording interval in seconds from a device table.
    pub(crate) fn recording_interval(&self, table: &[u16]) -> Result<Option<u16>, DecodeError> {
        if self.interval == NO_RECORDING {
            return Ok(None);
        }

        table
            .get(usize::from(self.interval))
            .copied()
            .map(Some)
            .ok_or(DecodeError::OutOfRange {
                field: "recording interval code",
                value: self.interval.into(),
            })
    }
}

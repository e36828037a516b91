//! A decoder for raw heart rate monitor exercise recordings, with exercise
//! statistics.
//!
//! Pulsar decodes the raw recordings of Polar S4xx/S5xx, S610 and S710 heart
//! rate monitors into a normalized [`Exercise`], and summarizes collections
//! of exercises into a [`StatisticResult`].
//!
//! Most users should begin with [`parse_exercise`] from the [`avec`] module.
//! Applications holding a recording in memory can use the I/O-free decoder
//! in the [`sans`] module.
//!
//! Values a device records only for some channels (heart rate, speed,
//! cadence, altitude, power) are `Option`s, present exactly when the
//! exercise's [`RecordingMode`] flag for that channel is set.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `serde`: implement `Serialize` for the exercise model and statistics.

pub mod avec;
pub mod exercise;
pub mod sans;
pub mod statistics;

pub use avec::{ParseError, parse_exercise};
pub use exercise::{
    AltitudeSummary, CadenceSummary, Exercise, ExerciseBuilder, FileType, HeartRateLimit, Lap,
    LapAltitude, LapSpeed, LimitKind, PowerSummary, RecordingMode, Sample, SpeedSummary,
    TemperatureSummary,
};
pub use sans::ErrorKind;
pub use statistics::{Entry, StatisticResult, Summary};

//! Sub-decoders shared by the generations.
//!
//! Each block reads only the fields whose recording flag is set; bytes of an
//! unrecorded channel are not present in the data at all.

use tartan_bitfield::bitfield;
use tracing::{debug, trace};

use crate::exercise::{
    AltitudeSummary, CadenceSummary, ExerciseBuilder, HeartRateLimit, Lap, LapAltitude, LapSpeed,
    LimitKind, PowerSummary, RecordingMode, Sample, SpeedSummary, TemperatureSummary,
};

use super::{Cursor, DecodeError, Width};

/// Most heart rate limits a device stores.
const MAX_LIMITS: u8 = 3;

/// Conversion from device units to metres and kilometres per hour.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Units {
    pub metres_per_distance: f64,
    pub kmh_per_speed: f32,
    pub metres_per_altitude: f32,
}

impl Units {
    fn distance(&self, raw: u32) -> u32 {
        (f64::from(raw) * self.metres_per_distance).round() as u32
    }

    fn speed(&self, raw: u16) -> f32 {
        f32::from(raw) * self.kmh_per_speed
    }

    fn altitude(&self, raw: i16) -> i16 {
        (f32::from(raw) * self.metres_per_altitude).round() as i16
    }

    fn climb(&self, raw: u16) -> u32 {
        (f32::from(raw) * self.metres_per_altitude).round() as u32
    }
}

/// `None` if `value` is the marker for a missing measurement.
fn unless<T: PartialEq>(value: T, marker: T) -> Option<T> {
    (value != marker).then_some(value)
}

/// Decode the summary sub-records of each recorded channel.
pub(crate) fn summaries(
    r: &mut Cursor<'_>,
    mode: &RecordingMode,
    units: &Units,
    distance: Width,
    b: &mut ExerciseBuilder,
) -> Result<(), DecodeError> {
    if mode.heart_rate {
        let [avg, max] = r.take()?;
        b.heart_rate(avg, max);
    }

    if mode.speed {
        let d = r.uint(distance)?;
        let avg = r.u16()?;
        let max = r.u16()?;

        b.speed(SpeedSummary {
            distance: units.distance(d),
            speed_avg: units.speed(avg),
            speed_max: units.speed(max),
        });
    }

    if mode.cadence {
        let [avg, max] = r.take()?;
        b.cadence(CadenceSummary { avg, max });
    }

    if mode.altitude {
        let min = r.i16()?;
        let avg = r.i16()?;
        let max = r.i16()?;
        let ascent = r.u16()?;
        let descent = r.u16()?;

        b.altitude(AltitudeSummary {
            min: units.altitude(min),
            avg: units.altitude(avg),
            max: units.altitude(max),
            ascent: units.climb(ascent),
            descent: units.climb(descent),
        });

        // Temperature is measured by the altitude sensor.
        let [min, avg, max] = r.take::<3>()?.map(|t| t as i8);
        b.temperature(TemperatureSummary { min, avg, max });
    }

    if mode.power {
        let avg = r.u16()?;
        let max = r.u16()?;
        b.power(PowerSummary { avg, max });
    }

    Ok(())
}

/// Decode energy and the device's cumulative totals.
pub(crate) fn totals(
    r: &mut Cursor<'_>,
    width: Width,
    b: &mut ExerciseBuilder,
) -> Result<(), DecodeError> {
    let energy = r.counter(Width::U16)?;
    let energy_total = r.counter(width)?;
    let exercise_time = r.counter(width)?;
    let ride_time = r.counter(width)?;
    let odometer = r.counter(width)?;

    b.energy(energy, energy_total)
        .device_totals(exercise_time, ride_time, odometer);

    Ok(())
}

bitfield! {
    struct LimitFlags(u8) {
        [0] percentage,
        [1] tracks_below,
        [2] tracks_above,
    }
}

/// Decode `count` heart rate limits, reading each of their three times with
/// `time`.
pub(crate) fn heart_rate_limits<F>(
    r: &mut Cursor<'_>,
    count: u8,
    mut time: F,
    b: &mut ExerciseBuilder,
) -> Result<(), DecodeError>
where
    F: FnMut(&mut Cursor<'_>) -> Result<u32, DecodeError>,
{
    if count > MAX_LIMITS {
        Err(DecodeError::OutOfRange {
            field: "heart rate limit count",
            value: count.into(),
        })?;
    }

    for _ in 0..count {
        let [flags, lower, upper] = r.take()?;
        let flags = LimitFlags(flags);

        let below = time(r)?;
        let within = time(r)?;
        let above = time(r)?;

        let kind = if flags.percentage() {
            LimitKind::Percentage
        } else {
            LimitKind::Absolute
        };

        if lower > upper {
            Err(DecodeError::Inconsistent("heart rate limit bounds are reversed"))?;
        }
        if kind == LimitKind::Percentage && upper > 100 {
            Err(DecodeError::OutOfRange {
                field: "heart rate limit percentage",
                value: upper.into(),
            })?;
        }

        b.push_heart_rate_limit(HeartRateLimit {
            kind,
            lower,
            upper,
            time_below: flags.tracks_below().then_some(below),
            time_within: within,
            time_above: flags.tracks_above().then_some(above),
        });
    }

    debug!(count, "Decoded heart rate limits.");

    Ok(())
}

/// Decode `count` laps, reading each split in ticks with `split`.
///
/// Splits must not decrease, and the last must equal `duration`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn laps<F>(
    r: &mut Cursor<'_>,
    count: u16,
    duration: u32,
    mode: &RecordingMode,
    units: &Units,
    distance: Width,
    mut split: F,
    b: &mut ExerciseBuilder,
) -> Result<(), DecodeError>
where
    F: FnMut(&mut Cursor<'_>) -> Result<u32, DecodeError>,
{
    let mut previous = 0;

    for index in 0..count {
        let mut lap = Lap {
            split: split(r)?,
            ..Default::default()
        };

        if lap.split < previous {
            Err(DecodeError::Inconsistent("lap splits decrease"))?;
        }
        previous = lap.split;

        if mode.heart_rate {
            let [at_split, avg, max] = r.take()?;
            lap.heart_rate_split = Some(at_split);
            lap.heart_rate_avg = Some(avg);
            lap.heart_rate_max = Some(max);
        }

        if mode.altitude {
            let altitude = r.i16()?;
            let ascent = r.u16()?;
            let [temperature] = r.take()?;

            lap.altitude = Some(LapAltitude {
                altitude: units.altitude(altitude),
                ascent: units.climb(ascent),
            });
            lap.temperature = Some(temperature as i8);
        }

        if mode.speed {
            let speed_end = r.u16()?;
            let d = r.uint(distance)?;

            lap.speed = Some(LapSpeed {
                speed_end: units.speed(speed_end),
                distance: units.distance(d),
            });
        }

        trace!(index, split = lap.split, "Decoded lap.");
        b.push_lap(lap);
    }

    if count != 0 && previous != duration {
        Err(DecodeError::Inconsistent(
            "final lap split differs from the exercise duration",
        ))?;
    }

    debug!(count, "Decoded laps.");

    Ok(())
}

/// Decode `count` samples.
///
/// Distance is not stored: it accumulates the previous sample's speed held
/// over one interval.
pub(crate) fn samples(
    r: &mut Cursor<'_>,
    count: u32,
    interval: Option<u16>,
    mode: &RecordingMode,
    units: &Units,
    b: &mut ExerciseBuilder,
) -> Result<(), DecodeError> {
    let seconds = f64::from(interval.unwrap_or(0));

    let mut distance = 0.0;
    let mut previous_speed = None;

    for _ in 0..count {
        let mut sample = Sample::default();

        if mode.heart_rate {
            sample.heart_rate = unless(r.u8()?, 0);
        }

        if mode.altitude {
            sample.altitude = unless(r.i16()?, i16::MAX).map(|a| units.altitude(a));
        }

        if mode.speed {
            sample.speed = unless(r.u16()?, u16::MAX).map(|s| units.speed(s));

            distance += f64::from(previous_speed.unwrap_or(0.0)) / 3.6 * seconds;
            sample.distance = Some(distance.round() as u32);
            previous_speed = sample.speed;
        }

        if mode.cadence {
            sample.cadence = unless(r.u8()?, u8::MAX);
        }

        b.push_sample(sample);
    }

    debug!(count, ?interval, "Decoded samples.");

    Ok(())
}

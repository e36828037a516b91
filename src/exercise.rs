//! Normalized exercise model shared by all decoders.
//!
//! An [`Exercise`] is immutable once built. Every optional value is governed
//! by a flag of its [`RecordingMode`]: when the flag is unset, the value is
//! absent, never zero. [`ExerciseBuilder::build`] enforces this, so no decoder
//! can publish a gated value for a channel that was not recorded.

use chrono::NaiveDateTime;

/// The raw format an exercise was decoded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FileType {
    /// Polar S4xx/S5xx raw recording (`.hsr`).
    S510Raw,
    /// Polar S610 raw recording (`.srd`).
    S610Raw,
    /// Polar S710 raw recording (`.srd`).
    S710Raw,
}

/// Channels active while an exercise was recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordingMode {
    pub heart_rate: bool,
    pub altitude: bool,
    pub speed: bool,
    pub cadence: bool,
    pub power: bool,
    /// Bike profile used, only for exercises recording speed.
    pub bike_number: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpeedSummary {
    /// Metres.
    pub distance: u32,
    /// Kilometres per hour.
    pub speed_avg: f32,
    /// Kilometres per hour.
    pub speed_max: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CadenceSummary {
    pub avg: u8,
    pub max: u8,
}

/// Altitudes and climbs in metres.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AltitudeSummary {
    pub min: i16,
    pub avg: i16,
    pub max: i16,
    pub ascent: u32,
    pub descent: u32,
}

/// Temperatures in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TemperatureSummary {
    pub min: i8,
    pub avg: i8,
    pub max: i8,
}

/// Power in watts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PowerSummary {
    pub avg: u16,
    pub max: u16,
}

/// How the bounds of a heart rate limit are expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LimitKind {
    /// Beats per minute.
    Absolute,
    /// Percent of the maximum heart rate.
    Percentage,
}

/// A heart rate zone with the seconds spent below, within and above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HeartRateLimit {
    pub kind: LimitKind,
    pub lower: u8,
    pub upper: u8,
    /// Absent when the device does not track it.
    pub time_below: Option<u32>,
    pub time_within: u32,
    /// Absent when the device does not track it.
    pub time_above: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LapAltitude {
    /// Metres.
    pub altitude: i16,
    /// Metres climbed since the start.
    pub ascent: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LapSpeed {
    /// Kilometres per hour at the split.
    pub speed_end: f32,
    /// Metres since the start.
    pub distance: u32,
}

/// A split marked during the exercise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Lap {
    /// Tenths of a second since the start.
    pub split: u32,
    pub heart_rate_split: Option<u8>,
    pub heart_rate_avg: Option<u8>,
    pub heart_rate_max: Option<u8>,
    pub altitude: Option<LapAltitude>,
    pub temperature: Option<i8>,
    pub speed: Option<LapSpeed>,
}

impl Lap {
    fn gate(self, mode: &RecordingMode) -> Self {
        Self {
            split: self.split,
            heart_rate_split: self.heart_rate_split.filter(|_| mode.heart_rate),
            heart_rate_avg: self.heart_rate_avg.filter(|_| mode.heart_rate),
            heart_rate_max: self.heart_rate_max.filter(|_| mode.heart_rate),
            altitude: self.altitude.filter(|_| mode.altitude),
            temperature: self.temperature.filter(|_| mode.altitude),
            speed: self.speed.filter(|_| mode.speed),
        }
    }
}

/// Values measured at one recording interval tick.
///
/// A sample carries no timestamp of its own; see
/// [`Exercise::sample_timestamp`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sample {
    pub heart_rate: Option<u8>,
    /// Metres.
    pub altitude: Option<i16>,
    /// Kilometres per hour.
    pub speed: Option<f32>,
    pub cadence: Option<u8>,
    /// Metres since the start.
    pub distance: Option<u32>,
}

impl Sample {
    fn gate(self, mode: &RecordingMode) -> Self {
        Self {
            heart_rate: self.heart_rate.filter(|_| mode.heart_rate),
            altitude: self.altitude.filter(|_| mode.altitude),
            speed: self.speed.filter(|_| mode.speed),
            cadence: self.cadence.filter(|_| mode.cadence),
            distance: self.distance.filter(|_| mode.speed),
        }
    }
}

/// A single decoded exercise recording.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Exercise {
    file_type: FileType,
    device_name: String,
    start: NaiveDateTime,
    sport_type: String,
    recording_interval: Option<u16>,
    duration_ticks: u32,
    recording_mode: RecordingMode,
    heart_rate_avg: Option<u8>,
    heart_rate_max: Option<u8>,
    energy: Option<u32>,
    energy_total: Option<u32>,
    sum_exercise_time: Option<u32>,
    sum_ride_time: Option<u32>,
    odometer: Option<u32>,
    speed: Option<SpeedSummary>,
    cadence: Option<CadenceSummary>,
    altitude: Option<AltitudeSummary>,
    temperature: Option<TemperatureSummary>,
    power: Option<PowerSummary>,
    heart_rate_limits: Box<[HeartRateLimit]>,
    laps: Box<[Lap]>,
    samples: Box<[Sample]>,
}

impl Exercise {
    /// Start building an exercise.
    pub fn builder(
        file_type: FileType,
        device_name: impl Into<String>,
        start: NaiveDateTime,
    ) -> ExerciseBuilder {
        ExerciseBuilder {
            file_type,
            device_name: device_name.into(),
            start,
            sport_type: String::new(),
            recording_interval: None,
            duration_ticks: 0,
            recording_mode: RecordingMode::default(),
            heart_rate_avg: None,
            heart_rate_max: None,
            energy: None,
            energy_total: None,
            sum_exercise_time: None,
            sum_ride_time: None,
            odometer: None,
            speed: None,
            cadence: None,
            altitude: None,
            temperature: None,
            power: None,
            heart_rate_limits: Vec::new(),
            laps: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Device-local start time.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn sport_type(&self) -> &str {
        &self.sport_type
    }

    /// Seconds between samples, absent if no samples were recorded.
    pub fn recording_interval(&self) -> Option<u16> {
        self.recording_interval
    }

    /// Duration in tenths of a second, as counted by the device.
    pub fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }

    /// Duration in whole seconds. Tenths are truncated.
    pub fn duration(&self) -> u32 {
        self.duration_ticks / 10
    }

    pub fn recording_mode(&self) -> &RecordingMode {
        &self.recording_mode
    }

    pub fn heart_rate_avg(&self) -> Option<u8> {
        self.heart_rate_avg
    }

    pub fn heart_rate_max(&self) -> Option<u8> {
        self.heart_rate_max
    }

    /// Kilocalories burned during this exercise.
    pub fn energy(&self) -> Option<u32> {
        self.energy
    }

    /// Kilocalories accumulated by the device over its lifetime.
    pub fn energy_total(&self) -> Option<u32> {
        self.energy_total
    }

    /// Minutes of exercise accumulated by the device.
    pub fn sum_exercise_time(&self) -> Option<u32> {
        self.sum_exercise_time
    }

    /// Minutes of riding accumulated by the device.
    pub fn sum_ride_time(&self) -> Option<u32> {
        self.sum_ride_time
    }

    /// Kilometres accumulated by the device.
    pub fn odometer(&self) -> Option<u32> {
        self.odometer
    }

    pub fn speed(&self) -> Option<&SpeedSummary> {
        self.speed.as_ref()
    }

    pub fn cadence(&self) -> Option<&CadenceSummary> {
        self.cadence.as_ref()
    }

    pub fn altitude(&self) -> Option<&AltitudeSummary> {
        self.altitude.as_ref()
    }

    pub fn temperature(&self) -> Option<&TemperatureSummary> {
        self.temperature.as_ref()
    }

    pub fn power(&self) -> Option<&PowerSummary> {
        self.power.as_ref()
    }

    pub fn heart_rate_limits(&self) -> &[HeartRateLimit] {
        &self.heart_rate_limits
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Milliseconds from the start to the sample at `index`.
    pub fn sample_timestamp(&self, index: usize) -> Option<u64> {
        let interval = self.recording_interval?;
        (index < self.samples.len()).then(|| index as u64 * u64::from(interval) * 1000)
    }

    /// Iterate over samples paired with their timestamps in milliseconds.
    pub fn timed_samples(&self) -> impl Iterator<Item = (u64, &Sample)> {
        let step = u64::from(self.recording_interval.unwrap_or(0)) * 1000;
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, s)| (i as u64 * step, s))
    }
}

/// Accumulates the parts of an [`Exercise`] while it is decoded.
#[derive(Clone, Debug)]
pub struct ExerciseBuilder {
    file_type: FileType,
    device_name: String,
    start: NaiveDateTime,
    sport_type: String,
    recording_interval: Option<u16>,
    duration_ticks: u32,
    recording_mode: RecordingMode,
    heart_rate_avg: Option<u8>,
    heart_rate_max: Option<u8>,
    energy: Option<u32>,
    energy_total: Option<u32>,
    sum_exercise_time: Option<u32>,
    sum_ride_time: Option<u32>,
    odometer: Option<u32>,
    speed: Option<SpeedSummary>,
    cadence: Option<CadenceSummary>,
    altitude: Option<AltitudeSummary>,
    temperature: Option<TemperatureSummary>,
    power: Option<PowerSummary>,
    heart_rate_limits: Vec<HeartRateLimit>,
    laps: Vec<Lap>,
    samples: Vec<Sample>,
}

impl ExerciseBuilder {
    pub fn sport_type(&mut self, sport_type: impl Into<String>) -> &mut Self {
        self.sport_type = sport_type.into();
        self
    }

    pub fn recording_interval(&mut self, seconds: Option<u16>) -> &mut Self {
        self.recording_interval = seconds;
        self
    }

    pub fn duration_ticks(&mut self, ticks: u32) -> &mut Self {
        self.duration_ticks = ticks;
        self
    }

    pub fn recording_mode(&mut self, mode: RecordingMode) -> &mut Self {
        self.recording_mode = mode;
        self
    }

    pub fn heart_rate(&mut self, avg: u8, max: u8) -> &mut Self {
        self.heart_rate_avg = Some(avg);
        self.heart_rate_max = Some(max);
        self
    }

    pub fn energy(&mut self, energy: Option<u32>, total: Option<u32>) -> &mut Self {
        self.energy = energy;
        self.energy_total = total;
        self
    }

    pub fn device_totals(
        &mut self,
        exercise_time: Option<u32>,
        ride_time: Option<u32>,
        odometer: Option<u32>,
    ) -> &mut Self {
        self.sum_exercise_time = exercise_time;
        self.sum_ride_time = ride_time;
        self.odometer = odometer;
        self
    }

    pub fn speed(&mut self, speed: SpeedSummary) -> &mut Self {
        self.speed = Some(speed);
        self
    }

    pub fn cadence(&mut self, cadence: CadenceSummary) -> &mut Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn altitude(&mut self, altitude: AltitudeSummary) -> &mut Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn temperature(&mut self, temperature: TemperatureSummary) -> &mut Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn power(&mut self, power: PowerSummary) -> &mut Self {
        self.power = Some(power);
        self
    }

    pub fn push_heart_rate_limit(&mut self, limit: HeartRateLimit) -> &mut Self {
        self.heart_rate_limits.push(limit);
        self
    }

    pub fn push_lap(&mut self, lap: Lap) -> &mut Self {
        self.laps.push(lap);
        self
    }

    pub fn push_sample(&mut self, sample: Sample) -> &mut Self {
        self.samples.push(sample);
        self
    }

    /// Freeze the accumulated parts into an exercise.
    ///
    /// Values gated by a recording mode flag which is unset are dropped.
    pub fn build(self) -> Exercise {
        let mut mode = self.recording_mode;
        mode.bike_number = mode.bike_number.filter(|_| mode.speed);

        let hr = mode.heart_rate;

        Exercise {
            file_type: self.file_type,
            device_name: self.device_name,
            start: self.start,
            sport_type: self.sport_type,
            recording_interval: self.recording_interval,
            duration_ticks: self.duration_ticks,
            heart_rate_avg: self.heart_rate_avg.filter(|_| hr),
            heart_rate_max: self.heart_rate_max.filter(|_| hr),
            energy: self.energy,
            energy_total: self.energy_total,
            sum_exercise_time: self.sum_exercise_time,
            sum_ride_time: self.sum_ride_time,
            odometer: self.odometer,
            speed: self.speed.filter(|_| mode.speed),
            cadence: self.cadence.filter(|_| mode.cadence),
            altitude: self.altitude.filter(|_| mode.altitude),
            temperature: self.temperature.filter(|_| mode.altitude),
            power: self.power.filter(|_| mode.power),
            heart_rate_limits: self.heart_rate_limits.into_boxed_slice(),
            laps: self.laps.into_iter().map(|l| l.gate(&mode)).collect(),
            samples: self.samples.into_iter().map(|s| s.gate(&mode)).collect(),
            recording_mode: mode,
        }
    }
}

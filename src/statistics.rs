//! Summary statistics over a collection of exercises.
//!
//! Distance, average speed and duration are always recorded, so their
//! averages divide by the number of exercises and zero is a valid minimum.
//! Ascent, descent, average heart rate and calories are only recorded by
//! some devices: an exercise without the value (or with zero, which devices
//! store when nothing was recorded) is left out of that metric entirely,
//! including its average's denominator.

use tracing::debug;

use crate::exercise::Exercise;

/// Fixed-point steps per kilometre, or per kilometre per hour. Distance and
/// speed are summed as integers, so their totals do not depend on order.
const SCALE: f64 = 1000.0;

/// Convert to fixed point. Negative values and NaN become zero.
fn fixed(value: f64) -> u64 {
    (value * SCALE).round() as u64
}

fn unfixed(value: u64) -> f64 {
    value as f64 / SCALE
}

/// Values an exercise contributes to the statistics.
pub trait Summary {
    /// Kilometres.
    fn distance(&self) -> f64;
    /// Kilometres per hour.
    fn avg_speed(&self) -> f64;
    /// Seconds.
    fn duration(&self) -> u32;
    /// Metres.
    fn ascent(&self) -> Option<u32>;
    /// Metres.
    fn descent(&self) -> Option<u32>;
    /// Beats per minute.
    fn avg_heart_rate(&self) -> Option<u32>;
    /// Kilocalories.
    fn calories(&self) -> Option<u32>;
}

impl Summary for Exercise {
    fn distance(&self) -> f64 {
        self.speed().map_or(0.0, |s| f64::from(s.distance) / 1000.0)
    }

    fn avg_speed(&self) -> f64 {
        self.speed().map_or(0.0, |s| f64::from(s.speed_avg))
    }

    fn duration(&self) -> u32 {
        Exercise::duration(self)
    }

    fn ascent(&self) -> Option<u32> {
        self.altitude().map(|a| a.ascent)
    }

    fn descent(&self) -> Option<u32> {
        self.altitude().map(|a| a.descent)
    }

    fn avg_heart_rate(&self) -> Option<u32> {
        self.heart_rate_avg().map(u32::from)
    }

    fn calories(&self) -> Option<u32> {
        self.energy()
    }
}

/// A logbook record of an exercise, for exercises not decoded from a
/// recording.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    pub distance: f64,
    pub avg_speed: f64,
    pub duration: u32,
    pub ascent: Option<u32>,
    pub descent: Option<u32>,
    pub avg_heart_rate: Option<u32>,
    pub calories: Option<u32>,
}

impl Summary for Entry {
    fn distance(&self) -> f64 {
        self.distance
    }

    fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    fn duration(&self) -> u32 {
        self.duration
    }

    fn ascent(&self) -> Option<u32> {
        self.ascent
    }

    fn descent(&self) -> Option<u32> {
        self.descent
    }

    fn avg_heart_rate(&self) -> Option<u32> {
        self.avg_heart_rate
    }

    fn calories(&self) -> Option<u32> {
        self.calories
    }
}

/// Sum and extremes of a metric every exercise records.
#[derive(Clone, Copy, Debug, Default)]
struct Always<T> {
    total: T,
    min: Option<T>,
    max: Option<T>,
}

impl<T: Copy + PartialOrd + core::ops::AddAssign> Always<T> {
    fn add(&mut self, value: T) {
        self.total += value;
        // Strict comparisons keep the first of equal values.
        if self.min.is_none_or(|m| value < m) {
            self.min = Some(value);
        }
        if self.max.is_none_or(|m| value > m) {
            self.max = Some(value);
        }
    }
}

/// Sum, count and extremes of a metric only some exercises record.
#[derive(Clone, Copy, Debug, Default)]
struct Recorded {
    total: u64,
    count: u32,
    min: Option<u32>,
    max: Option<u32>,
}

impl Recorded {
    fn add(&mut self, value: Option<u32>) {
        let Some(value) = value.filter(|v| *v != 0) else {
            return;
        };

        self.total += u64::from(value);
        self.count += 1;
        if self.min.is_none_or(|m| value < m) {
            self.min = Some(value);
        }
        if self.max.is_none_or(|m| value > m) {
            self.max = Some(value);
        }
    }

    fn avg(&self) -> Option<u32> {
        (self.count != 0).then(|| (self.total / u64::from(self.count)) as u32)
    }
}

/// Statistics calculated over a collection of exercises.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatisticResult {
    exercise_count: u32,

    total_distance: f64,
    total_duration: u64,
    total_ascent: u64,
    total_descent: u64,
    total_calories: u64,

    avg_distance: f64,
    avg_speed: f64,
    avg_duration: u32,
    avg_ascent: Option<u32>,
    avg_descent: Option<u32>,
    avg_heart_rate: Option<u32>,
    avg_calories: Option<u32>,

    min_distance: f64,
    min_avg_speed: f64,
    min_duration: u32,
    min_ascent: Option<u32>,
    min_descent: Option<u32>,
    min_avg_heart_rate: Option<u32>,
    min_calories: Option<u32>,

    max_distance: f64,
    max_avg_speed: f64,
    max_duration: u32,
    max_ascent: Option<u32>,
    max_descent: Option<u32>,
    max_avg_heart_rate: Option<u32>,
    max_calories: Option<u32>,
}

impl StatisticResult {
    /// Calculate statistics in a single pass over `exercises`.
    pub fn calculate<'a, S, I>(exercises: I) -> Self
    where
        S: Summary + ?Sized + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut count = 0u32;
        let mut distance = Always::<u64>::default();
        let mut speed = Always::<u64>::default();
        let mut duration = Always::<u64>::default();
        let mut ascent = Recorded::default();
        let mut descent = Recorded::default();
        let mut heart_rate = Recorded::default();
        let mut calories = Recorded::default();

        for e in exercises {
            count += 1;
            distance.add(fixed(e.distance()));
            speed.add(fixed(e.avg_speed()));
            duration.add(e.duration().into());
            ascent.add(e.ascent());
            descent.add(e.descent());
            heart_rate.add(e.avg_heart_rate());
            calories.add(e.calories());
        }

        debug!(count, "Calculated exercise statistics.");

        let per_exercise = |total: u64| {
            if count != 0 {
                total as f64 / (SCALE * f64::from(count))
            } else {
                0.0
            }
        };

        Self {
            exercise_count: count,

            total_distance: unfixed(distance.total),
            total_duration: duration.total,
            total_ascent: ascent.total,
            total_descent: descent.total,
            total_calories: calories.total,

            avg_distance: per_exercise(distance.total),
            avg_speed: per_exercise(speed.total),
            avg_duration: duration
                .total
                .checked_div(count.into())
                .map_or(0, |d| d as u32),
            avg_ascent: ascent.avg(),
            avg_descent: descent.avg(),
            avg_heart_rate: heart_rate.avg(),
            avg_calories: calories.avg(),

            min_distance: distance.min.map_or(0.0, unfixed),
            min_avg_speed: speed.min.map_or(0.0, unfixed),
            min_duration: duration.min.map_or(0, |d| d as u32),
            min_ascent: ascent.min,
            min_descent: descent.min,
            min_avg_heart_rate: heart_rate.min,
            min_calories: calories.min,

            max_distance: distance.max.map_or(0.0, unfixed),
            max_avg_speed: speed.max.map_or(0.0, unfixed),
            max_duration: duration.max.map_or(0, |d| d as u32),
            max_ascent: ascent.max,
            max_descent: descent.max,
            max_avg_heart_rate: heart_rate.max,
            max_calories: calories.max,
        }
    }

    pub fn exercise_count(&self) -> u32 {
        self.exercise_count
    }

    /// Kilometres.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Seconds.
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    pub fn total_ascent(&self) -> u64 {
        self.total_ascent
    }

    pub fn total_descent(&self) -> u64 {
        self.total_descent
    }

    pub fn total_calories(&self) -> u64 {
        self.total_calories
    }

    pub fn avg_distance(&self) -> f64 {
        self.avg_distance
    }

    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    /// Seconds, truncated.
    pub fn avg_duration(&self) -> u32 {
        self.avg_duration
    }

    pub fn avg_ascent(&self) -> Option<u32> {
        self.avg_ascent
    }

    pub fn avg_descent(&self) -> Option<u32> {
        self.avg_descent
    }

    pub fn avg_heart_rate(&self) -> Option<u32> {
        self.avg_heart_rate
    }

    pub fn avg_calories(&self) -> Option<u32> {
        self.avg_calories
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn min_avg_speed(&self) -> f64 {
        self.min_avg_speed
    }

    pub fn min_duration(&self) -> u32 {
        self.min_duration
    }

    pub fn min_ascent(&self) -> Option<u32> {
        self.min_ascent
    }

    pub fn min_descent(&self) -> Option<u32> {
        self.min_descent
    }

    pub fn min_avg_heart_rate(&self) -> Option<u32> {
        self.min_avg_heart_rate
    }

    pub fn min_calories(&self) -> Option<u32> {
        self.min_calories
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn max_avg_speed(&self) -> f64 {
        self.max_avg_speed
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    pub fn max_ascent(&self) -> Option<u32> {
        self.max_ascent
    }

    pub fn max_descent(&self) -> Option<u32> {
        self.max_descent
    }

    pub fn max_avg_heart_rate(&self) -> Option<u32> {
        self.max_avg_heart_rate
    }

    pub fn max_calories(&self) -> Option<u32> {
        self.max_calories
    }
}

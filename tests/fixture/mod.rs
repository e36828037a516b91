#![allow(dead_code)]

//! Encoder producing recordings for the decoder tests.

use std::path::PathBuf;

use tempfile::TempDir;

pub const HEART_RATE: u8 = 1 << 0;
pub const SPEED: u8 = 1 << 1;
pub const CADENCE: u8 = 1 << 2;
pub const ALTITUDE: u8 = 1 << 3;
pub const POWER: u8 = 1 << 4;
pub const IMPERIAL: u8 = 1 << 7;

pub const fn bike(number: u8) -> u8 {
    number << 5
}

pub const TRACKS_BELOW: u8 = 1 << 1;
pub const TRACKS_ABOVE: u8 = 1 << 2;
pub const PERCENTAGE: u8 = 1 << 0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Model {
    #[default]
    Hsr,
    S610,
    S710,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Limit {
    pub flags: u8,
    pub lower: u8,
    pub upper: u8,
    /// Below, within and above, in seconds.
    pub times: [u32; 3],
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RawLap {
    pub split: u32,
    pub heart_rate: Option<[u8; 3]>,
    pub altitude: Option<(i16, u16, i8)>,
    pub speed: Option<(u16, u32)>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RawSample {
    pub heart_rate: Option<u8>,
    pub altitude: Option<i16>,
    pub speed: Option<u16>,
    pub cadence: Option<u8>,
}

/// A recording in device units. Optional parts are written when present,
/// regardless of the flags, so tests can produce inconsistent data.
#[derive(Clone, Debug, Default)]
pub struct Recording {
    pub model: Model,
    /// Seconds, minutes, hours, day, month and years since 2000.
    pub start: [u8; 6],
    /// Tenths of a second.
    pub duration: u32,
    pub flags: u8,
    pub sport: u8,
    pub interval: u8,
    pub heart_rate: Option<[u8; 2]>,
    pub speed: Option<(u32, u16, u16)>,
    pub cadence: Option<[u8; 2]>,
    pub altitude: Option<([i16; 3], u16, u16)>,
    pub temperature: [i8; 3],
    pub power: Option<[u16; 2]>,
    pub energy: u16,
    /// Energy total, exercise time, ride time and odometer.
    pub totals: [u32; 4],
    pub limits: Vec<Limit>,
    pub laps: Vec<RawLap>,
    pub samples: Vec<RawSample>,
}

impl Recording {
    pub fn encode(&self) -> Vec<u8> {
        let hsr = self.model == Model::Hsr;
        let mut w: Vec<u8> = Vec::new();

        w.extend([0, 0]);
        w.extend(match self.model {
            Model::Hsr => [b'H', 0x05],
            Model::S610 => [b'S', 0x06],
            Model::S710 => [b'S', 0x07],
        });

        w.extend(self.start.map(bcd));
        w.extend(self.ticks(self.duration));
        w.extend([self.flags, self.sport, self.interval]);

        if let Some(hr) = self.heart_rate {
            w.extend(hr);
        }
        if let Some((distance, avg, max)) = self.speed {
            w.extend(self.distance(distance));
            w.extend(avg.to_le_bytes());
            w.extend(max.to_le_bytes());
        }
        if let Some(cadence) = self.cadence {
            w.extend(cadence);
        }
        if let Some((altitudes, ascent, descent)) = self.altitude {
            for a in altitudes {
                w.extend(a.to_le_bytes());
            }
            w.extend(ascent.to_le_bytes());
            w.extend(descent.to_le_bytes());
            w.extend(self.temperature.map(|t| t as u8));
        }
        if let Some(power) = self.power {
            for p in power {
                w.extend(p.to_le_bytes());
            }
        }

        w.extend(self.energy.to_le_bytes());
        for total in self.totals {
            if hsr {
                w.extend(&total.to_le_bytes()[..3]);
            } else {
                w.extend(total.to_le_bytes());
            }
        }

        w.push(self.limits.len() as u8);
        for limit in &self.limits {
            w.extend([limit.flags, limit.lower, limit.upper]);
            for time in limit.times {
                if hsr {
                    w.extend(clock(time));
                } else {
                    w.extend(time.to_le_bytes());
                }
            }
        }

        if hsr {
            w.push(self.laps.len() as u8);
        } else {
            w.extend((self.laps.len() as u16).to_le_bytes());
        }
        for lap in &self.laps {
            w.extend(self.ticks(lap.split));
            if let Some(hr) = lap.heart_rate {
                w.extend(hr);
            }
            if let Some((altitude, ascent, temperature)) = lap.altitude {
                w.extend(altitude.to_le_bytes());
                w.extend(ascent.to_le_bytes());
                w.push(temperature as u8);
            }
            if let Some((speed, distance)) = lap.speed {
                w.extend(speed.to_le_bytes());
                w.extend(self.distance(distance));
            }
        }

        if !hsr {
            w.extend((self.samples.len() as u16).to_le_bytes());
        }
        for sample in &self.samples {
            if let Some(hr) = sample.heart_rate {
                w.push(hr);
            }
            if let Some(altitude) = sample.altitude {
                w.extend(altitude.to_le_bytes());
            }
            if let Some(speed) = sample.speed {
                w.extend(speed.to_le_bytes());
            }
            if let Some(cadence) = sample.cadence {
                w.push(cadence);
            }
        }

        let length = (w.len() + 2) as u16;
        w[..2].copy_from_slice(&length.to_le_bytes());

        let checksum = if hsr { crc16(&w) } else { sum16(&w) };
        w.extend(checksum.to_le_bytes());

        w
    }

    fn ticks(&self, ticks: u32) -> Vec<u8> {
        if self.model == Model::Hsr {
            let seconds = ticks / 10;
            let mut r = vec![(ticks % 10) as u8];
            r.extend(clock(seconds));
            r
        } else {
            ticks.to_le_bytes().to_vec()
        }
    }

    fn distance(&self, distance: u32) -> Vec<u8> {
        if self.model == Model::Hsr {
            (distance as u16).to_le_bytes().to_vec()
        } else {
            distance.to_le_bytes().to_vec()
        }
    }
}

pub fn bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Seconds as packed seconds, minutes and hours.
fn clock(seconds: u32) -> [u8; 3] {
    [
        bcd((seconds % 60) as u8),
        bcd((seconds / 60 % 60) as u8),
        bcd((seconds / 3600) as u8),
    ]
}

/// CRC-16/ARC, computed bitwise.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for b in data {
        crc ^= u16::from(*b);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xA001
            } else {
                crc >> 1
            };
        }
    }
    crc
}

pub fn sum16(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
}

/// Recompute the checksum of a recording after tampering with it.
pub fn reseal(model: Model, bytes: &mut [u8]) {
    let (body, trailer) = bytes.split_at_mut(bytes.len() - 2);
    let checksum = if model == Model::Hsr {
        crc16(body)
    } else {
        sum16(body)
    };
    trailer.copy_from_slice(&checksum.to_le_bytes());
}

/// A temporary directory holding recordings.
pub struct Fixtures(TempDir);

impl Fixtures {
    pub fn new() -> Self {
        Self(tempfile::tempdir().unwrap())
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.0.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

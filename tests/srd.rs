mod fixture;

use chrono::NaiveDate;
use fixture::{
    ALTITUDE, CADENCE, Fixtures, HEART_RATE, IMPERIAL, Limit, Model, PERCENTAGE, POWER, RawLap,
    RawSample, Recording, SPEED, TRACKS_BELOW, bike,
};
use pulsar::{ErrorKind, FileType, LimitKind, avec::Cause, parse_exercise, sans::DecodeError};

/// A mountain bike exercise recording every channel, sampled every five
/// seconds.
fn mountain_bike() -> Recording {
    let samples = (0..10)
        .map(|i| RawSample {
            heart_rate: Some(120 + i as u8),
            altitude: Some(if i == 3 { i16::MAX } else { 100 + i * 10 }),
            speed: Some(180),
            cadence: Some(if i == 5 { u8::MAX } else { 90 }),
        })
        .collect();

    Recording {
        model: Model::S710,
        start: [0, 30, 9, 15, 6, 5],
        duration: 36_005,
        flags: HEART_RATE | SPEED | CADENCE | ALTITUDE | POWER | bike(1),
        sport: 3,
        interval: 1,
        heart_rate: Some([140, 175]),
        speed: Some((42_500, 255, 512)),
        cadence: Some([85, 110]),
        altitude: Some(([120, 340, 812], 950, 930)),
        temperature: [-3, 5, 11],
        power: Some([210, 640]),
        energy: 780,
        totals: [120_000, 50_000, 20_000, 9_000],
        limits: vec![
            Limit {
                flags: PERCENTAGE | TRACKS_BELOW,
                lower: 60,
                upper: 80,
                times: [600, 2_400, 600],
            },
            Limit {
                flags: 0,
                lower: 150,
                upper: 170,
                times: [0, 1_200, 0],
            },
        ],
        laps: vec![
            RawLap {
                split: 18_000,
                heart_rate: Some([150, 142, 168]),
                altitude: Some((300, 400, 17)),
                speed: Some((250, 21_000)),
            },
            RawLap {
                split: 36_005,
                heart_rate: Some([138, 139, 175]),
                altitude: Some((125, 950, 9)),
                speed: Some((0, 42_500)),
            },
        ],
        samples,
        ..Default::default()
    }
}

/// A road exercise on the S610 with heart rate and speed in imperial units,
/// recorded without samples.
fn road() -> Recording {
    Recording {
        model: Model::S610,
        start: [45, 15, 7, 1, 10, 4],
        duration: 18_000,
        flags: HEART_RATE | SPEED | IMPERIAL,
        sport: 0,
        interval: 0xFF,
        heart_rate: Some([133, 160]),
        speed: Some((1_000, 100, 200)),
        energy: 410,
        totals: [u32::MAX; 4],
        laps: vec![RawLap {
            split: 18_000,
            heart_rate: Some([140, 133, 160]),
            speed: Some((90, 1_000)),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[test]
fn parse_s710() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("mountain-bike.srd", &mountain_bike().encode());

    let exercise = parse_exercise(&path).unwrap();

    assert_eq!(exercise.file_type(), FileType::S710Raw);
    assert_eq!(exercise.device_name(), "Polar S710");
    assert_eq!(
        exercise.start(),
        NaiveDate::from_ymd_opt(2005, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    );
    assert_eq!(exercise.sport_type(), "OwnZone");
    assert_eq!(exercise.duration(), 3_600);
    assert_eq!(exercise.recording_interval(), Some(5));

    let mode = exercise.recording_mode();
    assert!(mode.heart_rate && mode.speed && mode.cadence && mode.altitude && mode.power);
    assert_eq!(mode.bike_number, Some(1));

    let speed = exercise.speed().unwrap();
    assert_eq!(speed.distance, 42_500);
    assert!((speed.speed_avg - 25.5).abs() < 1e-4);
    assert!((speed.speed_max - 51.2).abs() < 1e-4);

    let cadence = exercise.cadence().unwrap();
    assert_eq!((cadence.avg, cadence.max), (85, 110));

    let altitude = exercise.altitude().unwrap();
    assert_eq!((altitude.min, altitude.avg, altitude.max), (120, 340, 812));
    assert_eq!((altitude.ascent, altitude.descent), (950, 930));

    let temperature = exercise.temperature().unwrap();
    assert_eq!((temperature.min, temperature.avg, temperature.max), (-3, 5, 11));

    let power = exercise.power().unwrap();
    assert_eq!((power.avg, power.max), (210, 640));

    assert_eq!(exercise.energy(), Some(780));
    assert_eq!(exercise.odometer(), Some(9_000));
}

#[test]
fn parse_s710_limits_and_laps() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("mountain-bike.srd", &mountain_bike().encode());

    let exercise = parse_exercise(&path).unwrap();

    let limits = exercise.heart_rate_limits();
    assert_eq!(limits.len(), 2);
    assert_eq!(limits[0].kind, LimitKind::Percentage);
    assert_eq!(limits[0].time_below, Some(600));
    assert_eq!(limits[0].time_within, 2_400);
    assert_eq!(limits[0].time_above, None);
    assert_eq!(limits[1].kind, LimitKind::Absolute);
    assert_eq!(limits[1].time_below, None);

    let laps = exercise.laps();
    assert_eq!(laps.len(), 2);
    assert_eq!(laps[0].heart_rate_split, Some(150));
    let altitude = laps[0].altitude.unwrap();
    assert_eq!((altitude.altitude, altitude.ascent), (300, 400));
    assert_eq!(laps[0].temperature, Some(17));
    let speed = laps[0].speed.unwrap();
    assert!((speed.speed_end - 25.0).abs() < 1e-4);
    assert_eq!(speed.distance, 21_000);
    assert_eq!(laps[1].split, 36_005);
}

#[test]
fn parse_s710_samples() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("mountain-bike.srd", &mountain_bike().encode());

    let exercise = parse_exercise(&path).unwrap();
    let samples = exercise.samples();

    assert_eq!(samples.len(), 10);
    assert_eq!(exercise.sample_timestamp(9), Some(45_000));

    assert_eq!(samples[0].heart_rate, Some(120));
    assert_eq!(samples[2].altitude, Some(120));
    assert_eq!(samples[3].altitude, None);
    assert_eq!(samples[4].cadence, Some(90));
    assert_eq!(samples[5].cadence, None);

    // 18 km/h held over five seconds covers 25 m.
    assert_eq!(samples[0].distance, Some(0));
    assert_eq!(samples[1].distance, Some(25));
    assert_eq!(samples[9].distance, Some(225));
}

#[test]
fn parse_s610_imperial() {
    let fixtures = Fixtures::new();
    let path = fixtures.write("road.srd", &road().encode());

    let exercise = parse_exercise(&path).unwrap();

    assert_eq!(exercise.file_type(), FileType::S610Raw);
    assert_eq!(exercise.device_name(), "Polar S610");
    assert_eq!(exercise.sport_type(), "Basic");
    assert_eq!(exercise.recording_interval(), None);
    assert!(exercise.samples().is_empty());

    let speed = exercise.speed().unwrap();
    assert_eq!(speed.distance, 914);
    assert!((speed.speed_avg - 16.09344).abs() < 1e-4);
    assert_eq!(exercise.laps()[0].speed.unwrap().distance, 914);

    assert_eq!(exercise.energy_total(), None);
    assert_eq!(exercise.sum_exercise_time(), None);
    assert_eq!(exercise.sum_ride_time(), None);
    assert_eq!(exercise.odometer(), None);
}

#[test]
fn s610_rejects_altitude() {
    let mut recording = road();
    recording.flags |= ALTITUDE;
    recording.altitude = Some(([0, 0, 0], 0, 0));

    let fixtures = Fixtures::new();
    let path = fixtures.write("altitude.srd", &recording.encode());

    let err = parse_exercise(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptData);
    assert!(matches!(
        err.cause(),
        Cause::Decode(DecodeError::UnsupportedChannel("altitude"))
    ));
}

#[test]
fn samples_require_interval() {
    let mut recording = road();
    recording.samples = vec![
        RawSample {
            heart_rate: Some(130),
            speed: Some(100),
            ..Default::default()
        };
        3
    ];

    let fixtures = Fixtures::new();
    let path = fixtures.write("samples.srd", &recording.encode());

    let err = parse_exercise(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptData);
}

#[test]
fn percentage_limit_out_of_range() {
    let mut recording = mountain_bike();
    recording.limits[0].upper = 120;

    let fixtures = Fixtures::new();
    let path = fixtures.write("limits.srd", &recording.encode());

    let err = parse_exercise(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptData);
    assert!(matches!(
        err.cause(),
        Cause::Decode(DecodeError::OutOfRange { value: 120, .. })
    ));
}

#[test]
fn parse_s710_imperial_altitude() {
    let recording = Recording {
        model: Model::S710,
        start: [0, 0, 8, 2, 7, 6],
        duration: 600,
        flags: HEART_RATE | ALTITUDE | IMPERIAL,
        sport: 4,
        interval: 3,
        heart_rate: Some([130, 150]),
        altitude: Some(([100, 1_000, 3_281], 1_000, 500)),
        temperature: [14, 16, 19],
        laps: vec![RawLap {
            split: 600,
            heart_rate: Some([140, 130, 150]),
            altitude: Some((1_640, 656, 15)),
            ..Default::default()
        }],
        samples: vec![
            RawSample {
                heart_rate: Some(128),
                altitude: Some(328),
                ..Default::default()
            },
            RawSample {
                heart_rate: Some(135),
                altitude: Some(i16::MAX),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let fixtures = Fixtures::new();
    let path = fixtures.write("hill.srd", &recording.encode());

    let exercise = parse_exercise(&path).unwrap();

    assert_eq!(exercise.sport_type(), "Other");
    assert_eq!(exercise.recording_interval(), Some(60));

    let altitude = exercise.altitude().unwrap();
    assert_eq!((altitude.min, altitude.avg, altitude.max), (30, 305, 1_000));
    assert_eq!((altitude.ascent, altitude.descent), (305, 152));

    let lap = exercise.laps()[0].altitude.unwrap();
    assert_eq!((lap.altitude, lap.ascent), (500, 200));
    assert_eq!(exercise.laps()[0].temperature, Some(15));

    let samples = exercise.samples();
    assert_eq!(samples[0].altitude, Some(100));
    assert_eq!(samples[1].altitude, None);
}

#[test]
fn checksum_mismatch() {
    let mut bytes = mountain_bike().encode();
    bytes[20] ^= 0x01;

    let fixtures = Fixtures::new();
    let path = fixtures.write("mountain-bike.srd", &bytes);

    let err = parse_exercise(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptData);
    assert!(matches!(
        err.cause(),
        Cause::Decode(DecodeError::Checksum { .. })
    ));
}

#[test]
fn s610_rejects_power() {
    let mut recording = road();
    recording.flags |= POWER;
    recording.power = Some([200, 400]);

    let fixtures = Fixtures::new();
    let path = fixtures.write("power.srd", &recording.encode());

    let err = parse_exercise(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CorruptData);
    assert!(matches!(
        err.cause(),
        Cause::Decode(DecodeError::UnsupportedChannel("power"))
    ));
}

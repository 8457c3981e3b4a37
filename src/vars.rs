use std::time::Duration;

/* # ephemeris */

pub const PERIHELION_LON: [f64; 2] = [282.9404, 4.70935e-5]; // longitude of perihelion and its daily drift
pub const ECCENTRICITY: [f64; 2] = [0.016709, -1.151e-9]; // eccentricity of the earth orbit
pub const MEAN_ANOMALY: [f64; 2] = [356.0470, 0.9856002585]; // mean anomaly, degrees and per day
pub const OBLIQUITY: [f64; 2] = [23.4393, -3.563e-7]; // obliquity of the ecliptic
pub const EPOCH_DAY: i64 = 730530; // day number of 2000 Jan 0.0

/* # calibration */

// tuned by eye against the bundled world map, not physical values
pub const LEGACY_RISING: f64 = 0.69;
pub const LEGACY_SETTING: f64 = 0.39;
pub const LEGACY_OFFSET: f64 = 0.10; // fraction of the map width

/* # terminator */

pub const MIN_ROWS: usize = 180; // fewest scan lines worth drawing

/* # shading */

pub const BLUR_BAND: f64 = 4.0; // half-width of the twilight band in degrees of altitude
pub const MAX_NIGHT_ALPHA: f64 = 0.13; // darkening of the night side

/* # sampling */

pub const HIGH_TIER_DENSITY: f64 = 350.0; // samples across the map width on capable devices
pub const LOW_TIER_DENSITY: f64 = 180.0;
pub const HIGH_TIER_CLASS: u32 = 34; // lowest performance class treated as high tier
pub const HIGH_TIER_CORES: usize = 8;
pub const HIGH_TIER_FREQ_KHZ: u64 = 3_200_000;

/* # host */

// the sun crawls a quarter of a degree per minute, no point in going faster
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(6);

pub mod angle;
pub mod ephemeris;

use crate::{
    sol::angle::{rev180, revolve},
    vars::*,
};

/// pixel size of the map the overlay is drawn on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// equirectangular x for a longitude in degrees, in [0, width)
    pub fn x_of_longitude(&self, longitude: f64, calibration: &Calibration) -> f64 {
        let x = self.width * (rev180(longitude) + 180.0) / 360.0;
        revolve(x - calibration.offset_px(self.width), self.width)
    }

    /// longitude in degrees under a given x
    pub fn longitude_of_x(&self, x: f64, calibration: &Calibration) -> f64 {
        (x + calibration.offset_px(self.width)) / self.width * 360.0 - 180.0
    }

    /// latitude in degrees, 90 at the top edge and -90 at the bottom
    pub fn latitude_of_y(&self, y: f64) -> f64 {
        90.0 - y / self.height * 180.0
    }

    pub fn y_of_latitude(&self, latitude: f64) -> f64 {
        (90.0 - latitude) / 180.0 * self.height
    }
}

/// knobs fitting the overlay to a particular map image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// scales the hour angle on the sunrise side of the terminator
    pub rising_correction: f64,
    /// scales the hour angle on the sunset side of the terminator
    pub setting_correction: f64,
    /// where the map image puts the prime meridian, as a fraction of its width
    pub meridian_offset: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rising_correction: 1.0,
            setting_correction: 1.0,
            meridian_offset: 0.0,
        }
    }
}

impl Calibration {
    /// values fitted to the world map the overlay was first drawn on
    pub fn legacy_asset() -> Self {
        Self {
            rising_correction: LEGACY_RISING,
            setting_correction: LEGACY_SETTING,
            meridian_offset: LEGACY_OFFSET,
        }
    }

    pub fn with_rising_correction(mut self, factor: f64) -> Self {
        self.rising_correction = factor;
        self
    }

    pub fn with_setting_correction(mut self, factor: f64) -> Self {
        self.setting_correction = factor;
        self
    }

    pub fn with_meridian_offset(mut self, offset: f64) -> Self {
        self.meridian_offset = offset;
        self
    }

    fn offset_px(&self, width: f64) -> f64 {
        width * self.meridian_offset
    }
}

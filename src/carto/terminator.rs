use crate::{
    carto::projection::{Calibration, Canvas},
    sol::{angle::rev, ephemeris::EphemerisState},
    vars::*,
};
use geo::{Coordinate, LineString, Polygon};
use log::trace;

/* # points */

/// where the terminator crosses one scan line of the map
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminatorPoint {
    pub y: f64,
    /// morning edge, west of the subsolar point
    pub rising_x: f64,
    /// evening edge, east of the subsolar point
    pub setting_x: f64,
}

/// why a scan line has no terminator
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowLight {
    PolarDay,
    PolarNight,
}

fn terminator_cosine(declination: f64, latitude: f64) -> f64 {
    -declination.to_radians().tan() * latitude.to_radians().tan()
}

/// classify a latitude by the terminator hour angle, if the sun ever rises and sets there
pub fn terminator_hour_angle(declination: f64, latitude: f64) -> Result<f64, RowLight> {
    let cos_term = terminator_cosine(declination, latitude);
    if cos_term < -1.0 {
        Err(RowLight::PolarDay)
    } else if cos_term > 1.0 {
        Err(RowLight::PolarNight)
    } else if cos_term.is_nan() {
        // nothing sensible to draw, treat the row as unlit
        Err(RowLight::PolarNight)
    } else {
        Ok(cos_term.acos().to_degrees())
    }
}

/// terminator crossing on the scan line at `y`
pub fn terminator_row(
    ephemeris: &EphemerisState,
    canvas: &Canvas,
    calibration: &Calibration,
    y: f64,
) -> Result<TerminatorPoint, RowLight> {
    let hour_angle = terminator_hour_angle(
        ephemeris.declination_degrees,
        canvas.latitude_of_y(y),
    )?;
    let noon = (ephemeris.right_ascension_hours - ephemeris.gmst0_hours() - ephemeris.hour_decimal)
        * 15.0;
    let rising = rev(noon - hour_angle * calibration.rising_correction);
    let setting = rev(noon + hour_angle * calibration.setting_correction);
    Ok(TerminatorPoint {
        y,
        rising_x: canvas.x_of_longitude(rising, calibration),
        setting_x: canvas.x_of_longitude(setting, calibration),
    })
}

/// number of scan lines worth tracing on a map this tall
pub fn default_row_count(height: f64) -> usize {
    ((height / 2.0) as usize).max(MIN_ROWS)
}

/* # curves */

/// terminator crossings ordered from the top of the map to the bottom
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerminatorCurve {
    points: Vec<TerminatorPoint>,
}

/// trace the terminator over `rows` scan lines placed at row centres
pub fn generate_terminator(
    ephemeris: &EphemerisState,
    canvas: &Canvas,
    calibration: &Calibration,
    rows: usize,
) -> TerminatorCurve {
    trace!("tracing terminator over {} rows", rows);

    let step = canvas.height / rows as f64;
    TerminatorCurve {
        points: (0..rows)
            .filter_map(|j| {
                terminator_row(ephemeris, canvas, calibration, (j as f64 + 0.5) * step).ok()
            })
            .collect(),
    }
}

impl TerminatorCurve {
    pub fn points(&self) -> &[TerminatorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TerminatorPoint> {
        self.points.iter()
    }

    /// closed bell shape: down the rising edge, back up the setting edge
    pub fn outline(&self) -> Option<Polygon<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let rising = self.points.iter().map(|point| Coordinate {
            x: point.rising_x,
            y: point.y,
        });
        let setting = self.points.iter().rev().map(|point| Coordinate {
            x: point.setting_x,
            y: point.y,
        });
        Some(Polygon::new(
            LineString::from(rising.chain(setting).collect::<Vec<Coordinate<f64>>>()),
            vec![],
        ))
    }
}

impl<'a> IntoIterator for &'a TerminatorCurve {
    type Item = &'a TerminatorPoint;
    type IntoIter = std::slice::Iter<'a, TerminatorPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

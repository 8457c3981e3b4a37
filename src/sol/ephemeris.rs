use crate::{
    sol::angle::{rev, rev180},
    time::{Instant, InstantKey},
    vars::*,
};
use log::trace;
use nalgebra::{Rotation3, Vector3};

/// where the sun stands on the sky at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EphemerisState {
    pub right_ascension_hours: f64,
    pub declination_degrees: f64,
    /// sidereal time at 0h UT, reduced into [0, 360)
    pub gmst0_degrees: f64,
    pub hour_decimal: f64,
}

fn linear(element: [f64; 2], days: f64) -> f64 {
    element[1].mul_add(days, element[0])
}

/// low precision solar position, good to about a degree
pub fn compute_ephemeris(instant: &Instant) -> EphemerisState {
    let days = instant.days_since_j2000();

    let w = linear(PERIHELION_LON, days);
    let e = linear(ECCENTRICITY, days);
    let m = rev(linear(MEAN_ANOMALY, days));
    let oblecl = linear(OBLIQUITY, days);
    let mean_lon = rev(w + m);

    // first order eccentric anomaly, plenty for an orbit this round
    let m_rad = m.to_radians();
    let ecc = m + e.to_degrees() * m_rad.sin() * (1.0 + e * m_rad.cos());
    let ecc_rad = ecc.to_radians();

    let x = ecc_rad.cos() - e;
    let y = ecc_rad.sin() * (1.0 - e * e).sqrt();
    let r = x.hypot(y);
    let v = y.atan2(x).to_degrees();
    let lon = rev(v + w).to_radians();

    let ecliptic = Vector3::new(r * lon.cos(), r * lon.sin(), 0.0);
    let equatorial =
        Rotation3::from_axis_angle(&Vector3::x_axis(), oblecl.to_radians()) * ecliptic;

    EphemerisState {
        right_ascension_hours: rev(equatorial.y.atan2(equatorial.x).to_degrees()) / 15.0,
        declination_degrees: (equatorial.z / r).asin().to_degrees(),
        gmst0_degrees: rev(mean_lon + 180.0),
        hour_decimal: instant.hour_decimal(),
    }
}

impl EphemerisState {
    pub fn gmst0_hours(&self) -> f64 {
        self.gmst0_degrees / 15.0
    }

    /// longitude where the sun stands in the zenith, in [-180, 180)
    pub fn subsolar_longitude(&self) -> f64 {
        rev180(
            (self.right_ascension_hours - self.gmst0_hours() - self.hour_decimal) * 15.0,
        )
    }

    /// (longitude, latitude) of the point right under the sun
    pub fn subsolar_point(&self) -> (f64, f64) {
        (self.subsolar_longitude(), self.declination_degrees)
    }

    pub fn sun_in_eastern_hemisphere(&self) -> bool {
        self.subsolar_longitude() >= 0.0
    }
}

/* # memo */

/// remembers the last computed ephemeris, so one tick pays for it once
#[derive(Clone, Debug, Default)]
pub struct EphemerisCache {
    last: Option<(InstantKey, EphemerisState)>,
    pub hits: usize,
    pub misses: usize,
}

impl EphemerisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, instant: &Instant) -> EphemerisState {
        let key = instant.key();
        match self.last {
            Some((cached, state)) if cached == key => {
                self.hits += 1;
                state
            }
            _ => {
                trace!("computing ephemeris for {:?}", instant);
                let state = compute_ephemeris(instant);
                self.last = Some((key, state));
                self.misses += 1;
                state
            }
        }
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

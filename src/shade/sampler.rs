use crate::{
    carto::projection::{Calibration, Canvas},
    shade::density::SamplingDensity,
    sol::{
        angle::{rev, rev_hours},
        ephemeris::EphemerisState,
    },
    vars::*,
};
use itertools::{iproduct, structs::Product};
use log::trace;
use nalgebra::{Rotation3, Vector3};
use rayon::prelude::*;
use std::{iter::StepBy, ops::Range};

/* # horizon */

/// position of the sun on the local sky, in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Horizontal {
    pub altitude: f64,
    /// from north through east, in [0, 360)
    pub azimuth: f64,
}

/// turn hour angle and declination into altitude and azimuth at a latitude
pub fn horizontal(hour_angle: f64, declination: f64, latitude: f64) -> Horizontal {
    let (ha, decl) = (hour_angle.to_radians(), declination.to_radians());
    let equatorial = Vector3::new(ha.cos() * decl.cos(), ha.sin() * decl.cos(), decl.sin());
    // tilt the celestial pole down onto the local zenith
    let local =
        Rotation3::from_axis_angle(&Vector3::y_axis(), (latitude - 90.0).to_radians()) * equatorial;
    Horizontal {
        altitude: local.z.atan2(local.x.hypot(local.y)).to_degrees(),
        azimuth: rev(local.y.atan2(local.x).to_degrees() + 180.0),
    }
}

/// solar hour angle in degrees at a longitude
pub fn hour_angle(ephemeris: &EphemerisState, longitude: f64) -> f64 {
    let sidereal = ephemeris.gmst0_hours() + ephemeris.hour_decimal + longitude / 15.0;
    rev_hours(sidereal - ephemeris.right_ascension_hours) * 15.0
}

/* # shading */

/// how hard the night side darkens the map and how soft its edge is
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    /// half-width of the twilight band, degrees of altitude
    pub blur_band: f64,
    pub max_night_alpha: f64,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            blur_band: BLUR_BAND,
            max_night_alpha: MAX_NIGHT_ALPHA,
        }
    }
}

impl Shading {
    /// darkening for a given solar altitude
    pub fn shade_alpha(&self, altitude: f64) -> f64 {
        if altitude.is_nan() {
            altitude
        } else if altitude > self.blur_band {
            0.0
        } else if altitude < -self.blur_band {
            self.max_night_alpha
        } else {
            let t = ((altitude + self.blur_band) / (2.0 * self.blur_band)).clamp(0.0, 1.0);
            // the sunlit half of the band stays clear, a tint there reads as a colour cast
            if t < 0.5 {
                self.max_night_alpha * (1.0 - t)
            } else {
                0.0
            }
        }
    }
}

/* # samples */

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IlluminationSample {
    pub x: f64,
    pub y: f64,
    pub altitude_degrees: f64,
    pub shade_alpha: f64,
}

/// illumination at one map point
pub fn illumination_at(
    ephemeris: &EphemerisState,
    canvas: &Canvas,
    calibration: &Calibration,
    shading: &Shading,
    x: f64,
    y: f64,
) -> IlluminationSample {
    let longitude = canvas.longitude_of_x(x, calibration);
    let latitude = canvas.latitude_of_y(y);
    let altitude = horizontal(
        hour_angle(ephemeris, longitude),
        ephemeris.declination_degrees,
        latitude,
    )
    .altitude;
    IlluminationSample {
        x,
        y,
        altitude_degrees: altitude,
        shade_alpha: shading.shade_alpha(altitude),
    }
}

/// everything needed to evaluate the sample lattice
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid {
    pub ephemeris: EphemerisState,
    pub canvas: Canvas,
    pub calibration: Calibration,
    pub shading: Shading,
    pub density: SamplingDensity,
}

type Lattice = Product<StepBy<Range<usize>>, StepBy<Range<usize>>>;

impl SampleGrid {
    fn span(extent: f64, stride: usize) -> usize {
        match extent.max(0.0) as usize {
            0 => 0,
            pixels => (pixels - 1) / stride + 1,
        }
    }

    pub fn columns(&self) -> usize {
        Self::span(self.canvas.width, self.density.stride())
    }

    pub fn rows(&self) -> usize {
        Self::span(self.canvas.height, self.density.stride())
    }

    pub fn len(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn at(&self, x: usize, y: usize) -> IlluminationSample {
        illumination_at(
            &self.ephemeris,
            &self.canvas,
            &self.calibration,
            &self.shading,
            x as f64,
            y as f64,
        )
    }

    fn lattice(&self) -> Lattice {
        let stride = self.density.stride();
        iproduct!(
            (0..self.canvas.height.max(0.0) as usize).step_by(stride),
            (0..self.canvas.width.max(0.0) as usize).step_by(stride)
        )
    }

    /// lazy walk over the lattice, row by row
    pub fn iter(&self) -> Sampler {
        Sampler {
            grid: *self,
            lattice: self.lattice(),
            remaining: self.len(),
        }
    }

    /// evaluate the whole lattice on the rayon pool, in the same order as `iter`
    pub fn collect_par(&self) -> Vec<IlluminationSample> {
        trace!("sampling illumination over {} points in parallel", self.len());

        let stride = self.density.stride();
        let columns = self.columns();
        (0..self.rows())
            .into_par_iter()
            .flat_map_iter(|row| {
                (0..columns).map(move |column| self.at(column * stride, row * stride))
            })
            .collect()
    }
}

/// lazily produced illumination samples, finite, restart by sampling again
#[derive(Clone, Debug)]
pub struct Sampler {
    grid: SampleGrid,
    lattice: Lattice,
    remaining: usize,
}

impl Iterator for Sampler {
    type Item = IlluminationSample;

    fn next(&mut self) -> Option<Self::Item> {
        let (y, x) = self.lattice.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.grid.at(x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Sampler {}

/// samples over the map, one every `density` pixels in both directions
pub fn sample_illumination(
    ephemeris: &EphemerisState,
    canvas: &Canvas,
    calibration: &Calibration,
    shading: &Shading,
    density: SamplingDensity,
) -> Sampler {
    trace!(
        "sampling illumination on {}x{} every {} px",
        canvas.width,
        canvas.height,
        density.stride()
    );

    SampleGrid {
        ephemeris: *ephemeris,
        canvas: *canvas,
        calibration: *calibration,
        shading: *shading,
        density,
    }
    .iter()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        carto::terminator::generate_terminator, sol::ephemeris::compute_ephemeris, time::Instant,
    };
    use float_eq::assert_float_eq;
    const EPSILON: f64 = 0.000_001;

    fn equinox() -> EphemerisState {
        compute_ephemeris(&Instant::new(2024, 3, 20, 12, 0, 0.0))
    }

    fn grid(stride: usize) -> SampleGrid {
        SampleGrid {
            ephemeris: equinox(),
            canvas: Canvas::new(720.0, 360.0),
            calibration: Calibration::default(),
            shading: Shading::default(),
            density: SamplingDensity::new(stride),
        }
    }

    #[test]
    fn horizontal_zenith_and_nadir() {
        assert_float_eq!(horizontal(0.0, 20.0, 20.0).altitude, 90.0, abs <= EPSILON);
        assert_float_eq!(horizontal(180.0, 0.0, 0.0).altitude, -90.0, abs <= EPSILON);
        assert_float_eq!(horizontal(90.0, 0.0, 0.0).altitude, 0.0, abs <= EPSILON);
    }

    #[test]
    fn horizontal_meridian_altitude() {
        // noon altitude is 90 - |latitude - declination|
        assert_float_eq!(horizontal(0.0, 23.4, 50.0).altitude, 63.4, abs <= EPSILON);
        assert_float_eq!(horizontal(0.0, -23.4, 50.0).altitude, 16.6, abs <= EPSILON);
        assert_float_eq!(horizontal(180.0, 23.4, 80.0).altitude, 13.4, abs <= EPSILON);
    }

    #[test]
    fn horizontal_azimuth() {
        // southern sun at noon, western sun in the afternoon
        assert_float_eq!(horizontal(0.0, 0.0, 50.0).azimuth, 180.0, abs <= EPSILON);
        assert_float_eq!(horizontal(90.0, 0.0, 50.0).azimuth, 270.0, abs <= 0.01);
        assert_float_eq!(horizontal(-90.0, 0.0, 50.0).azimuth, 90.0, abs <= 0.01);
    }

    #[test]
    fn hour_angle_is_normalised() {
        let sun = equinox();
        for longitude in [-180.0, -90.0, 0.0, 45.0, 179.9, 540.0] {
            let ha = hour_angle(&sun, longitude);
            assert!((0.0..360.0).contains(&ha), "{} -> {}", longitude, ha);
        }
    }

    #[test]
    fn shade_bands() {
        let shading = Shading::default();
        assert_eq!(shading.shade_alpha(45.0), 0.0);
        assert_eq!(shading.shade_alpha(4.0), 0.0);
        assert_eq!(shading.shade_alpha(-4.5), MAX_NIGHT_ALPHA);
        assert_float_eq!(shading.shade_alpha(-4.0), MAX_NIGHT_ALPHA, abs <= EPSILON);
        assert_float_eq!(shading.shade_alpha(-2.0), MAX_NIGHT_ALPHA * 0.75, abs <= EPSILON);
        // day side of the band is left alone
        assert_eq!(shading.shade_alpha(0.0), 0.0);
        assert_eq!(shading.shade_alpha(2.0), 0.0);
        assert!(shading.shade_alpha(f64::NAN).is_nan());
    }

    #[test]
    fn shade_is_monotone() {
        let shading = Shading::default();
        let alphas = (-1000..=1000)
            .map(|j| shading.shade_alpha(j as f64 * 0.01))
            .collect::<Vec<f64>>();
        assert!(alphas.windows(2).all(|pair| pair[1] <= pair[0]));
        assert!(alphas.iter().all(|alpha| (0.0..=MAX_NIGHT_ALPHA).contains(alpha)));
    }

    #[test]
    fn end_to_end_equinox_noon() {
        let sun = equinox();
        let canvas = Canvas::new(720.0, 360.0);
        let samples = sample_illumination(
            &sun,
            &canvas,
            &Calibration::default(),
            &Shading::default(),
            SamplingDensity::new(2),
        )
        .collect::<Vec<IlluminationSample>>();

        let noon = samples
            .iter()
            .find(|sample| sample.x == 360.0 && sample.y == 180.0)
            .unwrap();
        assert_float_eq!(noon.altitude_degrees, 90.0, abs <= 5.0);
        assert_eq!(noon.shade_alpha, 0.0);

        let midnight = samples
            .iter()
            .find(|sample| sample.x == 0.0 && sample.y == 180.0)
            .unwrap();
        assert_float_eq!(midnight.altitude_degrees, -90.0, abs <= 5.0);
        assert_float_eq!(midnight.shade_alpha, MAX_NIGHT_ALPHA, abs <= EPSILON);
    }

    #[test]
    fn subsolar_point_is_overhead() {
        let sun = equinox();
        let canvas = Canvas::new(720.0, 360.0);
        let calibration = Calibration::legacy_asset();
        let (lon, lat) = sun.subsolar_point();
        let sample = illumination_at(
            &sun,
            &canvas,
            &calibration,
            &Shading::default(),
            canvas.x_of_longitude(lon, &calibration),
            canvas.y_of_latitude(lat),
        );
        assert!(sample.altitude_degrees > 85.0);
    }

    #[test]
    fn sun_near_the_date_line_lands_on_the_map() {
        let sun = compute_ephemeris(&Instant::new(2024, 3, 20, 22, 40, 0.0));
        let canvas = Canvas::new(720.0, 360.0);
        let calibration = Calibration::legacy_asset();
        let (lon, lat) = sun.subsolar_point();
        assert!(lon < -144.0);
        let x = canvas.x_of_longitude(lon, &calibration);
        assert!(x > 600.0 && x < canvas.width);
        let sample = illumination_at(
            &sun,
            &canvas,
            &calibration,
            &Shading::default(),
            x,
            canvas.y_of_latitude(lat),
        );
        assert!(sample.altitude_degrees > 85.0);
        let curve = generate_terminator(&sun, &canvas, &calibration, 60);
        for point in &curve {
            for x in [point.rising_x, point.setting_x] {
                assert!((0.0..canvas.width).contains(&x));
            }
        }
    }

    #[test]
    fn altitude_is_bounded() {
        let instants = [
            Instant::new(2024, 3, 20, 12, 0, 0.0),
            Instant::new(2024, 6, 21, 3, 17, 0.0),
            Instant::new(2023, 12, 22, 20, 45, 30.0),
        ];
        for instant in &instants {
            let mut samples = SampleGrid {
                ephemeris: compute_ephemeris(instant),
                ..grid(8)
            }
            .iter();
            assert!(samples.all(|sample| (-90.0..=90.0).contains(&sample.altitude_degrees)));
        }
    }

    #[test]
    fn stride_scaling() {
        let fine = grid(4);
        let coarse = grid(8);
        assert_eq!((fine.columns(), fine.rows()), (180, 90));
        assert_eq!((coarse.columns(), coarse.rows()), (90, 45));
        assert_eq!(fine.iter().count(), 16200);
        assert_eq!(coarse.iter().count(), 4050);
        // odd sizes round up
        let odd = SampleGrid {
            canvas: Canvas::new(101.0, 51.0),
            ..grid(10)
        };
        assert_eq!(odd.iter().count(), 11 * 6);
    }

    #[test]
    fn widest_stride_takes_one_sample() {
        let samples = sample_illumination(
            &equinox(),
            &Canvas::new(720.0, 360.0),
            &Calibration::default(),
            &Shading::default(),
            SamplingDensity::new(usize::MAX),
        );
        assert_eq!(samples.len(), 1);
        assert_eq!(samples.count(), 1);
        assert_eq!(grid(usize::MAX).collect_par().len(), 1);
    }

    #[test]
    fn empty_canvas_takes_no_samples() {
        let empty = SampleGrid {
            canvas: Canvas::new(0.0, 360.0),
            ..grid(usize::MAX)
        };
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn sampler_reports_its_length() {
        let mut samples = grid(16).iter();
        assert_eq!(samples.len(), 45 * 23);
        samples.next();
        assert_eq!(samples.len(), 45 * 23 - 1);
        let rest = samples.by_ref().count();
        assert_eq!(rest, 45 * 23 - 1);
        assert_eq!(samples.next(), None);
    }

    #[test]
    fn sampler_walks_rows() {
        let samples = grid(360).iter().collect::<Vec<IlluminationSample>>();
        let points = samples
            .iter()
            .map(|sample| (sample.x, sample.y))
            .collect::<Vec<(f64, f64)>>();
        assert_eq!(points, vec![(0.0, 0.0), (360.0, 0.0)]);
    }

    #[test]
    fn parallel_matches_lazy() {
        let grid = grid(12);
        assert_eq!(grid.collect_par(), grid.iter().collect::<Vec<IlluminationSample>>());
    }

    #[test]
    fn terminator_lies_on_the_horizon() {
        let sun = compute_ephemeris(&Instant::new(2024, 5, 1, 8, 30, 0.0));
        let canvas = Canvas::new(800.0, 400.0);
        let calibration = Calibration::default().with_meridian_offset(0.16);
        let curve = generate_terminator(&sun, &canvas, &calibration, 50);
        assert!(!curve.is_empty());
        for point in &curve {
            for x in [point.rising_x, point.setting_x] {
                let sample =
                    illumination_at(&sun, &canvas, &calibration, &Shading::default(), x, point.y);
                assert_float_eq!(sample.altitude_degrees, 0.0, abs <= 0.000_01);
            }
        }
    }
}

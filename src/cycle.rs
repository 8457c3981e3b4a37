use crate::{
    carto::{
        projection::{Calibration, Canvas},
        terminator::{default_row_count, generate_terminator, TerminatorCurve},
    },
    shade::{
        density::SamplingDensity,
        sampler::{IlluminationSample, SampleGrid, Shading},
    },
    sol::ephemeris::{EphemerisCache, EphemerisState},
    time::Instant,
};
use log::debug;

/// everything the renderer needs for one tick
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub instant: Instant,
    pub ephemeris: EphemerisState,
    pub grid: SampleGrid,
    pub curve: TerminatorCurve,
    pub samples: Vec<IlluminationSample>,
}

/// settings for the day and night overlay of one map, reused tick after tick
#[derive(Clone, Debug)]
pub struct Pipeline {
    pub canvas: Canvas,
    pub calibration: Calibration,
    pub shading: Shading,
    pub density: SamplingDensity,
    pub rows: usize,
    pub cache: EphemerisCache,
}

impl Pipeline {
    pub fn new(canvas: Canvas, density: SamplingDensity) -> Self {
        Self {
            canvas,
            calibration: Calibration::default(),
            shading: Shading::default(),
            density,
            rows: default_row_count(canvas.height),
            cache: EphemerisCache::new(),
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn grid(&mut self, instant: &Instant) -> SampleGrid {
        SampleGrid {
            ephemeris: self.cache.get_or_compute(instant),
            canvas: self.canvas,
            calibration: self.calibration,
            shading: self.shading,
            density: self.density,
        }
    }

    pub fn terminator(&mut self, instant: &Instant) -> TerminatorCurve {
        let ephemeris = self.cache.get_or_compute(instant);
        generate_terminator(&ephemeris, &self.canvas, &self.calibration, self.rows)
    }

    /// recompute the whole overlay for a moment
    pub fn frame(&mut self, instant: &Instant) -> Frame {
        let grid = self.grid(instant);
        let curve = self.terminator(instant);
        let samples = grid.collect_par();
        debug!(
            "frame at {:?}: {} terminator rows, {} samples",
            instant,
            curve.len(),
            samples.len()
        );
        Frame {
            instant: *instant,
            ephemeris: grid.ephemeris,
            grid,
            curve,
            samples,
        }
    }
}

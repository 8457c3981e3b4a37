use crate::vars::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PerformanceTier {
    High,
    Low,
}

/// what the host could find out about the device it runs on
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HardwareSignals {
    /// platform reported performance class, if there is one
    pub performance_class: Option<u32>,
    pub cores: usize,
    pub max_frequency_khz: Option<u64>,
}

impl HardwareSignals {
    pub fn tier(&self) -> PerformanceTier {
        let high = match self.performance_class {
            Some(class) => class >= HIGH_TIER_CLASS,
            None => {
                self.cores >= HIGH_TIER_CORES
                    && self.max_frequency_khz.unwrap_or(0) >= HIGH_TIER_FREQ_KHZ
            }
        };
        if high {
            PerformanceTier::High
        } else {
            PerformanceTier::Low
        }
    }
}

/// pixel stride between illumination samples, never below one
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct SamplingDensity(usize);

impl SamplingDensity {
    pub fn new(stride: usize) -> Self {
        Self(stride.max(1))
    }

    /// stride giving a fixed number of samples across the map for the tier
    pub fn for_tier(tier: PerformanceTier, width: f64) -> Self {
        let across = match tier {
            PerformanceTier::High => HIGH_TIER_DENSITY,
            PerformanceTier::Low => LOW_TIER_DENSITY,
        };
        Self::new((width / across).max(1.0) as usize)
    }

    pub fn stride(self) -> usize {
        self.0
    }
}

impl Default for SamplingDensity {
    fn default() -> Self {
        Self(1)
    }
}

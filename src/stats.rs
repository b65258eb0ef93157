use serde::{Deserialize, Serialize};

/// The four summary statistics divan reports for each benchmark data point.
///
/// Timings are in **picoseconds**. The expected ordering is `fastest <= median <= slowest` and
/// `fastest <= mean <= slowest`; input violating it is accepted (see [`Self::is_ordered`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatQuadruple {
    pub fastest: f64,
    pub mean: f64,
    pub median: f64,
    pub slowest: f64,
}

impl StatQuadruple {
    /// Field names in the order [`Self::fields`] yields them.
    pub const FIELD_NAMES: [&'static str; 4] = ["fastest", "mean", "median", "slowest"];

    pub fn new(fastest: f64, mean: f64, median: f64, slowest: f64) -> Self {
        Self {
            fastest,
            mean,
            median,
            slowest,
        }
    }

    /// Returns `[fastest, mean, median, slowest]`.
    pub fn fields(&self) -> [f64; 4] {
        [self.fastest, self.mean, self.median, self.slowest]
    }

    /// Applies `f` to each of the four statistics.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            fastest: f(self.fastest),
            mean: f(self.mean),
            median: f(self.median),
            slowest: f(self.slowest),
        }
    }

    /// Multiplies every statistic by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Whether the statistics respect `fastest <= median <= slowest` and `fastest <= mean <= slowest`.
    pub fn is_ordered(&self) -> bool {
        self.fastest <= self.median
            && self.median <= self.slowest
            && self.fastest <= self.mean
            && self.mean <= self.slowest
    }

    /// Whether every statistic is finite and non-negative.
    pub fn is_non_negative(&self) -> bool {
        self.fields().iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

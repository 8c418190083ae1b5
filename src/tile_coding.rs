//! Tile coding feature generator
//!
//! Maps a continuous state onto a sparse set of binary features. Each of the
//! `num_tilings` tilings is a grid of `resolution[d]` equal cells along every
//! dimension `d`, so nearby states share most of their active tiles while
//! distant states share none.
//!
//! A cell spans `width / (resolution[d] - 1)`, which lets the grid cover the
//! whole range even after its origin is moved left of the lower bound. Tiling
//! `k` moves its origin along dimension `d` by `((k * (2d + 1)) mod n) / n`
//! cell widths, where `n = num_tilings`. The odd multipliers keep the
//! displacement vectors off the diagonal.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Closed interval `[min, max]` covered by one state variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateRange {
    pub min: f64,
    pub max: f64,
}

impl StateRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Tile coder over a box-shaped state space.
///
/// Immutable after construction; [`TileCoder::features`] is a pure function of
/// the state, so one instance can be shared by any number of learners.
#[derive(Debug, Clone)]
pub struct TileCoder {
    ranges: Vec<StateRange>,
    resolution: Vec<usize>,
    num_tilings: usize,
    /// Per tiling, per dimension: how far the grid origin sits below the
    /// range minimum, in cell widths. Always in `[0, 1)`.
    offsets: Vec<Vec<f64>>,
    tiles_per_tiling: usize,
}

impl TileCoder {
    /// Build a tile coder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `ranges` and `resolution`
    /// disagree in length, a range is empty or not finite, a resolution is
    /// zero, or `num_tilings` is zero.
    pub fn new(ranges: &[StateRange], resolution: &[usize], num_tilings: usize) -> Result<Self> {
        if ranges.is_empty() {
            return Err(Error::config("tile coder needs at least one dimension"));
        }
        if ranges.len() != resolution.len() {
            return Err(Error::config(format!(
                "{} ranges but {} resolutions",
                ranges.len(),
                resolution.len()
            )));
        }
        if num_tilings == 0 {
            return Err(Error::config("number of tilings must be at least 1"));
        }
        if let Some(range) = ranges
            .iter()
            .find(|r| !(r.min.is_finite() && r.max.is_finite() && r.max > r.min))
        {
            return Err(Error::config(format!(
                "invalid state range [{}, {}]",
                range.min, range.max
            )));
        }
        if resolution.contains(&0) {
            return Err(Error::config("tiles per dimension must be at least 1"));
        }

        let offsets = (0..num_tilings)
            .map(|k| {
                (0..ranges.len())
                    .map(|d| ((k * (2 * d + 1)) % num_tilings) as f64 / num_tilings as f64)
                    .collect()
            })
            .collect();

        Ok(Self {
            ranges: ranges.to_vec(),
            resolution: resolution.to_vec(),
            num_tilings,
            offsets,
            tiles_per_tiling: resolution.iter().product(),
        })
    }

    /// Square grid with the same number of tiles along every dimension.
    pub fn uniform(ranges: &[StateRange], tiles: usize, num_tilings: usize) -> Result<Self> {
        Self::new(ranges, &vec![tiles; ranges.len()], num_tilings)
    }

    /// Total number of addressable features across all tilings.
    pub fn num_features(&self) -> usize {
        self.num_tilings * self.tiles_per_tiling
    }

    /// Indices of the active tiles for `state`, one per tiling.
    ///
    /// Tiling `k` owns the index block `[k * T, (k + 1) * T)` with
    /// `T = Π resolution`, so the returned indices are always distinct and in
    /// increasing order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `state` has the wrong length.
    pub fn features(&self, state: &[f64]) -> Result<Vec<usize>> {
        if state.len() != self.ranges.len() {
            return Err(Error::DimensionMismatch {
                expected: self.ranges.len(),
                got: state.len(),
            });
        }

        Ok(self
            .offsets
            .iter()
            .enumerate()
            .map(|(k, offsets)| k * self.tiles_per_tiling + self.tile_index(state, offsets))
            .collect())
    }

    /// Row-major index of the cell containing `state` within one tiling.
    ///
    /// States outside the ranges land on the nearest edge cell.
    fn tile_index(&self, state: &[f64], offsets: &[f64]) -> usize {
        state
            .iter()
            .zip(&self.ranges)
            .zip(&self.resolution)
            .zip(offsets)
            .fold(0, |index, (((&x, range), &tiles), &offset)| {
                let scaled = (x - range.min) / range.width() * (tiles - 1) as f64 + offset;
                let cell = (scaled.floor().max(0.0) as usize).min(tiles - 1);
                index * tiles + cell
            })
    }
}

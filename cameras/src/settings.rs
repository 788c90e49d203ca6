//! Light field settings

use crate::grid::*;
use lfcore::error::*;
use lfcore::geometry::*;

/// Light field parameters of a camera. The value is immutable; each setter
/// returns an updated copy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightFieldSettings {
    /// Whether the camera renders as an array.
    enabled: bool,

    /// Rows and columns of the array.
    grid: Grid,

    /// Baseline along the camera's x axis.
    base_x: Float,

    /// Baseline along the camera's y axis.
    base_y: Float,

    /// Smallest disparity of the last disparity render.
    min_disp: Float,

    /// Largest disparity of the last disparity render.
    max_disp: Float,
}

impl LightFieldSettings {
    /// Creates enabled settings for a `rows` x `cols` array.
    ///
    /// * `rows`   - Number of rows.
    /// * `cols`   - Number of columns.
    /// * `base_x` - Baseline along x.
    /// * `base_y` - Baseline along y.
    pub fn new(rows: usize, cols: usize, base_x: Float, base_y: Float) -> Result<Self> {
        Ok(Self {
            enabled: true,
            grid: Grid::new(rows, cols)?,
            base_x: require_non_negative("base x", base_x)?,
            base_y: require_non_negative("base y", base_y)?,
            min_disp: 0.0,
            max_disp: 0.0,
        })
    }

    /// Settings of a camera that is not an array: a single camera with unit
    /// baselines and no disparity range.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            grid: Grid::single(),
            base_x: 1.0,
            base_y: 1.0,
            min_disp: 0.0,
            max_disp: 0.0,
        }
    }

    /// Returns true if the camera renders as an array.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the array grid.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.grid.rows()
    }

    /// Returns the number of columns.
    pub fn num_cols(&self) -> usize {
        self.grid.cols()
    }

    /// Returns the baseline along x.
    pub fn base_x(&self) -> Float {
        self.base_x
    }

    /// Returns the baseline along y.
    pub fn base_y(&self) -> Float {
        self.base_y
    }

    /// Returns the smallest disparity of the last disparity render.
    pub fn min_disp(&self) -> Float {
        self.min_disp
    }

    /// Returns the largest disparity of the last disparity render.
    pub fn max_disp(&self) -> Float {
        self.max_disp
    }

    /// Returns true once a disparity range has been recorded.
    pub fn has_disparity_range(&self) -> bool {
        self.max_disp > 0.0
    }

    /// Returns the width and height of the plane spanned by the array:
    /// each baseline times the number of gaps along its axis (at least one).
    pub fn array_extent(&self) -> (Float, Float) {
        let gaps = |n: usize| n.saturating_sub(1).max(1) as Float;
        (
            self.base_x * gaps(self.grid.cols()),
            self.base_y * gaps(self.grid.rows()),
        )
    }

    /// Turns the array on or off. Turning it off resets every value to
    /// `disabled()`; turning it on keeps the current values.
    ///
    /// * `enabled` - The new state.
    pub fn with_enabled(self, enabled: bool) -> Self {
        if enabled {
            Self { enabled, ..self }
        } else {
            Self::disabled()
        }
    }

    /// Changes the number of rows and columns. Baselines are kept.
    ///
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns.
    pub fn with_grid(self, rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            ..self
        })
    }

    /// Changes the x baseline. Disparity grows linearly with the baseline so
    /// the recorded range is rescaled; it is cleared if the old baseline was
    /// zero.
    ///
    /// * `base_x` - The new baseline.
    pub fn with_base_x(self, base_x: Float) -> Result<Self> {
        let base_x = require_non_negative("base x", base_x)?;
        let (min_disp, max_disp) = if self.base_x > 0.0 {
            let ratio = base_x / self.base_x;
            (self.min_disp * ratio, self.max_disp * ratio)
        } else {
            (0.0, 0.0)
        };
        Ok(Self {
            base_x,
            min_disp,
            max_disp,
            ..self
        })
    }

    /// Changes the y baseline.
    ///
    /// * `base_y` - The new baseline.
    pub fn with_base_y(self, base_y: Float) -> Result<Self> {
        Ok(Self {
            base_y: require_non_negative("base y", base_y)?,
            ..self
        })
    }

    /// Records the range of the last disparity render.
    ///
    /// * `min_disp` - Smallest disparity.
    /// * `max_disp` - Largest disparity.
    pub fn with_disparity_range(self, min_disp: Float, max_disp: Float) -> Self {
        Self {
            min_disp,
            max_disp,
            ..self
        }
    }
}

impl Default for LightFieldSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

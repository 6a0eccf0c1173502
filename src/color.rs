//! Absolute color scale for cell counts.
//!
//! Counts map to six intensity steps along a single hue. The scale is absolute:
//! a cell with 51 observations is drawn at full intensity whether the densest
//! cell on screen holds 60 points or 6000.

use crate::error::{EngineError, Result};
use obsgrid_types::style::Color;
use serde::{Deserialize, Serialize};

/// Count breakpoints, highest first. A count strictly above `BREAKPOINTS[i]`
/// reaches intensity `5 - i`.
pub const BREAKPOINTS: [usize; 5] = [50, 20, 10, 5, 2];

/// Discrete intensity step, `0` (sparse) to `5` (dense).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: Intensity = Intensity(0);
    pub const MAX: Intensity = Intensity(5);

    pub fn level(&self) -> u8 {
        self.0
    }
}

/// Intensity step for a cell holding `count` observations.
///
/// # Examples
///
/// ```
/// use obsgrid::color::{Intensity, intensity_for};
///
/// assert_eq!(intensity_for(51), Intensity::MAX);
/// assert_eq!(intensity_for(500), Intensity::MAX);
/// assert_eq!(intensity_for(2), Intensity::MIN);
/// ```
pub fn intensity_for(count: usize) -> Intensity {
    BREAKPOINTS
        .iter()
        .position(|&threshold| count > threshold)
        .map_or(Intensity::MIN, |idx| Intensity(5 - idx as u8))
}

/// A single-hue palette with one opacity per intensity step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub hue: Color,
    /// Opacity for intensity 0 through 5; must not decrease.
    pub alphas: [f32; 6],
}

impl ColorScale {
    pub const DEFAULT: ColorScale = ColorScale {
        hue: Color::rgba(214, 39, 40, 1.0),
        alphas: [0.2, 0.35, 0.5, 0.65, 0.8, 0.95],
    };

    pub fn color_for(&self, count: usize) -> Color {
        self.color_at(intensity_for(count))
    }

    pub fn color_at(&self, intensity: Intensity) -> Color {
        self.hue.with_alpha(self.alphas[intensity.level() as usize])
    }

    /// Marker color for individual points: the hue at full opacity.
    pub fn marker_color(&self) -> Color {
        self.hue.with_alpha(1.0)
    }

    pub fn validate(&self) -> Result<()> {
        if self
            .alphas
            .iter()
            .any(|a| !a.is_finite() || !(0.0..=1.0).contains(a))
        {
            return Err(EngineError::InvalidConfig(
                "Palette opacities must lie in [0, 1]".to_string(),
            ));
        }
        if !self.alphas.windows(2).all(|w| w[0] <= w[1]) {
            return Err(EngineError::InvalidConfig(
                "Palette opacities must not decrease with intensity".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Color for `count` under the default palette.
pub fn color_for(count: usize) -> Color {
    ColorScale::DEFAULT.color_for(count)
}

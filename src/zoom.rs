//! Zoom level to grid tier selection.
//!
//! Tiers are a step function of the map zoom. Thresholds are exclusive below and
//! inclusive above, so `12.0` is still `small` and anything past it is `none`
//! (individual markers):
//!
//! ```text
//!  zoom:  ... 6 ]( 8 ]( 10 ]( 12 ]( ...
//!  tier:  extraLarge | large | medium | small | none
//! ```
//!
//! The tier is only recomputed once a zoom or pan gesture has settled; see
//! [`ZoomTracker`].

use crate::error::{EngineError, Result};
use crate::index::Resolution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The grid resolution chosen for a zoom level, or `None` for raw markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomTier {
    None,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl ZoomTier {
    /// The cell resolution for this tier; `None` means markers.
    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            ZoomTier::None => None,
            ZoomTier::Small => Some(Resolution::Small),
            ZoomTier::Medium => Some(Resolution::Medium),
            ZoomTier::Large => Some(Resolution::Large),
            ZoomTier::ExtraLarge => Some(Resolution::ExtraLarge),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoomTier::None => "none",
            ZoomTier::Small => "small",
            ZoomTier::Medium => "medium",
            ZoomTier::Large => "large",
            ZoomTier::ExtraLarge => "extraLarge",
        }
    }
}

impl fmt::Display for ZoomTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zoom levels at which the tier changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomThresholds {
    /// Above this zoom individual markers are used.
    #[serde(default = "ZoomThresholds::default_markers_above")]
    pub markers_above: f64,
    #[serde(default = "ZoomThresholds::default_small_above")]
    pub small_above: f64,
    #[serde(default = "ZoomThresholds::default_medium_above")]
    pub medium_above: f64,
    /// At or below this zoom the extra large grid is used.
    #[serde(default = "ZoomThresholds::default_large_above")]
    pub large_above: f64,
}

impl ZoomThresholds {
    const fn default_markers_above() -> f64 {
        12.0
    }

    const fn default_small_above() -> f64 {
        10.0
    }

    const fn default_medium_above() -> f64 {
        8.0
    }

    const fn default_large_above() -> f64 {
        6.0
    }

    /// Pick the tier for `zoom`.
    ///
    /// NaN is pinned to `ExtraLarge`, the same as any zoom at or below the
    /// lowest threshold.
    pub fn select(&self, zoom: f64) -> ZoomTier {
        if zoom.is_nan() {
            ZoomTier::ExtraLarge
        } else if zoom > self.markers_above {
            ZoomTier::None
        } else if zoom > self.small_above {
            ZoomTier::Small
        } else if zoom > self.medium_above {
            ZoomTier::Medium
        } else if zoom > self.large_above {
            ZoomTier::Large
        } else {
            ZoomTier::ExtraLarge
        }
    }

    /// Thresholds must be finite and strictly descending.
    pub fn validate(&self) -> Result<()> {
        let ordered = [
            self.markers_above,
            self.small_above,
            self.medium_above,
            self.large_above,
        ];
        if ordered.iter().any(|t| !t.is_finite()) {
            return Err(EngineError::InvalidConfig(
                "Zoom thresholds must be finite".to_string(),
            ));
        }
        if !ordered.windows(2).all(|w| w[0] > w[1]) {
            return Err(EngineError::InvalidConfig(format!(
                "Zoom thresholds must strictly descend, got {:?}",
                ordered
            )));
        }
        Ok(())
    }
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            markers_above: Self::default_markers_above(),
            small_above: Self::default_small_above(),
            medium_above: Self::default_medium_above(),
            large_above: Self::default_large_above(),
        }
    }
}

/// Tier for `zoom` under the product thresholds (12 / 10 / 8 / 6).
///
/// # Examples
///
/// ```
/// use obsgrid::zoom::{ZoomTier, select_tier};
///
/// assert_eq!(select_tier(12.0), ZoomTier::Small);
/// assert_eq!(select_tier(12.0001), ZoomTier::None);
/// assert_eq!(select_tier(3.0), ZoomTier::ExtraLarge);
/// ```
pub fn select_tier(zoom: f64) -> ZoomTier {
    ZoomThresholds::default().select(zoom)
}

/// Events forwarded from the host map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "zoom", rename_all = "camelCase")]
pub enum MapEvent {
    ZoomStart,
    /// An intermediate animation frame of a zoom gesture.
    Zooming(f64),
    ZoomEnd(f64),
    /// A pan settled; carries the zoom at rest.
    MoveEnd(f64),
}

/// Holds the last settled zoom level.
///
/// Intermediate frames are ignored so nothing is re-binned or re-styled while
/// a gesture animates. When several settle events arrive, the latest one wins.
#[derive(Debug, Clone)]
pub struct ZoomTracker {
    settled: f64,
    gesture_active: bool,
    thresholds: ZoomThresholds,
}

impl ZoomTracker {
    pub fn new(initial_zoom: f64, thresholds: ZoomThresholds) -> Self {
        Self {
            settled: initial_zoom,
            gesture_active: false,
            thresholds,
        }
    }

    /// Feed an event. Returns `true` when the settled tier changed.
    pub fn handle(&mut self, event: MapEvent) -> bool {
        match event {
            MapEvent::ZoomStart => {
                self.gesture_active = true;
                false
            }
            MapEvent::Zooming(zoom) => {
                log::trace!("Ignoring intermediate zoom {}", zoom);
                false
            }
            MapEvent::ZoomEnd(zoom) | MapEvent::MoveEnd(zoom) => {
                self.gesture_active = false;
                let before = self.tier();
                self.settled = zoom;
                let after = self.tier();
                if before != after {
                    log::debug!("Zoom {} settled, tier {} -> {}", zoom, before, after);
                }
                before != after
            }
        }
    }

    pub fn zoom(&self) -> f64 {
        self.settled
    }

    pub fn tier(&self) -> ZoomTier {
        self.thresholds.select(self.settled)
    }

    /// Whether a zoom gesture has started and not yet settled.
    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    pub fn thresholds(&self) -> &ZoomThresholds {
        &self.thresholds
    }
}

impl Default for ZoomTracker {
    fn default() -> Self {
        Self::new(0.0, ZoomThresholds::default())
    }
}

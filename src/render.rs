//! Render path selection and frame planning.
//!
//! The user picks a mode; the zoom picks a tier. Together they decide what the
//! host map draws:
//!
//! | mode        | tier `none`   | tier `small`..`extraLarge` |
//! |-------------|---------------|----------------------------|
//! | `aggregate` | small cells   | that tier's cells          |
//! | `realtime`  | markers       | markers                    |
//!
//! Aggregate mode never shows unaggregated points. Realtime mode always shows
//! every point, though the tier is still computed so a mode switch is instant.

use crate::config::Config;
use crate::grid::{CellKey, GridCell};
use crate::index::{MultiResolutionIndex, Resolution};
use crate::popup::Popup;
use crate::selection::SelectionState;
use crate::zoom::ZoomTier;
use obsgrid_types::bounds::CellBounds;
use obsgrid_types::point::ObservationPoint;
use obsgrid_types::style::{CellStyle, Color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The user's explicit rendering preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Always show density cells.
    #[default]
    Aggregate,
    /// Always show individual markers.
    Realtime,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Aggregate => "aggregate",
            RenderMode::Realtime => "realtime",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            RenderMode::Aggregate => RenderMode::Realtime,
            RenderMode::Realtime => RenderMode::Aggregate,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aggregate" => Ok(RenderMode::Aggregate),
            "realtime" => Ok(RenderMode::Realtime),
            other => Err(format!("unknown render mode: {}", other)),
        }
    }
}

/// What actually gets drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "resolution", rename_all = "camelCase")]
pub enum RenderPath {
    Cells(Resolution),
    Markers,
}

/// Combine the user's mode with the zoom tier.
pub fn decide(mode: RenderMode, tier: ZoomTier) -> RenderPath {
    match mode {
        RenderMode::Realtime => RenderPath::Markers,
        RenderMode::Aggregate => RenderPath::Cells(tier.resolution().unwrap_or(Resolution::Small)),
    }
}

/// Fill opacity and stroke weight, at rest and when selected or hovered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    #[serde(default = "Emphasis::default_base_fill_opacity")]
    pub base_fill_opacity: f32,
    #[serde(default = "Emphasis::default_base_stroke_weight")]
    pub base_stroke_weight: f32,
    #[serde(default = "Emphasis::default_active_fill_opacity")]
    pub active_fill_opacity: f32,
    #[serde(default = "Emphasis::default_active_stroke_weight")]
    pub active_stroke_weight: f32,
}

impl Emphasis {
    const fn default_base_fill_opacity() -> f32 {
        0.6
    }

    const fn default_base_stroke_weight() -> f32 {
        1.0
    }

    const fn default_active_fill_opacity() -> f32 {
        0.85
    }

    const fn default_active_stroke_weight() -> f32 {
        3.0
    }

    pub fn style(&self, color: Color, active: bool) -> CellStyle {
        if active {
            CellStyle::new(color, self.active_fill_opacity, self.active_stroke_weight)
        } else {
            CellStyle::new(color, self.base_fill_opacity, self.base_stroke_weight)
        }
    }
}

impl Default for Emphasis {
    fn default() -> Self {
        Self {
            base_fill_opacity: Self::default_base_fill_opacity(),
            base_stroke_weight: Self::default_base_stroke_weight(),
            active_fill_opacity: Self::default_active_fill_opacity(),
            active_stroke_weight: Self::default_active_stroke_weight(),
        }
    }
}

/// Geometry for one drawable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Drawable {
    Cell {
        resolution: Resolution,
        key: CellKey,
        bounds: CellBounds,
        count: usize,
    },
    Marker {
        point: Arc<ObservationPoint>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub drawable: Drawable,
    pub style: CellStyle,
    pub selected: bool,
    pub hovered: bool,
    /// Present only when the item is selected or hovered.
    pub popup: Option<Popup>,
}

/// Everything the host map needs to draw for one settled view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub mode: RenderMode,
    pub tier: ZoomTier,
    pub path: RenderPath,
    pub items: Vec<RenderItem>,
}

impl RenderFrame {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.drawable, Drawable::Cell { .. }))
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.drawable, Drawable::Marker { .. }))
            .count()
    }

    /// The selected or hovered item carrying a popup, preferring the selection.
    pub fn popup(&self) -> Option<&Popup> {
        self.items
            .iter()
            .find(|item| item.selected)
            .or_else(|| self.items.iter().find(|item| item.hovered))
            .and_then(|item| item.popup.as_ref())
    }
}

/// Plan the drawables for the given view.
///
/// # Examples
///
/// ```rust
/// use obsgrid::config::Config;
/// use obsgrid::index::MultiResolutionIndex;
/// use obsgrid::render::{RenderMode, RenderPath, plan_frame};
/// use obsgrid::index::Resolution;
/// use obsgrid::selection::SelectionState;
/// use obsgrid_types::point::{ObservationPoint, SourceDetails};
///
/// let index = MultiResolutionIndex::build(vec![
///     ObservationPoint::new("1", 10.0, 10.0, SourceDetails::primary("Canis lupus", None)),
/// ]);
/// let selection = SelectionState::new();
/// let config = Config::default();
///
/// let frame = plan_frame(&index, 14.0, RenderMode::Aggregate, &selection, &config);
/// assert_eq!(frame.path, RenderPath::Cells(Resolution::Small));
///
/// let frame = plan_frame(&index, 3.0, RenderMode::Realtime, &selection, &config);
/// assert_eq!(frame.marker_count(), 1);
/// ```
pub fn plan_frame(
    index: &MultiResolutionIndex,
    zoom: f64,
    mode: RenderMode,
    selection: &SelectionState,
    config: &Config,
) -> RenderFrame {
    let tier = config.zoom_thresholds.select(zoom);
    let path = decide(mode, tier);

    let items = match path {
        RenderPath::Cells(resolution) => index
            .cells(resolution)
            .iter()
            .map(|cell| cell_item(resolution, cell, selection, config))
            .collect(),
        RenderPath::Markers => index
            .points()
            .iter()
            .map(|point| marker_item(point, selection, config))
            .collect(),
    };

    RenderFrame {
        mode,
        tier,
        path,
        items,
    }
}

fn cell_item(
    resolution: Resolution,
    cell: &GridCell,
    selection: &SelectionState,
    config: &Config,
) -> RenderItem {
    let (selected, hovered) = selection.cell_emphasis(cell);
    let color = config.palette.color_for(cell.count());
    RenderItem {
        drawable: Drawable::Cell {
            resolution,
            key: cell.key,
            bounds: cell.bounds,
            count: cell.count(),
        },
        style: config.emphasis.style(color, selected || hovered),
        selected,
        hovered,
        popup: (selected || hovered).then(|| Popup::for_cell(cell)),
    }
}

fn marker_item(
    point: &Arc<ObservationPoint>,
    selection: &SelectionState,
    config: &Config,
) -> RenderItem {
    let (selected, hovered) = selection.marker_emphasis(&point.key());
    RenderItem {
        drawable: Drawable::Marker {
            point: Arc::clone(point),
        },
        style: config
            .emphasis
            .style(config.palette.marker_color(), selected || hovered),
        selected,
        hovered,
        popup: (selected || hovered).then(|| Popup::for_point(point)),
    }
}

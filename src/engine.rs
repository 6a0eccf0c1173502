//! The map-view facing engine.
//!
//! `LodEngine` is owned by one map view. It holds the current index snapshot,
//! the settled zoom, the render mode and the selection, and turns them into a
//! [`RenderFrame`] on demand.
//!
//! ```text
//! records ──sanitize──▶ points ──build──▶ Arc<MultiResolutionIndex>
//!                                              │
//! zoom-end ──▶ ZoomTracker ──tier──┐           │
//! mode toggle ─────────────────────┼──▶ plan_frame ──▶ RenderFrame
//! click / hover ──▶ SelectionState ┘
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::index::MultiResolutionIndex;
use crate::render::{RenderFrame, RenderMode, RenderPath, decide, plan_frame};
use crate::sanitize::{RawObservation, sanitize, sanitize_json};
use crate::selection::{MapEntity, SelectionState};
use crate::zoom::{MapEvent, ZoomTier, ZoomTracker};
use obsgrid_types::point::{ObservationPoint, PointKey};
use std::sync::Arc;

/// Level-of-detail engine for one map view.
///
/// # Examples
///
/// ```rust
/// use obsgrid::{LodEngine, MapEvent, RenderMode};
/// use obsgrid::sanitize::RawObservation;
/// use obsgrid_types::point::SourceDetails;
///
/// let mut engine = LodEngine::new();
/// engine.load(vec![
///     RawObservation::new("1", Some(48.85), Some(2.35), SourceDetails::primary("Columba livia", None)),
///     RawObservation::new("2", None, None, SourceDetails::primary("Passer montanus", None)),
/// ])?;
///
/// engine.handle_event(MapEvent::ZoomEnd(9.0));
/// assert_eq!(engine.frame().cell_count(), 1);
///
/// engine.set_mode(RenderMode::Realtime);
/// assert_eq!(engine.frame().marker_count(), 1);
/// # Ok::<(), obsgrid::EngineError>(())
/// ```
#[derive(Debug)]
pub struct LodEngine {
    config: Config,
    index: Arc<MultiResolutionIndex>,
    selection: SelectionState,
    zoom: ZoomTracker,
    mode: RenderMode,
}

impl LodEngine {
    /// An engine with the default configuration and no observations.
    pub fn new() -> Self {
        Self::from_parts(Config::default(), 0.0)
    }

    /// An engine with a custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, 0.0))
    }

    pub(crate) fn from_parts(config: Config, initial_zoom: f64) -> Self {
        let index = Arc::new(MultiResolutionIndex::empty());
        let mut selection = SelectionState::new();
        selection.sync_with(&index);
        Self {
            zoom: ZoomTracker::new(initial_zoom, config.zoom_thresholds),
            mode: config.default_mode,
            config,
            index,
            selection,
        }
    }

    /// Sanitize typed records and rebuild the index. Returns the number of
    /// points kept.
    pub fn load<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        self.load_points(sanitize(records))
    }

    /// Sanitize loosely-typed JSON records and rebuild the index.
    pub fn load_json(&mut self, values: &[serde_json::Value]) -> Result<usize> {
        self.load_points(sanitize_json(values))
    }

    /// Rebuild the index from already sanitized points.
    pub fn load_points(&mut self, points: Vec<ObservationPoint>) -> Result<usize> {
        let index = MultiResolutionIndex::build_with_sizes(points, &self.config.cell_sizes)?;
        let count = index.point_count();
        self.replace_index(Arc::new(index));
        Ok(count)
    }

    /// Swap in an index built elsewhere. Any selection is dropped.
    pub fn replace_index(&mut self, index: Arc<MultiResolutionIndex>) {
        self.index = index;
        if self.selection.sync_with(&self.index) {
            log::debug!("Selection cleared by index rebuild");
        }
    }

    pub fn index(&self) -> &Arc<MultiResolutionIndex> {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Feed a map event. Returns `true` when the settled tier changed and the
    /// host should redraw.
    pub fn handle_event(&mut self, event: MapEvent) -> bool {
        self.zoom.handle(event)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.zoom()
    }

    pub fn tier(&self) -> ZoomTier {
        self.zoom.tier()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.mode != mode {
            log::debug!("Render mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Flip between aggregate and realtime. Returns the new mode.
    pub fn toggle_mode(&mut self) -> RenderMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// The render path for the current mode and settled zoom.
    pub fn path(&self) -> RenderPath {
        decide(self.mode, self.tier())
    }

    /// Drawables for the current view.
    pub fn frame(&self) -> RenderFrame {
        plan_frame(
            &self.index,
            self.zoom.zoom(),
            self.mode,
            &self.selection,
            &self.config,
        )
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn select(&mut self, entity: MapEntity) {
        self.selection.select(entity);
    }

    pub fn hover(&mut self, entity: MapEntity) {
        self.selection.hover(entity);
    }

    pub fn unhover(&mut self) {
        self.selection.unhover();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Resolve a click at `(lat, lon)` against the drawn cells.
    ///
    /// Selects the cell under the click when cells are drawn; otherwise the
    /// click landed on empty map and the selection is cleared. Returns `true`
    /// if something is now selected.
    pub fn click_at(&mut self, lat: f64, lon: f64) -> bool {
        let hit = match self.path() {
            RenderPath::Cells(resolution) => self.index.cell_at(resolution, lat, lon).cloned(),
            RenderPath::Markers => None,
        };
        match hit {
            Some(cell) => {
                self.selection.select(MapEntity::Cell(cell));
                true
            }
            None => {
                self.selection.clear();
                false
            }
        }
    }

    /// Hover whatever cell is drawn at `(lat, lon)`, or drop the hover.
    pub fn hover_at(&mut self, lat: f64, lon: f64) -> bool {
        let hit = match self.path() {
            RenderPath::Cells(resolution) => self.index.cell_at(resolution, lat, lon).cloned(),
            RenderPath::Markers => None,
        };
        match hit {
            Some(cell) => {
                self.selection.hover(MapEntity::Cell(cell));
                true
            }
            None => {
                self.selection.unhover();
                false
            }
        }
    }

    /// Select the marker for `key`. Unknown keys clear the selection.
    pub fn click_marker(&mut self, key: &PointKey) -> bool {
        match self.index.point(key).cloned() {
            Some(point) => {
                self.selection.select(MapEntity::Marker(point));
                true
            }
            None => {
                self.selection.clear();
                false
            }
        }
    }

    /// Hover the marker for `key`. Unknown keys drop the hover.
    pub fn hover_marker(&mut self, key: &PointKey) -> bool {
        match self.index.point(key).cloned() {
            Some(point) => {
                self.selection.hover(MapEntity::Marker(point));
                true
            }
            None => {
                self.selection.unhover();
                false
            }
        }
    }
}

impl Default for LodEngine {
    fn default() -> Self {
        Self::new()
    }
}

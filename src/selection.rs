//! Selected and hovered map entities.
//!
//! Selection and hover are independent slots. Each holds at most one entity;
//! setting a slot replaces what was there. Neither slot influences the index,
//! only how the matching cell or marker is emphasised and whether it carries a
//! popup.

use crate::grid::GridCell;
use crate::index::MultiResolutionIndex;
use crate::popup::Popup;
use obsgrid_types::point::{ObservationPoint, PointKey};
use std::sync::Arc;

/// A clickable thing on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEntity {
    Cell(Arc<GridCell>),
    Marker(Arc<ObservationPoint>),
}

impl MapEntity {
    /// Whether this entity is the given grid square.
    pub fn is_cell(&self, cell: &GridCell) -> bool {
        matches!(self, MapEntity::Cell(own) if own.same_cell(cell))
    }

    /// Whether this entity is the marker for the given point.
    pub fn is_marker(&self, key: &PointKey) -> bool {
        matches!(self, MapEntity::Marker(own) if own.has_key(key))
    }

    pub fn popup(&self) -> Popup {
        match self {
            MapEntity::Cell(cell) => Popup::for_cell(cell),
            MapEntity::Marker(point) => Popup::for_point(point),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<MapEntity>,
    hovered: Option<MapEntity>,
    generation: Option<u64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `entity`, replacing any previous selection.
    pub fn select(&mut self, entity: MapEntity) {
        self.selected = Some(entity);
    }

    pub fn hover(&mut self, entity: MapEntity) {
        self.hovered = Some(entity);
    }

    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// Clear both slots, as on a click on empty map.
    pub fn clear(&mut self) {
        self.selected = None;
        self.hovered = None;
    }

    /// The entity a popup should show: the selection, else the hover.
    pub fn current(&self) -> Option<&MapEntity> {
        self.selected.as_ref().or(self.hovered.as_ref())
    }

    pub fn selected(&self) -> Option<&MapEntity> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&MapEntity> {
        self.hovered.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.hovered.is_none()
    }

    /// `(selected, hovered)` flags for a cell.
    pub fn cell_emphasis(&self, cell: &GridCell) -> (bool, bool) {
        (
            self.selected.as_ref().is_some_and(|e| e.is_cell(cell)),
            self.hovered.as_ref().is_some_and(|e| e.is_cell(cell)),
        )
    }

    /// `(selected, hovered)` flags for a marker.
    pub fn marker_emphasis(&self, key: &PointKey) -> (bool, bool) {
        (
            self.selected.as_ref().is_some_and(|e| e.is_marker(key)),
            self.hovered.as_ref().is_some_and(|e| e.is_marker(key)),
        )
    }

    /// Forget everything if `index` is not the build this state was last
    /// synced with. Returns `true` if the state was cleared.
    pub fn sync_with(&mut self, index: &MultiResolutionIndex) -> bool {
        let generation = index.generation();
        if self.generation.replace(generation) == Some(generation) {
            return false;
        }
        let had_entities = !self.is_empty();
        self.clear();
        had_entities
    }
}

//! Detail payloads for selected or hovered map entities.
//!
//! Only shaping happens here. Truncating long member lists or making them
//! scroll is up to the presentation layer.

use crate::grid::GridCell;
use obsgrid_types::bounds::CellBounds;
use obsgrid_types::point::{ObservationPoint, PointKey};
use serde::{Deserialize, Serialize};

/// Display fields of one observation, flattened for a popup row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupEntry {
    pub key: PointKey,
    /// Common name, else scientific name, else a placeholder.
    pub title: String,
    pub scientific_name: Option<String>,
    pub observed_on: Option<String>,
    pub photo_url: Option<String>,
    pub individual_count: Option<u32>,
    pub source_label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PopupEntry {
    pub fn from_point(point: &ObservationPoint) -> Self {
        let details = &point.details;
        let title = details
            .common_name()
            .or_else(|| details.scientific_name())
            .unwrap_or("Unidentified")
            .to_string();

        Self {
            key: point.key(),
            title,
            scientific_name: details.scientific_name().map(str::to_string),
            observed_on: details.observed_on().map(str::to_string),
            photo_url: details.photo_url().map(str::to_string),
            individual_count: details.individual_count(),
            source_label: point.source().label().to_string(),
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// What a popup shows: a cell's member list or one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Popup {
    Cell {
        bounds: CellBounds,
        count: usize,
        members: Vec<PopupEntry>,
    },
    Point(PopupEntry),
}

impl Popup {
    pub fn for_cell(cell: &GridCell) -> Self {
        Popup::Cell {
            bounds: cell.bounds,
            count: cell.count(),
            members: cell
                .members()
                .iter()
                .map(|m| PopupEntry::from_point(m))
                .collect(),
        }
    }

    pub fn for_point(point: &ObservationPoint) -> Self {
        Popup::Point(PopupEntry::from_point(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::bin;
    use obsgrid_types::point::SourceDetails;
    use std::sync::Arc;

    #[test]
    fn test_title_fallbacks() {
        let named = ObservationPoint::new(
            "1",
            0.0,
            0.0,
            SourceDetails::primary("Vulpes vulpes", Some("Red fox")),
        );
        assert_eq!(PopupEntry::from_point(&named).title, "Red fox");

        let scientific = ObservationPoint::new(
            "2",
            0.0,
            0.0,
            SourceDetails::butterfly_checklist("Vanessa atalanta", None),
        );
        assert_eq!(PopupEntry::from_point(&scientific).title, "Vanessa atalanta");

        let bare = ObservationPoint::new(
            "3",
            0.0,
            0.0,
            SourceDetails::empty(obsgrid_types::point::Provenance::BirdChecklist),
        );
        let entry = PopupEntry::from_point(&bare);
        assert_eq!(entry.title, "Unidentified");
        assert_eq!(entry.source_label, "Bird checklist");
    }

    #[test]
    fn test_cell_popup_lists_all_members() {
        let points: Vec<_> = (0..4)
            .map(|i| {
                Arc::new(ObservationPoint::new(
                    i.to_string(),
                    0.1 + i as f64 * 0.01,
                    0.1,
                    SourceDetails::primary("Sciurus vulgaris", None)
                        .with_photo_url(format!("{}.jpg", i)),
                ))
            })
            .collect();
        let cell = bin(&points, 0.5).unwrap().remove(0);

        match Popup::for_cell(&cell) {
            Popup::Cell { count, members, .. } => {
                assert_eq!(count, 4);
                assert_eq!(members.len(), 4);
                assert_eq!(members[2].photo_url.as_deref(), Some("2.jpg"));
            }
            other => panic!("expected cell popup, got {:?}", other),
        }
    }
}

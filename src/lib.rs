//! Multi-resolution grid aggregation and level-of-detail rendering for
//! observation maps.
//!
//! Observations are binned into square degree cells at four fixed sizes. The
//! map zoom picks a size, the user's mode picks cells or raw markers, and an
//! absolute color scale styles each cell by how many observations it holds.
//!
//! ```rust
//! use obsgrid::{LodEngine, MapEvent, RenderMode};
//! use obsgrid::sanitize::RawObservation;
//! use obsgrid_types::point::SourceDetails;
//!
//! let mut engine = LodEngine::new();
//! engine.load(vec![
//!     RawObservation::new("1", Some(1.01), Some(1.01), SourceDetails::primary("Bubo bubo", None)),
//!     RawObservation::new("2", Some(1.02), Some(1.02), SourceDetails::primary("Strix aluco", None)),
//!     RawObservation::new("3", Some(2.5), Some(2.5), SourceDetails::primary("Tyto alba", None)),
//! ])?;
//!
//! engine.handle_event(MapEvent::ZoomEnd(5.0));
//! let frame = engine.frame();
//! assert_eq!(frame.cell_count(), 2);
//!
//! engine.set_mode(RenderMode::Realtime);
//! assert_eq!(engine.frame().marker_count(), 3);
//! # Ok::<(), obsgrid::EngineError>(())
//! ```

pub mod builder;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod index;
pub mod popup;
pub mod render;
pub mod sanitize;
pub mod selection;
pub mod zoom;

#[cfg(feature = "geojson")]
pub mod geojson;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::EngineBuilder;
pub use config::Config;
pub use engine::LodEngine;
pub use error::{EngineError, Result};

pub use color::{ColorScale, Intensity, color_for, intensity_for};
pub use grid::{CellKey, GridCell, bin};
pub use index::{CellSizes, IndexStats, MultiResolutionIndex, Resolution};
pub use popup::{Popup, PopupEntry};
pub use render::{
    Drawable, Emphasis, RenderFrame, RenderItem, RenderMode, RenderPath, decide, plan_frame,
};
pub use sanitize::{RawObservation, sanitize, sanitize_json};
pub use selection::{MapEntity, SelectionState};
pub use zoom::{MapEvent, ZoomThresholds, ZoomTier, ZoomTracker, select_tier};

#[cfg(feature = "sync")]
pub use sync::SharedIndex;

pub use obsgrid_types::bounds::CellBounds;
pub use obsgrid_types::point::{ObservationPoint, PointKey, Provenance, SourceDetails};
pub use obsgrid_types::style::{CellStyle, Color};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, EngineBuilder, EngineError, LodEngine, Result};

    pub use crate::{MapEvent, RenderFrame, RenderMode, RenderPath, ZoomTier};

    pub use crate::{MapEntity, MultiResolutionIndex, RawObservation, Resolution};

    pub use crate::{ObservationPoint, PointKey, Provenance, SourceDetails};
}

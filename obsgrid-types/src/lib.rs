//! # obsgrid-types
//!
//! Plain value types shared by the obsgrid map engine and its callers.
//!
//! - **Point types**: `ObservationPoint`, `PointKey`, `Provenance`, `SourceDetails`
//! - **Bounds**: `CellBounds`, a degree-space rectangle with SW/NE corners
//! - **Style**: `Color`, `CellStyle`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use obsgrid_types::point::{ObservationPoint, SourceDetails};
//!
//! let point = ObservationPoint::new(
//!     "1042",
//!     -33.9249,
//!     18.4241,
//!     SourceDetails::primary("Protea cynaroides", Some("King protea")),
//! );
//! assert_eq!(point.source().as_str(), "primary");
//! ```

pub mod bounds;
pub mod point;
pub mod style;

use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// The dataset an observation originates from.
///
/// Provenance tags are a small fixed set: observations uploaded to the platform
/// itself, and records imported from partner checklist systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Primary,
    BirdChecklist,
    ButterflyChecklist,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [
        Provenance::Primary,
        Provenance::BirdChecklist,
        Provenance::ButterflyChecklist,
    ];

    /// The wire tag used by the observation list provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Primary => "primary",
            Provenance::BirdChecklist => "bird-checklist",
            Provenance::ButterflyChecklist => "butterfly-checklist",
        }
    }

    /// Human readable label for popups.
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Primary => "Observation",
            Provenance::BirdChecklist => "Bird checklist",
            Provenance::ButterflyChecklist => "Butterfly checklist",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a provenance tag is not one of the known sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvenance(pub String);

impl fmt::Display for UnknownProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown observation source: {}", self.0)
    }
}

impl std::error::Error for UnknownProvenance {}

impl FromStr for Provenance {
    type Err = UnknownProvenance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provenance::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProvenance(s.to_string()))
    }
}

/// Display fields carried through the engine untouched, shaped per source.
///
/// Each variant holds only what that source actually supplies. Checklist imports
/// for birds never carry photos but do carry a tally of individuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum SourceDetails {
    Primary {
        #[serde(default)]
        scientific_name: Option<String>,
        #[serde(default)]
        common_name: Option<String>,
        #[serde(default)]
        observed_on: Option<String>,
        #[serde(default)]
        photo_url: Option<String>,
    },
    BirdChecklist {
        #[serde(default)]
        scientific_name: Option<String>,
        #[serde(default)]
        common_name: Option<String>,
        #[serde(default)]
        observed_on: Option<String>,
        #[serde(default)]
        individual_count: Option<u32>,
    },
    ButterflyChecklist {
        #[serde(default)]
        scientific_name: Option<String>,
        #[serde(default)]
        common_name: Option<String>,
        #[serde(default)]
        observed_on: Option<String>,
        #[serde(default)]
        photo_url: Option<String>,
    },
}

impl SourceDetails {
    /// Details for a platform observation.
    pub fn primary(scientific_name: &str, common_name: Option<&str>) -> Self {
        SourceDetails::Primary {
            scientific_name: Some(scientific_name.to_string()),
            common_name: common_name.map(str::to_string),
            observed_on: None,
            photo_url: None,
        }
    }

    /// Details for a bird checklist record.
    pub fn bird_checklist(scientific_name: &str, common_name: Option<&str>) -> Self {
        SourceDetails::BirdChecklist {
            scientific_name: Some(scientific_name.to_string()),
            common_name: common_name.map(str::to_string),
            observed_on: None,
            individual_count: None,
        }
    }

    /// Details for a butterfly checklist record.
    pub fn butterfly_checklist(scientific_name: &str, common_name: Option<&str>) -> Self {
        SourceDetails::ButterflyChecklist {
            scientific_name: Some(scientific_name.to_string()),
            common_name: common_name.map(str::to_string),
            observed_on: None,
            photo_url: None,
        }
    }

    /// Empty details for the given source.
    pub fn empty(source: Provenance) -> Self {
        match source {
            Provenance::Primary => SourceDetails::Primary {
                scientific_name: None,
                common_name: None,
                observed_on: None,
                photo_url: None,
            },
            Provenance::BirdChecklist => SourceDetails::BirdChecklist {
                scientific_name: None,
                common_name: None,
                observed_on: None,
                individual_count: None,
            },
            Provenance::ButterflyChecklist => SourceDetails::ButterflyChecklist {
                scientific_name: None,
                common_name: None,
                observed_on: None,
                photo_url: None,
            },
        }
    }

    pub fn with_observed_on(mut self, date: impl Into<String>) -> Self {
        match &mut self {
            SourceDetails::Primary { observed_on, .. }
            | SourceDetails::BirdChecklist { observed_on, .. }
            | SourceDetails::ButterflyChecklist { observed_on, .. } => {
                *observed_on = Some(date.into());
            }
        }
        self
    }

    /// Attach a photo reference. Sources without photos ignore it.
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        match &mut self {
            SourceDetails::Primary { photo_url, .. }
            | SourceDetails::ButterflyChecklist { photo_url, .. } => {
                *photo_url = Some(url.into());
            }
            SourceDetails::BirdChecklist { .. } => {}
        }
        self
    }

    /// Attach an individual count. Only bird checklists record one.
    pub fn with_individual_count(mut self, count: u32) -> Self {
        if let SourceDetails::BirdChecklist {
            individual_count, ..
        } = &mut self
        {
            *individual_count = Some(count);
        }
        self
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            SourceDetails::Primary { .. } => Provenance::Primary,
            SourceDetails::BirdChecklist { .. } => Provenance::BirdChecklist,
            SourceDetails::ButterflyChecklist { .. } => Provenance::ButterflyChecklist,
        }
    }

    pub fn scientific_name(&self) -> Option<&str> {
        match self {
            SourceDetails::Primary {
                scientific_name, ..
            }
            | SourceDetails::BirdChecklist {
                scientific_name, ..
            }
            | SourceDetails::ButterflyChecklist {
                scientific_name, ..
            } => scientific_name.as_deref(),
        }
    }

    pub fn common_name(&self) -> Option<&str> {
        match self {
            SourceDetails::Primary { common_name, .. }
            | SourceDetails::BirdChecklist { common_name, .. }
            | SourceDetails::ButterflyChecklist { common_name, .. } => common_name.as_deref(),
        }
    }

    pub fn observed_on(&self) -> Option<&str> {
        match self {
            SourceDetails::Primary { observed_on, .. }
            | SourceDetails::BirdChecklist { observed_on, .. }
            | SourceDetails::ButterflyChecklist { observed_on, .. } => observed_on.as_deref(),
        }
    }

    pub fn photo_url(&self) -> Option<&str> {
        match self {
            SourceDetails::Primary { photo_url, .. }
            | SourceDetails::ButterflyChecklist { photo_url, .. } => photo_url.as_deref(),
            SourceDetails::BirdChecklist { .. } => None,
        }
    }

    pub fn individual_count(&self) -> Option<u32> {
        match self {
            SourceDetails::BirdChecklist {
                individual_count, ..
            } => *individual_count,
            _ => None,
        }
    }
}

/// De-duplication identity of an observation: `id` is only unique within its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointKey {
    pub id: String,
    pub source: Provenance,
}

impl PointKey {
    pub fn new(id: impl Into<String>, source: Provenance) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// Latitude range, in degrees.
pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Longitude range, in degrees.
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Whether `(lat, lon)` lies within the valid degree ranges. NaN never does.
pub fn coordinates_on_globe(lat: f64, lon: f64) -> bool {
    LATITUDE_RANGE.contains(&lat) && LONGITUDE_RANGE.contains(&lon)
}

/// A geotagged observation projected down to what the map needs.
///
/// Coordinates are plain degrees. A point only exists once both coordinates
/// were present and finite; records without them never become an
/// `ObservationPoint`.
///
/// # Examples
///
/// ```
/// use obsgrid_types::point::{ObservationPoint, Provenance, SourceDetails};
///
/// let point = ObservationPoint::new(
///     "77",
///     51.5074,
///     -0.1278,
///     SourceDetails::bird_checklist("Erithacus rubecula", Some("European robin"))
///         .with_individual_count(3),
/// );
/// assert_eq!(point.source(), Provenance::BirdChecklist);
/// assert_eq!(point.key().to_string(), "bird-checklist:77");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub details: SourceDetails,
}

impl ObservationPoint {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, details: SourceDetails) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            details,
        }
    }

    /// Provenance, derived from the shape of the display fields.
    pub fn source(&self) -> Provenance {
        self.details.provenance()
    }

    pub fn key(&self) -> PointKey {
        PointKey::new(self.id.clone(), self.source())
    }

    /// Whether this point has the given identity, without allocating a key.
    pub fn has_key(&self, key: &PointKey) -> bool {
        self.source() == key.source && self.id == key.id
    }

    /// Whether the coordinates name a place on the globe: latitude within
    /// `[-90, 90]` and longitude within `[-180, 180]`.
    pub fn is_on_globe(&self) -> bool {
        coordinates_on_globe(self.latitude, self.longitude)
    }

    /// The location as a `geo::Point` (x = longitude, y = latitude).
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

//! Filtering of raw observation records down to mappable points.
//!
//! Sanitizing never fails. Records without usable coordinates are dropped
//! silently and whatever valid subset exists is rendered. Usable means finite
//! and on the globe: latitude within `[-90, 90]`, longitude within `[-180, 180]`.

use obsgrid_types::point::{
    ObservationPoint, PointKey, Provenance, SourceDetails, coordinates_on_globe,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed observation record as handed over by the observation list provider.
///
/// Coordinates are optional because the provider passes through records that
/// were never geotagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub details: SourceDetails,
}

impl RawObservation {
    pub fn new(
        id: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        details: SourceDetails,
    ) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            details,
        }
    }

    /// Convert to a point if both coordinates are present and on the globe.
    pub fn into_point(self) -> Option<ObservationPoint> {
        let lat = self.latitude?;
        let lon = self.longitude?;
        if !coordinates_on_globe(lat, lon) {
            return None;
        }
        Some(ObservationPoint::new(self.id, lat, lon, self.details))
    }
}

/// Keep only records with latitude and longitude on the globe.
///
/// Later records repeating an `(id, source)` pair already seen are dropped, so
/// every returned point has a distinct identity.
///
/// # Examples
///
/// ```
/// use obsgrid::sanitize::{RawObservation, sanitize};
/// use obsgrid_types::point::SourceDetails;
///
/// let records = vec![
///     RawObservation::new("1", Some(1.0), Some(2.0), SourceDetails::primary("Apis mellifera", None)),
///     RawObservation::new("2", None, Some(2.0), SourceDetails::primary("Bombus terrestris", None)),
///     RawObservation::new("3", Some(f64::NAN), Some(2.0), SourceDetails::primary("Vespa crabro", None)),
/// ];
///
/// let points = sanitize(records);
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].id, "1");
/// ```
pub fn sanitize<I>(records: I) -> Vec<ObservationPoint>
where
    I: IntoIterator<Item = RawObservation>,
{
    let mut seen = FxHashSet::default();
    let mut points = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        match record.into_point() {
            Some(point) if seen.insert(point.key()) => points.push(point),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!(
            "Sanitizer kept {} points, dropped {} records",
            points.len(),
            dropped
        );
    }
    points
}

/// Same contract as [`sanitize`], over loosely-typed JSON records.
///
/// A record is kept when it is an object with an `id` (string or integer), a
/// known `source` tag (a missing tag means a platform observation) and numeric
/// `latitude`/`longitude` on the globe. Numbers encoded as strings are not numeric.
/// Display fields of the wrong type are treated as absent rather than failing
/// the record.
pub fn sanitize_json(values: &[Value]) -> Vec<ObservationPoint> {
    let mut seen: FxHashSet<PointKey> = FxHashSet::default();
    let mut points = Vec::new();

    for value in values {
        if let Some(point) = point_from_json(value)
            && seen.insert(point.key())
        {
            points.push(point);
        }
    }

    let dropped = values.len() - points.len();
    if dropped > 0 {
        log::debug!(
            "Sanitizer kept {} of {} JSON records",
            points.len(),
            values.len()
        );
    }
    points
}

fn point_from_json(value: &Value) -> Option<ObservationPoint> {
    let obj = value.as_object()?;

    let id = match obj.get("id")? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        _ => return None,
    };

    let source = match obj.get("source") {
        None | Some(Value::Null) => Provenance::Primary,
        Some(Value::String(tag)) => tag.parse().ok()?,
        Some(_) => return None,
    };

    let latitude = finite_number(obj.get("latitude")?)?;
    let longitude = finite_number(obj.get("longitude")?)?;
    if !coordinates_on_globe(latitude, longitude) {
        return None;
    }

    Some(ObservationPoint::new(
        id,
        latitude,
        longitude,
        details_from_json(obj, source),
    ))
}

fn finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

fn details_from_json(obj: &Map<String, Value>, source: Provenance) -> SourceDetails {
    let scientific_name = string_field(obj, &["scientific_name", "scientificName"]);
    let common_name = string_field(obj, &["common_name", "commonName"]);
    let observed_on = string_field(obj, &["observed_on", "observedOn", "date"]);

    match source {
        Provenance::Primary => SourceDetails::Primary {
            scientific_name,
            common_name,
            observed_on,
            photo_url: string_field(obj, &["photo_url", "photoUrl"]),
        },
        Provenance::BirdChecklist => SourceDetails::BirdChecklist {
            scientific_name,
            common_name,
            observed_on,
            individual_count: obj
                .get("individual_count")
                .or_else(|| obj.get("individualCount"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
        },
        Provenance::ButterflyChecklist => SourceDetails::ButterflyChecklist {
            scientific_name,
            common_name,
            observed_on,
            photo_url: string_field(obj, &["photo_url", "photoUrl"]),
        },
    }
}

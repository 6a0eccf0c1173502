//! GeoJSON export of render frames.
//!
//! Cells become polygons and markers become points. Style and popup data ride
//! along in each feature's properties so a GeoJSON-speaking map layer can style
//! features without knowing about this crate's types.

use crate::error::Result;
use crate::render::{Drawable, RenderFrame, RenderItem};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};

impl RenderFrame {
    /// Convert the frame to a GeoJSON FeatureCollection.
    pub fn to_feature_collection(&self) -> Result<FeatureCollection> {
        let features = self
            .items
            .iter()
            .map(item_to_feature)
            .collect::<Result<Vec<_>>>()?;

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Convert the frame to a GeoJSON string.
    pub fn to_geojson(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_feature_collection()?)?)
    }
}

fn item_to_feature(item: &RenderItem) -> Result<Feature> {
    let mut props = Map::new();

    let geom = match &item.drawable {
        Drawable::Cell {
            resolution,
            key,
            bounds,
            count,
        } => {
            let ring: Vec<Vec<f64>> = bounds
                .to_polygon()
                .exterior()
                .coords()
                .map(|coord| vec![coord.x, coord.y])
                .collect();
            props.insert("kind".to_string(), json!("cell"));
            props.insert("resolution".to_string(), json!(resolution.as_str()));
            props.insert("row".to_string(), json!(key.row));
            props.insert("col".to_string(), json!(key.col));
            props.insert("count".to_string(), json!(count));
            Geometry::new(Value::Polygon(vec![ring]))
        }
        Drawable::Marker { point } => {
            props.insert("kind".to_string(), json!("marker"));
            props.insert("id".to_string(), json!(point.id));
            props.insert("source".to_string(), json!(point.source().as_str()));
            Geometry::new(Value::Point(vec![point.longitude, point.latitude]))
        }
    };

    props.insert("color".to_string(), json!(item.style.color.to_hex()));
    props.insert("fillColor".to_string(), json!(item.style.color.to_css()));
    props.insert("fillOpacity".to_string(), json!(item.style.fill_opacity));
    props.insert("weight".to_string(), json!(item.style.stroke_weight));
    props.insert("selected".to_string(), json!(item.selected));
    props.insert("hovered".to_string(), json!(item.hovered));
    if let Some(popup) = &item.popup {
        props.insert("popup".to_string(), serde_json::to_value(popup)?);
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(geom),
        id: None,
        properties: Some(props),
        foreign_members: None,
    })
}

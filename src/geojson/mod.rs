//! GeoJSON output
//!
//! Small builders producing `serde_json` values in GeoJSON form, plus
//! converters from solver results. Vertices are `[longitude, latitude]`.

use serde_json::{json, Map, Value};

use crate::outline::LocalEclipseFeatures;
use crate::path::GlobalEclipseFeatures;
use crate::pathtable::PathTable;

/// A Polygon feature with a single outer ring
pub fn polygon(ring: &[[f64; 2]]) -> Value {
    feature(json!({ "type": "Polygon", "coordinates": [ring] }))
}

/// A LineString feature
pub fn line_string(coordinates: &[[f64; 2]]) -> Value {
    feature(json!({ "type": "LineString", "coordinates": coordinates }))
}

/// A Point feature
pub fn point(coordinate: [f64; 2]) -> Value {
    feature(json!({ "type": "Point", "coordinates": coordinate }))
}

fn feature(geometry: Value) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": null })
}

/// Wraps features into a FeatureCollection
pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// Sets a property on a feature built by this module
pub fn with_property(mut feature: Value, key: &str, value: Value) -> Value {
    if let Some(obj) = feature.as_object_mut() {
        let properties = obj
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if !properties.is_object() {
            *properties = Value::Object(Map::new());
        }
        if let Some(properties) = properties.as_object_mut() {
            properties.insert(key.to_string(), value);
        }
    }
    feature
}

fn named(feature: Value, name: &str) -> Value {
    with_property(feature, "name", Value::from(name))
}

/// Umbra and penumbra outlines as Polygons; empty outlines are left out
pub fn local_features(features: &LocalEclipseFeatures) -> Value {
    let outlines = [
        ("umbra", &features.umbra_outline),
        ("penumbra", &features.penumbra_outline),
    ];
    let polygons = outlines
        .into_iter()
        .filter(|(_, ring)| !ring.is_empty())
        .map(|(name, ring)| named(polygon(ring), name))
        .collect();
    feature_collection(polygons)
}

/// Limit lines as LineStrings and, when known, the path center as a Point
pub fn global_features(features: &GlobalEclipseFeatures) -> Value {
    let mut collection = vec![
        named(
            line_string(&features.umbra_limit_north.to_long_lat()),
            "umbraLimitNorth",
        ),
        named(
            line_string(&features.umbra_limit_south.to_long_lat()),
            "umbraLimitSouth",
        ),
    ];
    if let Some(bounds) = features.bounds {
        collection.push(named(point(bounds.center), "center"));
    }
    feature_collection(collection)
}

/// Center line as a LineString and the path outline as a Polygon
pub fn path_table(table: &PathTable) -> Value {
    feature_collection(vec![
        named(line_string(&table.center_line()), "centerLine"),
        named(polygon(&table.limits_polygon()), "bounds"),
    ])
}

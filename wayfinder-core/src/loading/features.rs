//! Walkway network ingestion from GeoJSON

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, GeoJson};
use log::{debug, info};
use serde_json::Value as JsonValue;

use crate::{Error, ModeSet, WalkwayLine, WalkwayNetwork};

const MODES_PROPERTY: &str = "modes";

impl WalkwayNetwork {
    /// Builds a network from a feature collection.
    ///
    /// `LineString` features become one line each and `MultiLineString`
    /// features one line per part. Every other geometry kind is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature geometry cannot be converted or its
    /// `modes` property has an unsupported type.
    pub fn from_geojson(collection: &FeatureCollection) -> Result<Self, Error> {
        let mut network = WalkwayNetwork::default();
        for (idx, feature) in collection.features.iter().enumerate() {
            push_feature(&mut network, idx, feature)?;
        }

        info!(
            "Loaded {} walkway lines ({} segments) from {} features",
            network.len(),
            network.segment_count(),
            collection.features.len()
        );
        Ok(network)
    }

    /// Parses GeoJSON text holding a `FeatureCollection`, a single `Feature`
    /// or a bare geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GeoJsonError`] if the text is not valid GeoJSON.
    pub fn from_geojson_str(source: &str) -> Result<Self, Error> {
        let parsed = source
            .parse::<GeoJson>()
            .map_err(|e| Error::GeoJsonError(e.to_string()))?;

        match parsed {
            GeoJson::FeatureCollection(collection) => Self::from_geojson(&collection),
            GeoJson::Feature(feature) => Self::from_geojson(&FeatureCollection {
                features: vec![feature],
                bbox: None,
                foreign_members: None,
            }),
            GeoJson::Geometry(geometry) => Self::from_geojson(&FeatureCollection {
                features: vec![Feature::from(geometry)],
                bbox: None,
                foreign_members: None,
            }),
        }
    }

    /// Checks that the network holds at least one routable line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if no line has two or more vertices.
    pub fn validate(&self) -> Result<(), Error> {
        if self.lines().iter().any(WalkwayLine::is_routable) {
            Ok(())
        } else {
            Err(Error::InvalidData(
                "walkway network contains no line with at least two vertices".to_string(),
            ))
        }
    }
}

fn push_feature(network: &mut WalkwayNetwork, idx: usize, feature: &Feature) -> Result<(), Error> {
    let Some(geometry) = feature.geometry.clone() else {
        debug!("Skipping feature #{idx} without geometry");
        return Ok(());
    };

    let geometry = geo::Geometry::<f64>::try_from(geometry)
        .map_err(|e| Error::GeoJsonError(format!("feature #{idx}: {e}")))?;
    let modes = feature_modes(idx, feature)?;

    match geometry {
        geo::Geometry::LineString(line) => network.push(to_line(line, modes)),
        geo::Geometry::MultiLineString(lines) => {
            for line in lines {
                network.push(to_line(line, modes));
            }
        }
        geo::Geometry::Point(_)
        | geo::Geometry::Line(_)
        | geo::Geometry::Polygon(_)
        | geo::Geometry::MultiPoint(_)
        | geo::Geometry::MultiPolygon(_)
        | geo::Geometry::GeometryCollection(_)
        | geo::Geometry::Rect(_)
        | geo::Geometry::Triangle(_) => {
            debug!("Skipping feature #{idx}: not a line geometry");
        }
    }
    Ok(())
}

fn to_line(line: LineString<f64>, modes: ModeSet) -> WalkwayLine {
    let coords: Vec<Coord<f64>> = line.into_inner();
    WalkwayLine::new(coords, modes)
}

/// Reads the `modes` property, either a tag string (`"walk,bike"`) or an
/// array of mode names.
fn feature_modes(idx: usize, feature: &Feature) -> Result<ModeSet, Error> {
    match feature.property(MODES_PROPERTY) {
        None | Some(JsonValue::Null) => Ok(ModeSet::ALL),
        Some(JsonValue::String(tag)) => Ok(ModeSet::from_tag(Some(tag))),
        Some(JsonValue::Array(items)) => {
            let tokens: Vec<&str> = items.iter().filter_map(JsonValue::as_str).collect();
            if tokens.len() != items.len() {
                return Err(Error::InvalidData(format!(
                    "feature #{idx}: '{MODES_PROPERTY}' array must contain only strings"
                )));
            }
            if tokens.is_empty() {
                return Ok(ModeSet::ALL);
            }
            Ok(ModeSet::from_tag(Some(&tokens.join(","))))
        }
        Some(other) => Err(Error::InvalidData(format!(
            "feature #{idx}: unsupported '{MODES_PROPERTY}' value {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TravelMode;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "modes": "walk,bike" },
                "geometry": { "type": "LineString", "coordinates": [[31.80, 36.60], [31.81, 36.60]] }
            },
            {
                "type": "Feature",
                "properties": { "modes": ["shuttle"] },
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [
                        [[31.80, 36.61], [31.81, 36.61]],
                        [[31.82, 36.61], [31.83, 36.61], [31.84, 36.61]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Main gate" },
                "geometry": { "type": "Point", "coordinates": [31.80, 36.60] }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": { "type": "LineString", "coordinates": [[31.85, 36.60]] }
            }
        ]
    }"#;

    #[test]
    fn lines_and_multilines_are_loaded() {
        let network = WalkwayNetwork::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(network.len(), 4);
        assert_eq!(network.segment_count(), 4);

        let lines = network.lines();
        let walk_bike: ModeSet = [TravelMode::Walk, TravelMode::Bike].into_iter().collect();
        assert_eq!(lines[0].modes, walk_bike);
        assert_eq!(lines[1].modes, ModeSet::only(TravelMode::Shuttle));
        assert_eq!(lines[2].modes, ModeSet::only(TravelMode::Shuttle));
        assert_eq!(lines[3].modes, ModeSet::ALL);
        assert!(!lines[3].is_routable());
        assert!(network.validate().is_ok());
    }

    #[test]
    fn network_without_lines_fails_validation() {
        let network = WalkwayNetwork::from_geojson_str(
            r#"{ "type": "Point", "coordinates": [31.80, 36.60] }"#,
        )
        .unwrap();
        assert!(network.is_empty());
        assert!(matches!(network.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn bad_modes_property_is_rejected() {
        let result = WalkwayNetwork::from_geojson_str(
            r#"{
                "type": "Feature",
                "properties": { "modes": 3 },
                "geometry": { "type": "LineString", "coordinates": [[31.80, 36.60], [31.81, 36.60]] }
            }"#,
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn malformed_text_is_a_geojson_error() {
        assert!(matches!(
            WalkwayNetwork::from_geojson_str("{ not json"),
            Err(Error::GeoJsonError(_))
        ));
    }
}

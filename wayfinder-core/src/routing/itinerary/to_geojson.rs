use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::{Connector, RouteResult};
use crate::Error;

impl RouteResult {
    /// Converts the route to a `GeoJSON` `FeatureCollection`: the main path
    /// (`role: "main"`) followed by every rendered connector
    /// (`role: "connector"`).
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let mut features = vec![self.main_feature()?];
        if self.start_connector.rendered {
            features.push(connector_feature(&self.start_connector, "start")?);
        }
        if self.destination_connector.rendered {
            features.push(connector_feature(&self.destination_connector, "destination")?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    fn main_feature(&self) -> Result<Feature, Error> {
        let geometry = line_geometry(self.coords.clone());
        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "role": "main",
                "profile": self.profile,
                "main_length_m": self.main_length_m,
                "total_length_m": self.total_length_m,
                "duration_s": self.duration_s,
                "start_connector_m": self.start_connector.length_m,
                "destination_connector_m": self.destination_connector.length_m,
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn connector_feature(connector: &Connector, end: &str) -> Result<Feature, Error> {
    let geometry = line_geometry(vec![connector.from, connector.to]);
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "role": "connector",
            "end": end,
            "length_m": connector.length_m,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn line_geometry(coords: Vec<Coord<f64>>) -> Geometry {
    Geometry::new(GeoJsonValue::from(&LineString::new(coords)))
}

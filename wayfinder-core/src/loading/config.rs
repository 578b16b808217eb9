use std::collections::BTreeMap;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Error, Meters, TravelMode};

/// Speed used when neither the requested nor the default profile has one.
pub const FALLBACK_SPEED_MPS: f64 = 1.35;

/// Distance thresholds governing merging, connection and splitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Coordinates closer than this to an existing node reuse that node.
    pub merge_tolerance_m: Meters,
    /// Segments of different lines closer than this get connected.
    pub connect_tolerance_m: Meters,
    /// Connection candidates closer than this are joined through a shared
    /// node instead of a connector edge. Must not exceed `merge_tolerance_m`.
    pub same_point_eps_m: Meters,
    /// Parametric distance from a segment end below which a cut resolves to
    /// the endpoint itself.
    pub cut_t_eps: f64,
    /// Parametric positions are rounded to `1 / cut_key_scale` to dedupe cuts.
    pub cut_key_scale: f64,
    /// Sub-edges shorter than this are not created.
    pub min_edge_length_m: Meters,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            merge_tolerance_m: 2.0,
            connect_tolerance_m: 20.0,
            same_point_eps_m: 0.75,
            cut_t_eps: 1e-5,
            cut_key_scale: 1e6,
            min_edge_length_m: 0.05,
        }
    }
}

/// Limits on the straight links between query points and the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteLimits {
    /// Queries whose snap distance exceeds this fail outright.
    pub max_connector_m: Meters,
    /// Connectors shorter than this are left out of the rendered geometry
    /// (they still count towards the total length).
    pub hide_connector_lt_m: Meters,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            max_connector_m: 50.0,
            hide_connector_lt_m: 5.0,
        }
    }
}

/// Routing configuration for a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub tolerances: Tolerances,
    pub limits: RouteLimits,
    /// Travel speed per profile in meters per second
    pub speeds: BTreeMap<TravelMode, f64>,
    /// Profile whose speed is used when the requested one has none
    pub default_profile: TravelMode,
    /// Maximum nodes visited by the diagnostic reachability scan
    pub reachability_budget: usize,
    /// Start used when a query omits one, as `[lon, lat]`
    pub fallback_start: Option<[f64; 2]>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            limits: RouteLimits::default(),
            speeds: BTreeMap::from([
                (TravelMode::Walk, 1.35),
                (TravelMode::Bike, 4.5),
                (TravelMode::Shuttle, 7.0),
            ]),
            default_profile: TravelMode::Walk,
            reachability_budget: 2000,
            fallback_start: None,
        }
    }
}

impl RoutingConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let config: RoutingConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every threshold and speed is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<(), Error> {
        let t = &self.tolerances;
        let positive = [
            ("tolerances.merge_tolerance_m", t.merge_tolerance_m),
            ("tolerances.connect_tolerance_m", t.connect_tolerance_m),
            ("tolerances.cut_key_scale", t.cut_key_scale),
            ("limits.max_connector_m", self.limits.max_connector_m),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("tolerances.same_point_eps_m", t.same_point_eps_m),
            ("tolerances.cut_t_eps", t.cut_t_eps),
            ("tolerances.min_edge_length_m", t.min_edge_length_m),
            ("limits.hide_connector_lt_m", self.limits.hide_connector_lt_m),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if t.same_point_eps_m > t.merge_tolerance_m {
            return Err(Error::InvalidConfig(format!(
                "tolerances.same_point_eps_m ({}) must not exceed tolerances.merge_tolerance_m ({})",
                t.same_point_eps_m, t.merge_tolerance_m
            )));
        }
        if t.cut_t_eps >= 0.5 {
            return Err(Error::InvalidConfig(format!(
                "tolerances.cut_t_eps must be below 0.5, got {}",
                t.cut_t_eps
            )));
        }

        for (mode, speed) in &self.speeds {
            if !(speed.is_finite() && *speed > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "speed for '{mode}' must be a positive number, got {speed}"
                )));
            }
        }

        if let Some([lon, lat]) = self.fallback_start {
            if !(lon.is_finite() && lat.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0) {
                return Err(Error::InvalidConfig(format!(
                    "fallback_start [{lon}, {lat}] is not a valid lon/lat pair"
                )));
            }
        }

        Ok(())
    }

    /// Speed for `profile` in m/s, falling back to the default profile's.
    pub fn speed_for(&self, profile: TravelMode) -> f64 {
        self.speeds
            .get(&profile)
            .or_else(|| self.speeds.get(&self.default_profile))
            .copied()
            .unwrap_or(FALLBACK_SPEED_MPS)
    }

    pub fn fallback_start_coord(&self) -> Option<Coord<f64>> {
        self.fallback_start.map(|[x, y]| Coord { x, y })
    }
}

//! Travel profiles and the per-edge sets of profiles allowed on a walkway

use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Requested travel profile
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[serde(alias = "walking", alias = "foot")]
    Walk,
    #[serde(alias = "cycling", alias = "bicycle")]
    Bike,
    #[serde(alias = "bus", alias = "vehicle")]
    Shuttle,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Walk, TravelMode::Bike, TravelMode::Shuttle];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
            TravelMode::Bike => "bike",
            TravelMode::Shuttle => "shuttle",
        }
    }

    fn bit(self) -> u8 {
        match self {
            TravelMode::Walk => 0b001,
            TravelMode::Bike => 0b010,
            TravelMode::Shuttle => 0b100,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walk" | "walking" | "foot" => Ok(TravelMode::Walk),
            "bike" | "cycling" | "bicycle" => Ok(TravelMode::Bike),
            "shuttle" | "bus" | "vehicle" => Ok(TravelMode::Shuttle),
            other => Err(Error::InvalidData(format!("unknown travel mode '{other}'"))),
        }
    }
}

/// Set of travel profiles allowed to traverse a line or edge
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    pub const EMPTY: ModeSet = ModeSet(0);
    pub const ALL: ModeSet = ModeSet(0b111);

    pub fn only(mode: TravelMode) -> Self {
        ModeSet(mode.bit())
    }

    pub fn contains(self, mode: TravelMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn insert(&mut self, mode: TravelMode) {
        self.0 |= mode.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersection(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 & other.0)
    }

    pub fn union(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 | other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = TravelMode> {
        TravelMode::ALL.into_iter().filter(move |mode| self.contains(*mode))
    }

    /// Parses a line's mode tag such as `"walk,bike"` or `"walk; shuttle"`.
    ///
    /// A missing or blank tag allows every mode. Unknown tokens are dropped,
    /// so a tag made only of unknown tokens yields an empty set.
    pub fn from_tag(tag: Option<&str>) -> ModeSet {
        let Some(tag) = tag.filter(|t| !t.trim().is_empty()) else {
            return ModeSet::ALL;
        };

        tag.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token.parse::<TravelMode>() {
                Ok(mode) => Some(mode),
                Err(_) => {
                    warn!("Ignoring unknown travel mode '{token}' in tag '{tag}'");
                    None
                }
            })
            .collect()
    }
}

impl FromIterator<TravelMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = TravelMode>>(iter: I) -> Self {
        let mut set = ModeSet::EMPTY;
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(TravelMode::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for ModeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

//! Raw walkway network as supplied by the data-loading collaborator

use geo::Coord;

use super::ModeSet;

/// One walkway polyline with the travel modes allowed on it
#[derive(Debug, Clone, PartialEq)]
pub struct WalkwayLine {
    /// Lon/lat vertices in drawing order
    pub coords: Vec<Coord<f64>>,
    pub modes: ModeSet,
}

impl WalkwayLine {
    pub fn new(coords: Vec<Coord<f64>>, modes: ModeSet) -> Self {
        Self { coords, modes }
    }

    /// Line with modes parsed from a tag such as `"walk,bike"`.
    pub fn with_tag(coords: Vec<Coord<f64>>, tag: Option<&str>) -> Self {
        Self::new(coords, ModeSet::from_tag(tag))
    }

    /// Lines with fewer than two vertices contribute no segments.
    pub fn is_routable(&self) -> bool {
        self.coords.len() >= 2
    }
}

/// Set of walkway lines for a venue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkwayNetwork {
    lines: Vec<WalkwayLine>,
}

impl WalkwayNetwork {
    pub fn new(lines: Vec<WalkwayLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[WalkwayLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of segments ingestion will produce.
    pub fn segment_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.coords.len().saturating_sub(1))
            .sum()
    }

    /// First vertex encountered, used to anchor the local plane.
    pub fn anchor(&self) -> Option<Coord<f64>> {
        self.lines.iter().find_map(|line| line.coords.first().copied())
    }

    pub fn push(&mut self, line: WalkwayLine) {
        self.lines.push(line);
    }
}

impl FromIterator<WalkwayLine> for WalkwayNetwork {
    fn from_iter<I: IntoIterator<Item = WalkwayLine>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Segment identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Identifier of a link segment.
///
/// Bus-drop segments inserted by the path optimizer carry no name. They are
/// represented as [`SegmentId::Synthetic`] and are never listed by ID queries
/// nor matched by lookups. In JSON a synthetic ID is written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum SegmentId {
    Named(String),
    Synthetic,
}

impl SegmentId {
    pub fn named(id: impl Into<String>) -> Self {
        SegmentId::Named(id.into())
    }

    /// The name, or `None` for a bus-drop segment.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            SegmentId::Named(id) => Some(id.as_str()),
            SegmentId::Synthetic => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, SegmentId::Synthetic)
    }
}

impl From<Option<String>> for SegmentId {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(id) => SegmentId::Named(id),
            None => SegmentId::Synthetic,
        }
    }
}

impl From<SegmentId> for Option<String> {
    fn from(value: SegmentId) -> Self {
        match value {
            SegmentId::Named(id) => Some(id),
            SegmentId::Synthetic => None,
        }
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentId::Named(id) => f.write_str(id),
            SegmentId::Synthetic => f.write_str("<bus-drop>"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Segment
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// One routed segment of a link bus.
///
/// `parent` is the stored back-reference to the parent segment's name; `None`
/// marks the root of the bus. The optional endpoints are carried through for
/// the optimizer and are not interpreted by the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
}

impl Segment {
    /// A named segment below `parent` (or a root when `parent` is `None`).
    pub fn named(id: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: SegmentId::named(id),
            parent: parent.map(str::to_string),
            start: None,
            end: None,
        }
    }

    /// An unnamed bus-drop segment below `parent`.
    pub fn bus_drop(parent: Option<&str>) -> Self {
        Self {
            id: SegmentId::Synthetic,
            parent: parent.map(str::to_string),
            start: None,
            end: None,
        }
    }

    pub fn with_points(mut self, start: Point, end: Point) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Documents
// ────────────────────────────────────────────────────────────────────────────

/// All segments of the bus leaving one source node, in record order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkBus {
    pub source: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Top-level JSON document holding any number of buses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusDocument {
    #[serde(default)]
    pub buses: Vec<LinkBus>,
}

impl BusDocument {
    pub fn find_bus(&self, source: &str) -> Option<&LinkBus> {
        self.buses.iter().find(|b| b.source == source)
    }
}

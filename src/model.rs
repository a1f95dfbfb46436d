//! Data model shared with the enclosing configurator.
//!
//! The host application owns these values; the editor receives them as an
//! immutable [`Scene`] snapshot on every update and never mutates component
//! positions or rotations itself. Changes travel back out as
//! [`crate::engine::Action`] intents.
//!
//! Field names serialize in `camelCase` so the snapshot can be handed over as
//! the same JSON the host store already keeps.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};

use crate::input::Mode;

/// Identifier of a placed component.
pub type ComponentId = String;

/// Identifier of a connection between two ports.
pub type ConnectionId = String;

/// A 3-component vector; serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Catalog category of a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Track,
    Spotlight,
    Connector,
    PowerSupply,
    /// Component instantiated from a catalog bundle.
    #[serde(rename = "bundle-derived", alias = "bundle")]
    Bundle,
    /// Any type this editor does not know; drawn with the default box and no ports.
    #[serde(other)]
    Other,
}

impl ComponentType {
    /// The known types; [`ComponentType::Other`] is excluded.
    pub const ALL: [ComponentType; 5] =
        [Self::Track, Self::Spotlight, Self::Connector, Self::PowerSupply, Self::Bundle];

    /// Stable lowercase name, used for sprite file names and labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Spotlight => "spotlight",
            Self::Connector => "connector",
            Self::PowerSupply => "power-supply",
            Self::Bundle => "bundle-derived",
            Self::Other => "other",
        }
    }
}

/// One placed instance of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedComponent {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Position in meters; `y` is vertical and `(x, z)` is the floor plane.
    pub position: Vec3,
    /// Rotation in radians; the editor only changes the yaw (`y`).
    pub rotation: Vec3,
    #[serde(default)]
    pub connections: Vec<ConnectionId>,
    /// Optional display label drawn under the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Direction of a connection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Input,
    Output,
    Bidirectional,
}

impl PortKind {
    /// Whether a port of this kind may be linked to a port of kind `other`.
    ///
    /// Bidirectional ports accept anything; otherwise one side must feed the other.
    #[must_use]
    pub fn accepts(self, other: PortKind) -> bool {
        match (self, other) {
            (Self::Bidirectional, _) | (_, Self::Bidirectional) => true,
            (Self::Input, Self::Output) | (Self::Output, Self::Input) => true,
            (Self::Input, Self::Input) | (Self::Output, Self::Output) => false,
        }
    }
}

/// A named anchor on a component type, at a fixed local offset in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoint {
    pub id: &'static str,
    pub offset: Vec3,
    pub kind: PortKind,
}

const fn port(id: &'static str, x: f64, z: f64, kind: PortKind) -> ConnectionPoint {
    ConnectionPoint { id, offset: Vec3::new(x, 0.0, z), kind }
}

const TRACK_PORTS: [ConnectionPoint; 5] = [
    port("left", -1.0, 0.0, PortKind::Bidirectional),
    port("right", 1.0, 0.0, PortKind::Bidirectional),
    port("top1", -0.5, -0.6, PortKind::Output),
    port("top2", 0.0, -0.6, PortKind::Output),
    port("top3", 0.5, -0.6, PortKind::Output),
];

const SPOTLIGHT_PORTS: [ConnectionPoint; 1] = [port("mount", 0.0, -0.6, PortKind::Input)];

const CONNECTOR_PORTS: [ConnectionPoint; 3] = [
    port("a", -0.5, 0.0, PortKind::Bidirectional),
    port("b", 0.5, 0.0, PortKind::Bidirectional),
    port("c", 0.0, 0.5, PortKind::Bidirectional),
];

const POWER_SUPPLY_PORTS: [ConnectionPoint; 1] = [port("output", 0.5, 0.0, PortKind::Output)];

const BUNDLE_PORTS: [ConnectionPoint; 2] = [
    port("in", -0.5, 0.0, PortKind::Input),
    port("out", 0.5, 0.0, PortKind::Output),
];

/// The connection points of a component type. Derived, never stored.
#[must_use]
pub fn connection_points(kind: ComponentType) -> &'static [ConnectionPoint] {
    match kind {
        ComponentType::Track => &TRACK_PORTS,
        ComponentType::Spotlight => &SPOTLIGHT_PORTS,
        ComponentType::Connector => &CONNECTOR_PORTS,
        ComponentType::PowerSupply => &POWER_SUPPLY_PORTS,
        ComponentType::Bundle => &BUNDLE_PORTS,
        ComponentType::Other => &[],
    }
}

/// Look up a single connection point by id.
#[must_use]
pub fn connection_point(kind: ComponentType, point_id: &str) -> Option<&'static ConnectionPoint> {
    connection_points(kind).iter().find(|p| p.id == point_id)
}

/// One end of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub component_id: ComponentId,
    pub point_id: String,
}

impl PortRef {
    #[must_use]
    pub fn new(component_id: impl Into<ComponentId>, point_id: impl Into<String>) -> Self {
        Self { component_id: component_id.into(), point_id: point_id.into() }
    }
}

/// A directed edge between two ports on different components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source: PortRef,
    pub target: PortRef,
}

/// Room extents in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self { width: 5.0, length: 4.0, height: 2.5 }
    }
}

fn default_grid_size() -> f64 {
    0.5
}

/// Immutable snapshot of everything the editor reads from the host store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Components in z-order; the last entry is drawn on top.
    #[serde(default)]
    pub components: Vec<PlacedComponent>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub selected_ids: Vec<ComponentId>,
    #[serde(default)]
    pub primary_selected_id: Option<ComponentId>,
    #[serde(default, rename = "roomDimensions")]
    pub room: RoomDimensions,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub snap_to_grid: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            connections: Vec::new(),
            selected_ids: Vec::new(),
            primary_selected_id: None,
            room: RoomDimensions::default(),
            mode: Mode::default(),
            snap_to_grid: false,
            grid_size: default_grid_size(),
        }
    }
}

impl Scene {
    /// Look up a component by id.
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Whether `id` is part of the current selection.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    /// Components in top-to-bottom order (topmost first).
    pub fn topmost_first(&self) -> impl Iterator<Item = &PlacedComponent> {
        self.components.iter().rev()
    }
}

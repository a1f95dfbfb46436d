//! Hit-testing: resolve a canvas position to a component body or connection point.
//!
//! All tests run in canvas space. Component bodies use a fixed per-type pixel
//! box (not scaled by zoom) rotated with the component's yaw; connection
//! points use their metric offsets scaled by the viewport.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Viewport};
use crate::consts::{
    CONNECTOR_BOX_PX, DEFAULT_BOX_PX, HIT_PADDING_PX, PORT_HIT_RADIUS_PX, POWER_SUPPLY_BOX_PX, SPOTLIGHT_BOX_PX,
    TRACK_BOX_PX,
};
use crate::input::SelectionRect;
use crate::model::{ComponentId, ComponentType, ConnectionPoint, PlacedComponent, Scene, connection_points};

/// What a canvas position resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// A connection point on a component.
    Port { component_id: ComponentId, point_id: &'static str },
    /// The body of a component.
    Body { component_id: ComponentId },
}

/// Unpadded drawing box of a component type, `(width, height)` in pixels.
#[must_use]
pub fn bounding_box(kind: ComponentType) -> (f64, f64) {
    match kind {
        ComponentType::Track => TRACK_BOX_PX,
        ComponentType::Spotlight => SPOTLIGHT_BOX_PX,
        ComponentType::Connector => CONNECTOR_BOX_PX,
        ComponentType::PowerSupply => POWER_SUPPLY_BOX_PX,
        ComponentType::Bundle | ComponentType::Other => DEFAULT_BOX_PX,
    }
}

/// Canvas-space center of a component.
#[must_use]
pub fn component_center(component: &PlacedComponent, viewport: &Viewport) -> Point {
    viewport.world_to_canvas(component.position.x, component.position.z)
}

/// Rotate a vector by `angle` radians (clockwise on a y-down canvas).
#[must_use]
pub fn rotate(v: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Whether `pt` lands inside the padded, rotated box of `component`.
#[must_use]
pub fn hit_body(pt: Point, component: &PlacedComponent, viewport: &Viewport) -> bool {
    let center = component_center(component, viewport);
    let local = rotate(Point::new(pt.x - center.x, pt.y - center.y), -component.rotation.y);
    let (w, h) = bounding_box(component.kind);
    local.x.abs() <= w * 0.5 + HIT_PADDING_PX && local.y.abs() <= h * 0.5 + HIT_PADDING_PX
}

/// The topmost component whose body contains `pt`.
#[must_use]
pub fn hit_component<'a>(pt: Point, scene: &'a Scene, viewport: &Viewport) -> Option<&'a PlacedComponent> {
    scene.topmost_first().find(|c| hit_body(pt, c, viewport))
}

/// Canvas position of one connection point of `component`.
#[must_use]
pub fn port_canvas_position(component: &PlacedComponent, port: &ConnectionPoint, viewport: &Viewport) -> Point {
    let center = component_center(component, viewport);
    let offset = rotate(Point::new(port.offset.x, port.offset.z), component.rotation.y);
    Point::new(
        offset.x.mul_add(viewport.scale, center.x),
        offset.y.mul_add(viewport.scale, center.y),
    )
}

/// The first connection point within [`PORT_HIT_RADIUS_PX`] of `pt`, topmost component first.
#[must_use]
pub fn hit_connection_point(pt: Point, scene: &Scene, viewport: &Viewport) -> Option<Hit> {
    scene.topmost_first().find_map(|component| {
        connection_points(component.kind)
            .iter()
            .find(|port| port_canvas_position(component, port, viewport).distance_to(pt) <= PORT_HIT_RADIUS_PX)
            .map(|port| Hit::Port { component_id: component.id.clone(), point_id: port.id })
    })
}

/// Resolve `pt`, preferring connection points over component bodies.
#[must_use]
pub fn hit_test(pt: Point, scene: &Scene, viewport: &Viewport) -> Option<Hit> {
    hit_connection_point(pt, scene, viewport).or_else(|| {
        hit_component(pt, scene, viewport).map(|c| Hit::Body { component_id: c.id.clone() })
    })
}

/// Ids of components whose canvas center lies inside `rect`, in z-order.
#[must_use]
pub fn components_in_rect(rect: &SelectionRect, scene: &Scene, viewport: &Viewport) -> Vec<ComponentId> {
    scene
        .components
        .iter()
        .filter(|c| rect.contains(component_center(c, viewport)))
        .map(|c| c.id.clone())
        .collect()
}

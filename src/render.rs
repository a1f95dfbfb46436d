//! Rendering: draws the full editor scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of the engine and produces pixels; it does not
//! mutate any state.
//!
//! Every frame clears and redraws everything in the order given by
//! [`layer_plan`]. Overlays (selection box, measurements) come before the
//! components, and the room boundary is last so its labels stay legible.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{FRAC_PI_2, PI};

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::camera::{Point, Viewport};
use crate::consts::HIT_PADDING_PX;
use crate::engine::EngineCore;
use crate::hit::{self, Hit};
use crate::input::SelectionRect;
use crate::model::{ComponentType, PlacedComponent, PortKind, RoomDimensions, connection_points};
use crate::sprites::SpriteCache;

/// Dash segment length for overlays, in pixels.
const DASH_PX: f64 = 4.0;

/// Grid lines closer than this many pixels are skipped.
const MIN_GRID_SPACING_PX: f64 = 4.0;

/// Bezier bow as a fraction of the connection length.
const CURVE_BOW: f64 = 0.2;

/// Radius of connection-point markers.
const PORT_MARKER_RADIUS_PX: f64 = 5.0;

const SELECTION_COLOR: &str = "#1E90FF";
const PRIMARY_COLOR: &str = "#FF8C00";
const HOVER_COLOR: &str = "rgba(30, 144, 255, 0.45)";
const CONNECTION_COLOR: &str = "#F59E0B";
const MEASURE_COLOR: &str = "#D9304B";
const ROOM_COLOR: &str = "#1F1A17";

/// One pass of the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Grid,
    Axes,
    SelectionBox,
    Measurements,
    MeasurementPreview,
    Connections,
    Components,
    Room,
}

/// The layers to draw for the current state, bottom first.
#[must_use]
pub fn layer_plan(core: &EngineCore) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(8);
    if core.scene.snap_to_grid && core.scene.grid_size > 0.0 {
        layers.push(Layer::Grid);
    }
    layers.push(Layer::Axes);
    if core.state.selection_rect().is_some() {
        layers.push(Layer::SelectionBox);
    }
    if !core.measurements.is_empty() {
        layers.push(Layer::Measurements);
    }
    if core.state.pending_measurement().is_some() && core.pointer.is_some() {
        layers.push(Layer::MeasurementPreview);
    }
    if !core.scene.connections.is_empty() || core.state.pending_connection().is_some() {
        layers.push(Layer::Connections);
    }
    if !core.scene.components.is_empty() {
        layers.push(Layer::Components);
    }
    layers.push(Layer::Room);
    layers
}

/// Start, control and end points of the curve linking two component centers.
///
/// The control point sits off the midpoint, perpendicular to the chord, so
/// parallel connections stay distinguishable.
#[must_use]
pub fn connection_curve(a: Point, b: Point) -> (Point, Point, Point) {
    let mid = Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        return (a, mid, b);
    }
    let bow = len * CURVE_BOW;
    let control = Point::new(mid.x + dy / len * bow, mid.y - dx / len * bow);
    (a, control, b)
}

/// Pixel positions of vertical (`xs`) and horizontal (`ys`) grid lines covering the canvas.
///
/// Lines are aligned to world multiples of `grid_size`. Returns empty lists
/// when the grid would be too dense to read.
#[must_use]
pub fn grid_lines(viewport: &Viewport, grid_size: f64) -> (Vec<f64>, Vec<f64>) {
    let spacing = grid_size * viewport.scale;
    if grid_size <= 0.0 || spacing < MIN_GRID_SPACING_PX {
        return (Vec::new(), Vec::new());
    }
    let origin = viewport.origin();
    let axis = |origin: f64, extent: f64| {
        let first = -(origin / spacing).floor();
        let mut lines = Vec::new();
        let mut i = first;
        loop {
            let p = i.mul_add(spacing, origin);
            if p > extent {
                break;
            }
            if p >= 0.0 {
                lines.push(p);
            }
            i += 1.0;
        }
        lines
    };
    (axis(origin.x, viewport.width), axis(origin.y, viewport.height))
}

/// Canvas rectangle of the room floor, centered on the world origin.
#[must_use]
pub fn room_rect(room: &RoomDimensions, viewport: &Viewport) -> SelectionRect {
    let top_left = viewport.world_to_canvas(-room.width * 0.5, -room.length * 0.5);
    let bottom_right = viewport.world_to_canvas(room.width * 0.5, room.length * 0.5);
    SelectionRect::from_corners(top_left, bottom_right)
}

/// Fallback fill color per component type.
#[must_use]
pub fn fallback_color(kind: ComponentType) -> &'static str {
    match kind {
        ComponentType::Track => "#6B7280",
        ComponentType::Spotlight => "#FACC15",
        ComponentType::Connector => "#10B981",
        ComponentType::PowerSupply => "#8B5CF6",
        ComponentType::Bundle => "#94A3B8",
        ComponentType::Other => "#CBD5E1",
    }
}

fn port_color(kind: PortKind) -> &'static str {
    match kind {
        PortKind::Input => "#22C55E",
        PortKind::Output => "#F97316",
        PortKind::Bidirectional => "#3B82F6",
    }
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    sprites: &SpriteCache<HtmlImageElement>,
) -> Result<(), JsValue> {
    let vp = &core.viewport;
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, vp.width, vp.height);

    for layer in layer_plan(core) {
        match layer {
            Layer::Grid => draw_grid(ctx, vp, core.scene.grid_size),
            Layer::Axes => draw_axes(ctx, vp),
            Layer::SelectionBox => draw_selection_box(ctx, core)?,
            Layer::Measurements => draw_measurements(ctx, core)?,
            Layer::MeasurementPreview => draw_measurement_preview(ctx, core)?,
            Layer::Connections => draw_connections(ctx, core)?,
            Layer::Components => draw_components(ctx, core, sprites)?,
            Layer::Room => draw_room(ctx, core)?,
        }
    }
    Ok(())
}

// =============================================================
// Background
// =============================================================

fn draw_grid(ctx: &CanvasRenderingContext2d, vp: &Viewport, grid_size: f64) {
    let (xs, ys) = grid_lines(vp, grid_size);
    ctx.save();
    ctx.set_stroke_style_str("rgba(31, 26, 23, 0.08)");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for x in xs {
        ctx.move_to(x, 0.0);
        ctx.line_to(x, vp.height);
    }
    for y in ys {
        ctx.move_to(0.0, y);
        ctx.line_to(vp.width, y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_axes(ctx: &CanvasRenderingContext2d, vp: &Viewport) {
    let origin = vp.origin();
    ctx.save();
    ctx.set_line_width(1.0);

    ctx.set_stroke_style_str("rgba(217, 48, 75, 0.5)");
    ctx.begin_path();
    ctx.move_to(0.0, origin.y);
    ctx.line_to(vp.width, origin.y);
    ctx.stroke();

    ctx.set_stroke_style_str("rgba(30, 144, 255, 0.5)");
    ctx.begin_path();
    ctx.move_to(origin.x, 0.0);
    ctx.line_to(origin.x, vp.height);
    ctx.stroke();

    ctx.restore();
}

// =============================================================
// Overlays
// =============================================================

fn draw_selection_box(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let Some(rect) = core.state.selection_rect() else {
        return Ok(());
    };
    ctx.save();
    set_dash(ctx, DASH_PX)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    clear_dash(ctx)?;
    ctx.restore();
    Ok(())
}

fn draw_measurements(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(MEASURE_COLOR);
    ctx.set_fill_style_str(MEASURE_COLOR);
    ctx.set_line_width(2.0);
    for (idx, m) in core.measurements.iter().enumerate() {
        ctx.begin_path();
        ctx.move_to(m.start.x, m.start.y);
        ctx.line_to(m.end.x, m.end.y);
        ctx.stroke();
        for end in [m.start, m.end] {
            ctx.begin_path();
            ctx.arc(end.x, end.y, 3.0, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        draw_label(ctx, &format!("#{} {}", idx + 1, m.label()), m.midpoint(), MEASURE_COLOR)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_measurement_preview(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let (Some(first), Some(pointer)) = (core.state.pending_measurement(), core.pointer) else {
        return Ok(());
    };
    ctx.save();
    set_dash(ctx, DASH_PX)?;
    ctx.set_stroke_style_str(MEASURE_COLOR);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    ctx.line_to(pointer.x, pointer.y);
    ctx.stroke();
    clear_dash(ctx)?;

    let meters = core.viewport.canvas_dist_to_world(first.distance_to(pointer));
    let mid = Point::new((first.x + pointer.x) * 0.5, (first.y + pointer.y) * 0.5);
    draw_label(ctx, &format!("{meters:.2} m"), mid, MEASURE_COLOR)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Connections
// =============================================================

fn draw_connections(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let vp = &core.viewport;
    ctx.save();
    ctx.set_stroke_style_str(CONNECTION_COLOR);
    ctx.set_line_width(2.0);
    for conn in &core.scene.connections {
        let (Some(source), Some(target)) = (
            core.scene.component(&conn.source.component_id),
            core.scene.component(&conn.target.component_id),
        ) else {
            continue;
        };
        let (a, control, b) =
            connection_curve(hit::component_center(source, vp), hit::component_center(target, vp));
        ctx.begin_path();
        ctx.move_to(a.x, a.y);
        ctx.quadratic_curve_to(control.x, control.y, b.x, b.y);
        ctx.stroke();
    }

    // Rubber band from the pending source port to the pointer.
    if let (Some((component_id, point_id)), Some(pointer)) = (core.state.pending_connection(), core.pointer) {
        if let Some(from) = core.scene.component(component_id) {
            if let Some(port) = connection_points(from.kind).iter().find(|p| p.id == point_id) {
                let start = hit::port_canvas_position(from, port, vp);
                set_dash(ctx, DASH_PX)?;
                ctx.begin_path();
                ctx.move_to(start.x, start.y);
                ctx.line_to(pointer.x, pointer.y);
                ctx.stroke();
                clear_dash(ctx)?;
            }
        }
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Components
// =============================================================

fn draw_components(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    sprites: &SpriteCache<HtmlImageElement>,
) -> Result<(), JsValue> {
    let hovered = core.hover.as_ref().map(|h| match h {
        Hit::Port { component_id, .. } | Hit::Body { component_id } => component_id.as_str(),
    });
    for component in &core.scene.components {
        let selected = core.scene.is_selected(&component.id);
        let primary = core.scene.primary_selected_id.as_deref() == Some(component.id.as_str());
        let hover = hovered == Some(component.id.as_str());
        draw_component(ctx, core, component, sprites.get(component.kind), selected, primary, hover)?;
    }
    Ok(())
}

#[allow(clippy::fn_params_excessive_bools)]
fn draw_component(
    ctx: &CanvasRenderingContext2d,
    core: &EngineCore,
    component: &PlacedComponent,
    sprite: Option<&HtmlImageElement>,
    selected: bool,
    primary: bool,
    hover: bool,
) -> Result<(), JsValue> {
    let vp = &core.viewport;
    let center = hit::component_center(component, vp);
    let (w, h) = hit::bounding_box(component.kind);

    ctx.save();
    ctx.translate(center.x, center.y)?;
    ctx.rotate(component.rotation.y)?;

    if let Some(image) = sprite {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(image, -w / 2.0, -h / 2.0, w, h)?;
    } else {
        ctx.set_fill_style_str(fallback_color(component.kind));
        ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
        ctx.set_stroke_style_str(ROOM_COLOR);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(-w / 2.0, -h / 2.0, w, h);
    }

    // Highlight rings sit halfway into the hit padding.
    let ring = HIT_PADDING_PX * 0.5;
    if selected {
        ctx.set_stroke_style_str(if primary { PRIMARY_COLOR } else { SELECTION_COLOR });
        ctx.set_line_width(2.0);
        ctx.stroke_rect(-w / 2.0 - ring, -h / 2.0 - ring, w + ring * 2.0, h + ring * 2.0);
    } else if hover {
        ctx.set_stroke_style_str(HOVER_COLOR);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(-w / 2.0 - ring, -h / 2.0 - ring, w + ring * 2.0, h + ring * 2.0);
    }
    ctx.restore();

    if core.config.show_labels {
        if let Some(name) = component.name.as_deref().filter(|n| !n.is_empty()) {
            let below = Point::new(center.x, center.y + h.max(w) * 0.5 + HIT_PADDING_PX);
            draw_label(ctx, name, below, ROOM_COLOR)?;
        }
    }

    if selected {
        draw_ports(ctx, core, component)?;
    }
    Ok(())
}

fn draw_ports(ctx: &CanvasRenderingContext2d, core: &EngineCore, component: &PlacedComponent) -> Result<(), JsValue> {
    let pending = core.state.pending_connection();
    ctx.save();
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(1.5);
    for port in connection_points(component.kind) {
        let pos = hit::port_canvas_position(component, port, &core.viewport);
        let is_source = pending == Some((component.id.as_str(), port.id));
        let radius = if is_source { PORT_MARKER_RADIUS_PX * 1.6 } else { PORT_MARKER_RADIUS_PX };
        ctx.begin_path();
        ctx.arc(pos.x, pos.y, radius, 0.0, 2.0 * PI)?;
        ctx.set_fill_style_str(port_color(port.kind));
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Room
// =============================================================

fn draw_room(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let room = &core.scene.room;
    let rect = room_rect(room, &core.viewport);
    ctx.save();
    ctx.set_stroke_style_str(ROOM_COLOR);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);

    ctx.set_fill_style_str(ROOM_COLOR);
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("bottom");
    ctx.fill_text(&format!("{:.2} m", room.width), rect.x + rect.width * 0.5, rect.y - 6.0)?;

    ctx.save();
    ctx.translate(rect.x - 6.0, rect.y + rect.height * 0.5)?;
    ctx.rotate(-FRAC_PI_2)?;
    ctx.fill_text(&format!("{:.2} m", room.length), 0.0, 0.0)?;
    ctx.restore();

    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Centered text on a translucent backing so it reads over lines.
fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, at: Point, color: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let width = ctx.measure_text(text)?.width();
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
    ctx.fill_rect(at.x - width * 0.5 - 3.0, at.y - 8.0, width + 6.0, 16.0);
    ctx.set_fill_style_str(color);
    ctx.fill_text(text, at.x, at.y)?;
    ctx.restore();
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash.into());
    dash_array.push(&dash.into());
    ctx.set_line_dash(&dash_array)
}

fn clear_dash(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_line_dash(&js_sys::Array::new())
}

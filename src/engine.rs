//! The editor engine: pointer/keyboard events in, intents out.
//!
//! [`EngineCore`] holds everything that does not touch the browser so it can
//! be driven by synthetic event sequences in tests. [`Engine`] wraps it with
//! the canvas element, the 2D context and the sprite cache.
//!
//! The core never edits the scene it was handed. Every change the user makes
//! leaves as an [`Action`]; the host store applies the intents it accepts and
//! feeds the resulting snapshot back through [`EngineCore::set_scene`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

use crate::camera::{Point, Viewport};
use crate::config::EditorConfig;
use crate::connect::{self, Handshake};
use crate::consts::{DRAG_THRESHOLD_PX, MIN_BOX_SELECT_PX, NUDGE_STEP_M};
use crate::error::EditorError;
use crate::hit::{self, Hit};
use crate::input::{Button, InteractionState, Key, Mode, Modifiers, WheelDelta};
use crate::measure::{Measurement, MeasurementList};
use crate::model::{ComponentId, ComponentType, Connection, PortRef, Scene, Vec3};
use crate::render;
use crate::sprites::{self, SpriteCache};

/// Sparse component update carried by [`Action::UpdateComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComponentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
}

/// Actions returned from event handlers for the host to process.
///
/// The first six variants are intents for the configuration store and
/// serialize as `{"type": "ADD_CONNECTION", ...}`. The rest are host-side
/// housekeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum Action {
    AddConnection { connection: Connection },
    UpdateComponent { component_id: ComponentId, updates: ComponentUpdate },
    SetSelectedComponent { component_id: ComponentId },
    ToggleComponentSelection { component_id: ComponentId },
    SetSelectedComponents { component_ids: Vec<ComponentId> },
    ClearSelection,
    SetCursor { cursor: String },
    ViewportChanged { viewport: Viewport },
    MeasurementsChanged,
    /// A drag-style gesture started; route pointer move/up from the whole window.
    CapturePointer,
    /// The gesture ended; drop the window-level listeners.
    ReleasePointer,
    RenderNeeded,
}

impl Action {
    /// Whether this action is meant for the configuration store.
    #[must_use]
    pub fn is_intent(&self) -> bool {
        matches!(
            self,
            Self::AddConnection { .. }
                | Self::UpdateComponent { .. }
                | Self::SetSelectedComponent { .. }
                | Self::ToggleComponentSelection { .. }
                | Self::SetSelectedComponents { .. }
                | Self::ClearSelection
        )
    }

    fn cursor(cursor: &str) -> Self {
        Self::SetCursor { cursor: cursor.to_owned() }
    }
}

/// Round `value` to the nearest multiple of `step`. Non-positive steps disable snapping.
#[must_use]
pub fn snap(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Core engine state: all logic that doesn't depend on the canvas element.
pub struct EngineCore {
    pub scene: Scene,
    pub viewport: Viewport,
    pub state: InteractionState,
    pub measurements: MeasurementList,
    pub config: EditorConfig,
    /// What the pointer currently rests on while idle.
    pub hover: Option<Hit>,
    /// Last known pointer position, for live previews.
    pub pointer: Option<Point>,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let mut viewport = Viewport::default();
        viewport.reset(config.initial_scale);
        Self {
            scene: Scene::default(),
            viewport,
            state: InteractionState::Idle,
            measurements: MeasurementList::new(),
            config,
            hover: None,
            pointer: None,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Replace the scene with the store's latest snapshot.
    pub fn set_scene(&mut self, scene: Scene) -> Vec<Action> {
        let previous_mode = self.scene.mode;
        self.scene = scene;
        let mut actions = self.apply_mode_change(previous_mode, self.scene.mode);
        actions.extend(self.drop_stale_references());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Parse and apply a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidScene`] if the JSON does not describe a scene.
    pub fn set_scene_json(&mut self, raw: &str) -> Result<Vec<Action>, EditorError> {
        let scene = serde_json::from_str(raw).map_err(EditorError::InvalidScene)?;
        Ok(self.set_scene(scene))
    }

    /// Switch the editor mode ahead of the next snapshot.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        let previous = self.scene.mode;
        self.scene.mode = mode;
        let mut actions = self.apply_mode_change(previous, mode);
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Update canvas CSS dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) {
        self.viewport.resize(width, height);
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Measurements ---

    /// Remove one measurement by id.
    pub fn remove_measurement(&mut self, id: &str) -> Vec<Action> {
        if self.measurements.remove(id) {
            vec![Action::MeasurementsChanged, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Remove every measurement.
    pub fn clear_measurements(&mut self) -> Vec<Action> {
        if self.measurements.clear() {
            vec![Action::MeasurementsChanged, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Queries ---

    /// Component types present in the scene, each once.
    #[must_use]
    pub fn component_types(&self) -> Vec<ComponentType> {
        let mut kinds: Vec<ComponentType> = Vec::new();
        for c in &self.scene.components {
            if !kinds.contains(&c.kind) {
                kinds.push(c.kind);
            }
        }
        kinds
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.pointer = Some(pt);
        match button {
            Button::Secondary => return Vec::new(),
            Button::Middle => return self.begin_pan(pt),
            Button::Primary if modifiers.alt => return self.begin_pan(pt),
            Button::Primary => {}
        }

        if self.scene.mode == Mode::Measure {
            return self.measure_click(pt);
        }
        if let Some(Hit::Port { component_id, point_id }) = hit::hit_connection_point(pt, &self.scene, &self.viewport)
        {
            return self.port_click(component_id, point_id);
        }
        if let Some(id) = hit::hit_component(pt, &self.scene, &self.viewport).map(|c| c.id.clone()) {
            return self.component_click(pt, id, modifiers);
        }
        self.begin_box_select(pt, modifiers)
    }

    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        self.pointer = Some(pt);
        let previewing = self.state.pending_measurement().is_some() || self.state.pending_connection().is_some();
        match &mut self.state {
            InteractionState::Panning { last } => {
                self.viewport.pan_by(pt.x - last.x, pt.y - last.y);
                *last = pt;
                vec![Action::ViewportChanged { viewport: self.viewport }, Action::RenderNeeded]
            }
            InteractionState::Dragging { start, start_positions, has_moved } => {
                if start.distance_to(pt) > DRAG_THRESHOLD_PX {
                    *has_moved = true;
                }
                let dx = self.viewport.canvas_dist_to_world(pt.x - start.x);
                let dz = self.viewport.canvas_dist_to_world(pt.y - start.y);
                let grid = self.scene.snap_to_grid.then_some(self.scene.grid_size);
                let mut actions: Vec<Action> = self
                    .scene
                    .components
                    .iter()
                    .filter_map(|c| {
                        let origin = start_positions.get(&c.id)?;
                        let mut position = Vec3::new(origin.x + dx, origin.y, origin.z + dz);
                        if let Some(step) = grid {
                            position.x = snap(position.x, step);
                            position.z = snap(position.z, step);
                        }
                        Some(Action::UpdateComponent {
                            component_id: c.id.clone(),
                            updates: ComponentUpdate { position: Some(position), rotation: None },
                        })
                    })
                    .collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            InteractionState::Rotating { target_id } => {
                let Some(target) = self.scene.component(target_id) else {
                    return Vec::new();
                };
                let center = hit::component_center(target, &self.viewport);
                let yaw = (pt.y - center.y).atan2(pt.x - center.x);
                let rotation = Vec3::new(target.rotation.x, yaw, target.rotation.z);
                vec![
                    Action::UpdateComponent {
                        component_id: target.id.clone(),
                        updates: ComponentUpdate { position: None, rotation: Some(rotation) },
                    },
                    Action::RenderNeeded,
                ]
            }
            InteractionState::BoxSelecting { start, current, has_moved } => {
                *current = pt;
                if start.distance_to(pt) > DRAG_THRESHOLD_PX {
                    *has_moved = true;
                }
                vec![Action::RenderNeeded]
            }
            InteractionState::Idle | InteractionState::Connecting { .. } | InteractionState::Measuring { .. } => {
                let hover = hit::hit_test(pt, &self.scene, &self.viewport);
                let hover_changed = hover != self.hover;
                self.hover = hover;
                if previewing || hover_changed { vec![Action::RenderNeeded] } else { Vec::new() }
            }
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.pointer = Some(pt);
        self.finish_gesture()
    }

    /// Pointer left the canvas; ends any gesture exactly like pointer-up.
    pub fn on_pointer_leave(&mut self, pt: Point) -> Vec<Action> {
        self.pointer = Some(pt);
        let mut actions = self.finish_gesture();
        if self.hover.take().is_some() && !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn on_wheel(&mut self, pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let notches = if delta.dy < 0.0 {
            1
        } else if delta.dy > 0.0 {
            -1
        } else {
            return Vec::new();
        };
        if self.viewport.zoom_at(pt, notches) {
            vec![Action::ViewportChanged { viewport: self.viewport }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => self.cancel_pending(),
            "Home" => {
                self.viewport.reset(self.config.initial_scale);
                vec![Action::ViewportChanged { viewport: self.viewport }, Action::RenderNeeded]
            }
            "ArrowLeft" => self.nudge_selection(-1.0, 0.0),
            "ArrowRight" => self.nudge_selection(1.0, 0.0),
            "ArrowUp" => self.nudge_selection(0.0, -1.0),
            "ArrowDown" => self.nudge_selection(0.0, 1.0),
            _ => Vec::new(),
        }
    }

    // --- Gesture starts ---

    fn begin_pan(&mut self, pt: Point) -> Vec<Action> {
        self.state = InteractionState::Panning { last: pt };
        vec![Action::CapturePointer, Action::cursor("grabbing")]
    }

    fn measure_click(&mut self, pt: Point) -> Vec<Action> {
        if let Some(first) = self.state.pending_measurement() {
            let measurement = Measurement::capture(first, pt, &self.viewport);
            log::debug!("measurement {} captured: {}", measurement.id, measurement.label());
            self.measurements.push(measurement);
            self.state = InteractionState::Measuring { first_point: None };
            return vec![Action::MeasurementsChanged, Action::RenderNeeded];
        }
        self.state = InteractionState::Measuring { first_point: Some(pt) };
        vec![Action::RenderNeeded]
    }

    fn port_click(&mut self, component_id: ComponentId, point_id: &str) -> Vec<Action> {
        let pending = self
            .state
            .pending_connection()
            .map(|(component, point)| PortRef::new(component, point));
        let clicked = PortRef::new(component_id, point_id);
        match connect::advance(pending, clicked, &self.scene, self.config.strict_ports) {
            Handshake::Started(source) => {
                log::debug!("connection started at {}.{}", source.component_id, source.point_id);
                self.state = InteractionState::Connecting {
                    from_component_id: source.component_id,
                    from_point_id: source.point_id,
                };
                vec![Action::cursor("crosshair"), Action::RenderNeeded]
            }
            Handshake::Completed(connection) => {
                log::debug!("connection {} completed", connection.id);
                self.state = InteractionState::Idle;
                vec![Action::AddConnection { connection }, Action::cursor("default"), Action::RenderNeeded]
            }
            Handshake::Cancelled => {
                self.state = InteractionState::Idle;
                vec![Action::cursor("default"), Action::RenderNeeded]
            }
        }
    }

    fn component_click(&mut self, pt: Point, id: ComponentId, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        let selection = if modifiers.toggles_selection() {
            actions.push(Action::ToggleComponentSelection { component_id: id.clone() });
            let mut next = self.scene.selected_ids.clone();
            if let Some(idx) = next.iter().position(|s| *s == id) {
                next.remove(idx);
            } else {
                next.push(id.clone());
            }
            next
        } else {
            actions.push(Action::SetSelectedComponent { component_id: id.clone() });
            vec![id.clone()]
        };

        if !selection.contains(&id) {
            self.state = InteractionState::Idle;
            actions.push(Action::RenderNeeded);
            return actions;
        }

        if modifiers.shift || self.scene.mode == Mode::Rotate {
            log::debug!("rotating {id}");
            self.state = InteractionState::Rotating { target_id: id };
        } else {
            let start_positions: HashMap<ComponentId, Vec3> = selection
                .iter()
                .filter_map(|sid| self.scene.component(sid).map(|c| (sid.clone(), c.position)))
                .collect();
            log::debug!("dragging {} component(s)", start_positions.len());
            self.state = InteractionState::Dragging { start: pt, start_positions, has_moved: false };
        }
        actions.extend([Action::CapturePointer, Action::cursor("grabbing"), Action::RenderNeeded]);
        actions
    }

    fn begin_box_select(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if !modifiers.toggles_selection() {
            actions.push(Action::ClearSelection);
        }
        self.state = InteractionState::BoxSelecting { start: pt, current: pt, has_moved: false };
        actions.extend([Action::CapturePointer, Action::RenderNeeded]);
        actions
    }

    // --- Gesture ends ---

    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.state) {
            InteractionState::Panning { .. } | InteractionState::Dragging { .. } | InteractionState::Rotating { .. } => {
                vec![Action::ReleasePointer, Action::cursor("default"), Action::RenderNeeded]
            }
            InteractionState::BoxSelecting { start, current, .. } => {
                let mut actions = Vec::new();
                let rect = crate::input::SelectionRect::from_corners(start, current);
                if rect.width >= MIN_BOX_SELECT_PX && rect.height >= MIN_BOX_SELECT_PX {
                    let component_ids = hit::components_in_rect(&rect, &self.scene, &self.viewport);
                    log::debug!("box selected {} component(s)", component_ids.len());
                    actions.push(Action::SetSelectedComponents { component_ids });
                }
                actions.extend([Action::ReleasePointer, Action::RenderNeeded]);
                actions
            }
            pending @ (InteractionState::Idle
            | InteractionState::Connecting { .. }
            | InteractionState::Measuring { .. }) => {
                self.state = pending;
                Vec::new()
            }
        }
    }

    fn cancel_pending(&mut self) -> Vec<Action> {
        let resting = if self.scene.mode == Mode::Measure {
            InteractionState::Measuring { first_point: None }
        } else {
            InteractionState::Idle
        };
        let pending = self.state.pending_connection().is_some() || self.state.pending_measurement().is_some();
        if !pending {
            return Vec::new();
        }
        self.state = resting;
        vec![Action::cursor("default"), Action::RenderNeeded]
    }

    fn nudge_selection(&self, sx: f64, sz: f64) -> Vec<Action> {
        if self.state.is_gesture() {
            return Vec::new();
        }
        let step = if self.scene.snap_to_grid && self.scene.grid_size > 0.0 {
            self.scene.grid_size
        } else {
            NUDGE_STEP_M
        };
        let grid = self.scene.snap_to_grid.then_some(self.scene.grid_size);
        let mut actions: Vec<Action> = self
            .scene
            .components
            .iter()
            .filter(|c| self.scene.is_selected(&c.id))
            .map(|c| {
                let mut position = Vec3::new(sx.mul_add(step, c.position.x), c.position.y, sz.mul_add(step, c.position.z));
                if let Some(g) = grid {
                    position.x = snap(position.x, g);
                    position.z = snap(position.z, g);
                }
                Action::UpdateComponent {
                    component_id: c.id.clone(),
                    updates: ComponentUpdate { position: Some(position), rotation: None },
                }
            })
            .collect();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Snapshot bookkeeping ---

    fn apply_mode_change(&mut self, previous: Mode, next: Mode) -> Vec<Action> {
        if previous == next {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.state.is_gesture() {
            actions.push(Action::ReleasePointer);
        }
        if next == Mode::Measure {
            self.state = InteractionState::Measuring { first_point: None };
            actions.push(Action::cursor("crosshair"));
        } else if previous == Mode::Measure || self.state.is_gesture() {
            self.state = InteractionState::Idle;
            actions.push(Action::cursor("default"));
        }
        log::debug!("mode {previous:?} -> {next:?}");
        actions
    }

    fn drop_stale_references(&mut self) -> Vec<Action> {
        if self.hover.as_ref().is_some_and(|h| self.scene.component(hit_component_id(h)).is_none()) {
            self.hover = None;
        }
        let stale = match &self.state {
            InteractionState::Connecting { from_component_id, .. } => self.scene.component(from_component_id).is_none(),
            InteractionState::Rotating { target_id } => self.scene.component(target_id).is_none(),
            _ => false,
        };
        if !stale {
            return Vec::new();
        }
        let was_gesture = self.state.is_gesture();
        self.state = InteractionState::Idle;
        if was_gesture {
            vec![Action::ReleasePointer, Action::cursor("default")]
        } else {
            vec![Action::cursor("default")]
        }
    }
}

fn hit_component_id(hit: &Hit) -> &str {
    match hit {
        Hit::Port { component_id, .. } | Hit::Body { component_id } => component_id,
    }
}

/// The full editor engine. Wraps `EngineCore` and owns the browser canvas.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
    sprites: Rc<RefCell<SpriteCache<HtmlImageElement>>>,
    on_sprite_ready: Option<Rc<dyn Fn()>>,
}

impl Engine {
    /// Bind a new engine to `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MissingContext`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, config: EditorConfig) -> Result<Self, EditorError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EditorError::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EditorError::MissingContext)?;
        Ok(Self {
            canvas,
            ctx,
            core: EngineCore::with_config(config),
            sprites: Rc::new(RefCell::new(SpriteCache::new())),
            on_sprite_ready: None,
        })
    }

    /// Called whenever a sprite finishes loading, so the host can redraw.
    pub fn set_on_sprite_ready(&mut self, callback: Rc<dyn Fn()>) {
        self.on_sprite_ready = Some(callback);
    }

    /// Resize the backing store and update the viewport.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((self.core.viewport.width * dpr).round() as u32);
        self.canvas.set_height((self.core.viewport.height * dpr).round() as u32);
    }

    /// Convert a DOM mouse/pointer event to a canvas-relative point.
    ///
    /// Works for events delivered to the window during pointer capture,
    /// where `offsetX` would be relative to some other element.
    #[must_use]
    pub fn event_point(&self, ev: &MouseEvent) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top())
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Canvas`] if a Canvas2D call fails.
    pub fn render(&self) -> Result<(), EditorError> {
        self.request_sprites();
        let sprites = self.sprites.borrow();
        render::draw(&self.ctx, &self.core, &sprites)?;
        Ok(())
    }

    /// Kick off loads for sprite types not yet requested.
    fn request_sprites(&self) {
        for kind in self.core.component_types() {
            if kind == ComponentType::Other || !self.sprites.borrow_mut().request(kind) {
                continue;
            }
            let url = self.core.config.sprite_url(kind.as_str());
            let cache: Weak<RefCell<SpriteCache<HtmlImageElement>>> = Rc::downgrade(&self.sprites);
            let notify = self.on_sprite_ready.clone();
            let started = sprites::start_load(&url, move |image| {
                let Some(cache) = cache.upgrade() else {
                    return;
                };
                match image {
                    Some(image) => cache.borrow_mut().resolve(kind, image),
                    None => {
                        log::warn!("sprite for {} failed to load; drawing fallback", kind.as_str());
                        cache.borrow_mut().fail(kind);
                    }
                }
                if let Some(notify) = notify {
                    notify();
                }
            });
            if let Err(err) = started {
                log::warn!("could not start sprite load for {}: {err}", kind.as_str());
                self.sprites.borrow_mut().fail(kind);
            }
        }
    }
}

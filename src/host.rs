//! Browser glue: wires DOM events into the engine and routes its actions.
//!
//! [`EditorHandle`] is what a host UI mounts on a `<canvas>`. It forwards
//! canvas events to [`EngineCore`](crate::engine::EngineCore), executes the
//! housekeeping actions itself (render, pointer capture) and hands everything
//! else to the host's dispatch callback.
//!
//! While a drag-style gesture is active, [`PointerCapture`] routes window-level
//! `pointermove` / `pointerup` to the engine so releasing outside the canvas
//! still ends the gesture. Listeners are removed when the capture is dropped,
//! which also happens when the handle itself is dropped on unmount.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent, WheelEvent, Window};

use crate::config::EditorConfig;
use crate::engine::{Action, Engine};
use crate::error::EditorError;
use crate::input::{Button, Key, Mode, Modifiers, WheelDelta};
use crate::measure::Measurement;
use crate::model::Scene;

type Listener = Closure<dyn FnMut(PointerEvent)>;

/// Window-level pointer listeners held for the duration of one gesture.
pub struct PointerCapture {
    window: Window,
    listeners: Vec<(&'static str, Listener)>,
}

impl PointerCapture {
    /// Listen for pointer move and end events on the whole window.
    ///
    /// `on_end` receives both `pointerup` and `pointercancel`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoWindow`] outside a browser, or
    /// [`EditorError::Canvas`] if a listener cannot be registered. Listeners
    /// attached before the failure are removed again.
    pub fn attach<M, E>(on_move: M, on_end: E) -> Result<Self, EditorError>
    where
        M: FnMut(PointerEvent) + 'static,
        E: Fn(PointerEvent) + 'static,
    {
        let window = web_sys::window().ok_or(EditorError::NoWindow)?;
        let mut capture = Self { window, listeners: Vec::with_capacity(3) };

        let on_end = Rc::new(on_end);
        let on_up = Rc::clone(&on_end);
        capture.listen("pointermove", Closure::wrap(Box::new(on_move) as Box<dyn FnMut(PointerEvent)>))?;
        capture.listen("pointerup", Closure::wrap(Box::new(move |ev: PointerEvent| on_up(ev)) as Box<dyn FnMut(PointerEvent)>))?;
        capture.listen("pointercancel", Closure::wrap(Box::new(move |ev: PointerEvent| on_end(ev)) as Box<dyn FnMut(PointerEvent)>))?;
        Ok(capture)
    }

    fn listen(&mut self, event: &'static str, listener: Listener) -> Result<(), EditorError> {
        self.window
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        self.listeners.push((event, listener));
        Ok(())
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        for (event, listener) in &self.listeners {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove window {event} listener: {err:?}");
            }
        }
    }
}

/// Read the modifier keys off a mouse-family event.
#[must_use]
pub fn modifiers_of(ev: &MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

struct Shared {
    engine: RefCell<Engine>,
    capture: RefCell<Option<PointerCapture>>,
    dispatch: Box<dyn Fn(&[Action])>,
}

impl Shared {
    /// Run housekeeping actions here and forward the rest to the host.
    ///
    /// Callers must not hold an engine borrow: dispatch may feed a new
    /// snapshot straight back in.
    fn apply(self: &Rc<Self>, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        let mut render = false;
        let mut outward = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                Action::CapturePointer => self.capture_pointer(),
                Action::ReleasePointer => self.release_pointer(),
                Action::RenderNeeded => render = true,
                other => outward.push(other),
            }
        }
        if render {
            self.render();
        }
        if !outward.is_empty() {
            (self.dispatch)(&outward);
        }
    }

    fn render(&self) {
        if let Err(err) = self.engine.borrow().render() {
            log::warn!("render failed: {err}");
        }
    }

    fn capturing(&self) -> bool {
        self.capture.borrow().is_some()
    }

    fn capture_pointer(self: &Rc<Self>) {
        if self.capturing() {
            return;
        }
        let on_move = {
            let weak = Rc::downgrade(self);
            move |ev: PointerEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.pointer_move(&ev);
                }
            }
        };
        let on_end = {
            let weak = Rc::downgrade(self);
            move |ev: PointerEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.pointer_up(&ev);
                }
            }
        };
        match PointerCapture::attach(on_move, on_end) {
            Ok(capture) => *self.capture.borrow_mut() = Some(capture),
            Err(err) => log::warn!("pointer capture unavailable: {err}"),
        }
    }

    fn release_pointer(&self) {
        // Bind first so the RefCell borrow ends before the listeners drop.
        let released = self.capture.borrow_mut().take();
        drop(released);
    }

    fn pointer_down(self: &Rc<Self>, ev: &PointerEvent) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let pt = engine.event_point(ev);
            engine.core.on_pointer_down(pt, Button::from_dom(ev.button()), modifiers_of(ev))
        };
        self.apply(actions);
    }

    fn pointer_move(self: &Rc<Self>, ev: &PointerEvent) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let pt = engine.event_point(ev);
            engine.core.on_pointer_move(pt, modifiers_of(ev))
        };
        self.apply(actions);
    }

    fn pointer_up(self: &Rc<Self>, ev: &PointerEvent) {
        let actions = {
            let mut engine = self.engine.borrow_mut();
            let pt = engine.event_point(ev);
            engine.core.on_pointer_up(pt, Button::from_dom(ev.button()), modifiers_of(ev))
        };
        self.apply(actions);
    }
}

/// A mounted editor: one canvas, one engine, one dispatch target.
pub struct EditorHandle {
    shared: Rc<Shared>,
}

impl EditorHandle {
    /// Mount the editor on `canvas`. `dispatch` receives every intent and
    /// host-side notification the engine produces.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MissingContext`] if the canvas has no 2D context.
    pub fn mount<D>(canvas: HtmlCanvasElement, config: EditorConfig, dispatch: D) -> Result<Self, EditorError>
    where
        D: Fn(&[Action]) + 'static,
    {
        crate::init_logging(config.level());
        let engine = Engine::new(canvas, config)?;
        let shared = Rc::new(Shared {
            engine: RefCell::new(engine),
            capture: RefCell::new(None),
            dispatch: Box::new(dispatch),
        });
        let weak = Rc::downgrade(&shared);
        shared.engine.borrow_mut().set_on_sprite_ready(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.render();
            }
        }));
        log::info!("editor mounted");
        Ok(Self { shared })
    }

    // --- Data inputs ---

    pub fn set_scene(&self, scene: Scene) {
        let actions = self.shared.engine.borrow_mut().core.set_scene(scene);
        self.shared.apply(actions);
    }

    /// # Errors
    ///
    /// Returns [`EditorError::InvalidScene`] for malformed JSON; the current
    /// scene is kept.
    pub fn set_scene_json(&self, raw: &str) -> Result<(), EditorError> {
        let actions = self.shared.engine.borrow_mut().core.set_scene_json(raw)?;
        self.shared.apply(actions);
        Ok(())
    }

    pub fn set_mode(&self, mode: Mode) {
        let actions = self.shared.engine.borrow_mut().core.set_mode(mode);
        self.shared.apply(actions);
    }

    /// Canvas was resized; `dpr` is `window.devicePixelRatio`.
    pub fn resize(&self, width_css: f64, height_css: f64, dpr: f64) {
        self.shared.engine.borrow_mut().set_viewport(width_css, height_css, dpr);
        self.shared.render();
    }

    pub fn remove_measurement(&self, id: &str) {
        let actions = self.shared.engine.borrow_mut().core.remove_measurement(id);
        self.shared.apply(actions);
    }

    pub fn clear_measurements(&self) {
        let actions = self.shared.engine.borrow_mut().core.clear_measurements();
        self.shared.apply(actions);
    }

    #[must_use]
    pub fn measurements(&self) -> Vec<Measurement> {
        self.shared.engine.borrow().core.measurements.as_slice().to_vec()
    }

    // --- Canvas events ---

    pub fn on_pointer_down(&self, ev: &PointerEvent) {
        self.shared.pointer_down(ev);
    }

    /// Ignored while a window capture is active; the capture delivers it.
    pub fn on_pointer_move(&self, ev: &PointerEvent) {
        if !self.shared.capturing() {
            self.shared.pointer_move(ev);
        }
    }

    /// Ignored while a window capture is active; the capture delivers it.
    pub fn on_pointer_up(&self, ev: &PointerEvent) {
        if !self.shared.capturing() {
            self.shared.pointer_up(ev);
        }
    }

    pub fn on_pointer_leave(&self, ev: &PointerEvent) {
        let actions = {
            let mut engine = self.shared.engine.borrow_mut();
            let pt = engine.event_point(ev);
            engine.core.on_pointer_leave(pt)
        };
        self.shared.apply(actions);
    }

    pub fn on_wheel(&self, ev: &WheelEvent) {
        ev.prevent_default();
        let actions = {
            let mut engine = self.shared.engine.borrow_mut();
            let pt = engine.event_point(ev);
            let delta = WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() };
            engine.core.on_wheel(pt, delta, modifiers_of(ev))
        };
        self.shared.apply(actions);
    }

    pub fn on_key_down(&self, ev: &KeyboardEvent) {
        let modifiers = Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() };
        let actions = self.shared.engine.borrow_mut().core.on_key_down(Key(ev.key()), modifiers);
        if !actions.is_empty() {
            ev.prevent_default();
        }
        self.shared.apply(actions);
    }
}

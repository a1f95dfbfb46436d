//! Per-type sprite loading: load once, cache, and fall back until ready.
//!
//! Each component type's placeholder image is requested the first time a
//! component of that type needs drawing. Until the browser finishes decoding
//! it, the renderer draws a plain rectangle; when the load settles the cache
//! entry flips to `Ready` (or `Failed`) and the host is asked to redraw.
//! Nothing here blocks the input state machine.

#[cfg(test)]
#[path = "sprites_test.rs"]
mod sprites_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlImageElement;

use crate::error::EditorError;
use crate::model::ComponentType;

/// Load state of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteState<I> {
    Loading,
    Ready(I),
    Failed,
}

/// Sprite cache keyed by component type, generic over the image handle.
#[derive(Debug)]
pub struct SpriteCache<I> {
    entries: HashMap<ComponentType, SpriteState<I>>,
}

impl<I> Default for SpriteCache<I> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<I> SpriteCache<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` as loading if it has never been requested.
    ///
    /// Returns `true` when the caller should start the load.
    pub fn request(&mut self, kind: ComponentType) -> bool {
        if self.entries.contains_key(&kind) {
            return false;
        }
        self.entries.insert(kind, SpriteState::Loading);
        true
    }

    /// Store a decoded image.
    pub fn resolve(&mut self, kind: ComponentType, image: I) {
        self.entries.insert(kind, SpriteState::Ready(image));
    }

    /// Record a failed load; the fallback rectangle stays in use.
    pub fn fail(&mut self, kind: ComponentType) {
        self.entries.insert(kind, SpriteState::Failed);
    }

    /// The decoded image, if ready.
    #[must_use]
    pub fn get(&self, kind: ComponentType) -> Option<&I> {
        match self.entries.get(&kind) {
            Some(SpriteState::Ready(image)) => Some(image),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self, kind: ComponentType) -> Option<&SpriteState<I>> {
        self.entries.get(&kind)
    }
}

/// Start loading `url` in the browser; `on_done` runs once with the outcome.
///
/// # Errors
///
/// Returns [`EditorError::Canvas`] if the image element cannot be created.
pub fn start_load<F>(url: &str, on_done: F) -> Result<(), EditorError>
where
    F: FnOnce(Option<HtmlImageElement>) + 'static,
{
    let image = HtmlImageElement::new()?;
    let done = Rc::new(RefCell::new(Some(on_done)));

    let done_ok = done.clone();
    let loaded = image.clone();
    let onload = Closure::once_into_js(move || {
        if let Some(cb) = done_ok.borrow_mut().take() {
            cb(Some(loaded));
        }
    });
    let onerror = Closure::once_into_js(move || {
        if let Some(cb) = done.borrow_mut().take() {
            cb(None);
        }
    });

    image.set_onload(Some(onload.unchecked_ref()));
    image.set_onerror(Some(onerror.unchecked_ref()));
    image.set_src(url);
    Ok(())
}

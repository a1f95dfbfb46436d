//! End-to-end gesture sequences against `EngineCore`, with a minimal store
//! that applies the emitted intents and feeds the next snapshot back in.

use layout_canvas::camera::Point;
use layout_canvas::engine::{Action, EngineCore};
use layout_canvas::input::{Button, Modifiers};
use layout_canvas::model::{ComponentType, PlacedComponent, Scene, Vec3};

/// Applies store intents the way the host configuration store does.
struct Store {
    scene: Scene,
}

impl Store {
    fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::AddConnection { connection } => self.scene.connections.push(connection.clone()),
                Action::UpdateComponent { component_id, updates } => {
                    if let Some(c) = self.scene.components.iter_mut().find(|c| &c.id == component_id) {
                        if let Some(p) = updates.position {
                            c.position = p;
                        }
                        if let Some(r) = updates.rotation {
                            c.rotation = r;
                        }
                    }
                }
                Action::SetSelectedComponent { component_id } => {
                    self.scene.selected_ids = vec![component_id.clone()];
                    self.scene.primary_selected_id = Some(component_id.clone());
                }
                Action::ToggleComponentSelection { component_id } => {
                    if let Some(idx) = self.scene.selected_ids.iter().position(|s| s == component_id) {
                        self.scene.selected_ids.remove(idx);
                    } else {
                        self.scene.selected_ids.push(component_id.clone());
                    }
                }
                Action::SetSelectedComponents { component_ids } => self.scene.selected_ids.clone_from(component_ids),
                Action::ClearSelection => self.scene.selected_ids.clear(),
                _ => {}
            }
        }
    }
}

struct Harness {
    core: EngineCore,
    store: Store,
}

impl Harness {
    fn new(components: Vec<PlacedComponent>) -> Self {
        let scene = Scene { components, ..Default::default() };
        let mut core = EngineCore::new();
        core.set_viewport(800.0, 600.0, 1.0);
        core.set_scene(scene.clone());
        Self { core, store: Store { scene } }
    }

    fn commit(&mut self, actions: &[Action]) {
        self.store.apply(actions);
        self.core.set_scene(self.store.scene.clone());
    }

    fn down(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        let actions = self.core.on_pointer_down(Point::new(x, y), Button::Primary, modifiers);
        self.commit(&actions);
    }

    fn drag_to(&mut self, x: f64, y: f64) {
        let actions = self.core.on_pointer_move(Point::new(x, y), Modifiers::default());
        self.commit(&actions);
    }

    fn up(&mut self, x: f64, y: f64) {
        let actions = self.core.on_pointer_up(Point::new(x, y), Button::Primary, Modifiers::default());
        self.commit(&actions);
    }

    fn click(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        self.down(x, y, modifiers);
        self.up(x, y);
    }

    fn position(&self, id: &str) -> Option<Vec3> {
        self.store.scene.components.iter().find(|c| c.id == id).map(|c| c.position)
    }
}

fn spotlight(id: &str, x: f64, z: f64) -> PlacedComponent {
    PlacedComponent {
        id: id.to_owned(),
        kind: ComponentType::Spotlight,
        position: Vec3::new(x, 0.0, z),
        rotation: Vec3::default(),
        connections: Vec::new(),
        name: None,
    }
}

fn connector(id: &str, x: f64, z: f64) -> PlacedComponent {
    PlacedComponent { kind: ComponentType::Connector, ..spotlight(id, x, z) }
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

#[test]
fn ctrl_click_twice_restores_selection() {
    let mut h = Harness::new(vec![spotlight("a", 0.0, 0.0), spotlight("b", 3.0, 0.0)]);
    h.click(400.0, 300.0, Modifiers::default());
    assert_eq!(h.store.scene.selected_ids, vec!["a".to_owned()]);

    h.click(550.0, 300.0, ctrl());
    assert_eq!(h.store.scene.selected_ids, vec!["a".to_owned(), "b".to_owned()]);

    h.click(550.0, 300.0, ctrl());
    assert_eq!(h.store.scene.selected_ids, vec!["a".to_owned()]);
}

#[test]
fn drag_through_store_moves_by_exact_delta() {
    let mut h = Harness::new(vec![spotlight("a", 0.0, 0.0)]);
    h.down(400.0, 300.0, Modifiers::default());
    h.drag_to(425.0, 300.0);
    h.drag_to(450.0, 300.0);
    h.up(450.0, 300.0);
    assert_eq!(h.position("a"), Some(Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn box_select_then_group_drag() {
    let mut h = Harness::new(vec![
        spotlight("a", 0.0, 0.0),
        spotlight("b", 1.0, 0.0),
        spotlight("c", 5.0, 0.0),
    ]);
    h.down(350.0, 250.0, Modifiers::default());
    h.drag_to(480.0, 350.0);
    h.up(480.0, 350.0);
    assert_eq!(h.store.scene.selected_ids, vec!["a".to_owned(), "b".to_owned()]);

    // Ctrl-grabbing a third component adds it and drags all three.
    h.down(650.0, 300.0, ctrl());
    h.drag_to(650.0, 350.0);
    h.up(650.0, 350.0);
    assert_eq!(h.position("a"), Some(Vec3::new(0.0, 0.0, 1.0)));
    assert_eq!(h.position("b"), Some(Vec3::new(1.0, 0.0, 1.0)));
    assert_eq!(h.position("c"), Some(Vec3::new(5.0, 0.0, 1.0)));
}

#[test]
fn connection_flow_adds_exactly_one_connection() {
    let mut h = Harness::new(vec![connector("c1", 0.0, 0.0), connector("c2", 4.0, 0.0)]);
    h.click(375.0, 300.0, Modifiers::default());
    h.click(575.0, 300.0, Modifiers::default());
    assert_eq!(h.store.scene.connections.len(), 1);

    h.click(375.0, 300.0, Modifiers::default());
    h.click(425.0, 300.0, Modifiers::default());
    assert_eq!(h.store.scene.connections.len(), 1);
}

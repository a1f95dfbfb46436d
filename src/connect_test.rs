use super::*;
use crate::model::{ComponentType, PlacedComponent, Vec3};

fn placed(id: &str, kind: ComponentType) -> PlacedComponent {
    PlacedComponent {
        id: id.to_owned(),
        kind,
        position: Vec3::default(),
        rotation: Vec3::default(),
        connections: Vec::new(),
        name: None,
    }
}

fn scene() -> Scene {
    Scene {
        components: vec![
            placed("c1", ComponentType::Track),
            placed("c2", ComponentType::Spotlight),
            placed("c3", ComponentType::Track),
        ],
        ..Default::default()
    }
}

#[test]
fn first_click_starts() {
    let out = advance(None, PortRef::new("c1", "top1"), &scene(), false);
    assert_eq!(out, Handshake::Started(PortRef::new("c1", "top1")));
}

#[test]
fn second_click_on_other_component_completes() {
    let out = advance(Some(PortRef::new("c1", "top1")), PortRef::new("c2", "mount"), &scene(), false);
    let Handshake::Completed(conn) = out else {
        panic!("expected a connection, got {out:?}");
    };
    assert_eq!(conn.source, PortRef::new("c1", "top1"));
    assert_eq!(conn.target, PortRef::new("c2", "mount"));
    assert!(conn.id.starts_with("connection-"));
}

#[test]
fn second_click_on_same_component_cancels() {
    let out = advance(Some(PortRef::new("c1", "left")), PortRef::new("c1", "right"), &scene(), false);
    assert_eq!(out, Handshake::Cancelled);
}

#[test]
fn permissive_mode_links_incompatible_kinds() {
    // top1 and top1 are both outputs.
    let out = advance(Some(PortRef::new("c1", "top1")), PortRef::new("c3", "top1"), &scene(), false);
    assert!(matches!(out, Handshake::Completed(_)));
}

#[test]
fn strict_mode_rejects_output_to_output() {
    let out = advance(Some(PortRef::new("c1", "top1")), PortRef::new("c3", "top2"), &scene(), true);
    assert_eq!(out, Handshake::Cancelled);
}

#[test]
fn strict_mode_accepts_output_to_input() {
    let out = advance(Some(PortRef::new("c1", "top1")), PortRef::new("c2", "mount"), &scene(), true);
    assert!(matches!(out, Handshake::Completed(_)));
}

#[test]
fn unknown_ports_are_incompatible() {
    assert!(!ports_compatible(&scene(), &PortRef::new("c1", "nope"), &PortRef::new("c2", "mount")));
    assert!(!ports_compatible(&scene(), &PortRef::new("zz", "left"), &PortRef::new("c2", "mount")));
}

#[test]
fn connection_ids_are_unique() {
    assert_ne!(new_connection_id(), new_connection_id());
}

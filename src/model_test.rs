#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn component(id: &str, kind: ComponentType) -> PlacedComponent {
    PlacedComponent {
        id: id.to_owned(),
        kind,
        position: Vec3::default(),
        rotation: Vec3::default(),
        connections: Vec::new(),
        name: None,
    }
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn component_deserializes_from_host_json() {
    let c: PlacedComponent = serde_json::from_value(json!({
        "id": "c1",
        "type": "power-supply",
        "position": [1.0, 0.0, 2.5],
        "rotation": [0.0, 1.57, 0.0],
        "connections": ["k1"],
    }))
    .unwrap();
    assert_eq!(c.kind, ComponentType::PowerSupply);
    assert_eq!(c.position, Vec3::new(1.0, 0.0, 2.5));
    assert_eq!(c.rotation.y, 1.57);
    assert_eq!(c.connections, vec!["k1".to_owned()]);
    assert!(c.name.is_none());
}

#[test]
fn vec3_serializes_as_array() {
    let v = serde_json::to_value(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    assert_eq!(v, json!([1.0, 2.0, 3.0]));
}

#[test]
fn connection_serializes_camel_case() {
    let conn = Connection {
        id: "k1".to_owned(),
        source: PortRef::new("c1", "left"),
        target: PortRef::new("c2", "mount"),
    };
    let v = serde_json::to_value(&conn).unwrap();
    assert_eq!(v["source"]["componentId"], "c1");
    assert_eq!(v["target"]["pointId"], "mount");
}

#[test]
fn scene_defaults_when_fields_missing() {
    let scene: Scene = serde_json::from_value(json!({})).unwrap();
    assert!(scene.components.is_empty());
    assert_eq!(scene.grid_size, 0.5);
    assert!(!scene.snap_to_grid);
    assert_eq!(scene.mode, Mode::Select);
}

#[test]
fn scene_reads_room_dimensions_and_mode() {
    let scene: Scene = serde_json::from_value(json!({
        "roomDimensions": { "width": 6.0, "length": 3.0, "height": 2.7 },
        "mode": "measure",
        "snapToGrid": true,
        "gridSize": 0.25,
        "selectedIds": ["a"],
        "primarySelectedId": "a",
    }))
    .unwrap();
    assert_eq!(scene.room.width, 6.0);
    assert_eq!(scene.mode, Mode::Measure);
    assert!(scene.snap_to_grid);
    assert_eq!(scene.grid_size, 0.25);
    assert_eq!(scene.primary_selected_id.as_deref(), Some("a"));
}

// =============================================================
// Connection points
// =============================================================

#[test]
fn track_has_five_ports() {
    let ids: Vec<_> = connection_points(ComponentType::Track).iter().map(|p| p.id).collect();
    assert_eq!(ids, ["left", "right", "top1", "top2", "top3"]);
}

#[test]
fn track_top_ports_are_outputs() {
    for id in ["top1", "top2", "top3"] {
        assert_eq!(connection_point(ComponentType::Track, id).unwrap().kind, PortKind::Output);
    }
}

#[test]
fn every_type_has_ports_on_the_floor_plane() {
    for kind in ComponentType::ALL {
        let ports = connection_points(kind);
        assert!(!ports.is_empty(), "{kind:?} has no ports");
        assert!(ports.iter().all(|p| p.offset.y == 0.0));
    }
}

#[test]
fn unknown_point_is_none() {
    assert!(connection_point(ComponentType::Spotlight, "left").is_none());
}

// =============================================================
// PortKind
// =============================================================

#[test]
fn port_kind_compatibility() {
    assert!(PortKind::Output.accepts(PortKind::Input));
    assert!(PortKind::Input.accepts(PortKind::Output));
    assert!(PortKind::Bidirectional.accepts(PortKind::Input));
    assert!(PortKind::Output.accepts(PortKind::Bidirectional));
    assert!(!PortKind::Input.accepts(PortKind::Input));
    assert!(!PortKind::Output.accepts(PortKind::Output));
}

// =============================================================
// Scene queries
// =============================================================

#[test]
fn scene_component_lookup() {
    let scene = Scene {
        components: vec![component("a", ComponentType::Track), component("b", ComponentType::Spotlight)],
        ..Default::default()
    };
    assert_eq!(scene.component("b").map(|c| c.kind), Some(ComponentType::Spotlight));
    assert!(scene.component("zz").is_none());
}

#[test]
fn scene_topmost_first_reverses_order() {
    let scene = Scene {
        components: vec![component("a", ComponentType::Track), component("b", ComponentType::Track)],
        ..Default::default()
    };
    let ids: Vec<_> = scene.topmost_first().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn scene_is_selected() {
    let scene = Scene { selected_ids: vec!["a".to_owned()], ..Default::default() };
    assert!(scene.is_selected("a"));
    assert!(!scene.is_selected("b"));
}

#[test]
fn component_type_names() {
    assert_eq!(ComponentType::PowerSupply.as_str(), "power-supply");
    assert_eq!(ComponentType::Bundle.as_str(), "bundle-derived");
}

#[test]
fn bundle_derived_type_deserializes() {
    let kind: ComponentType = serde_json::from_str("\"bundle-derived\"").unwrap();
    assert_eq!(kind, ComponentType::Bundle);
    let legacy: ComponentType = serde_json::from_str("\"bundle\"").unwrap();
    assert_eq!(legacy, ComponentType::Bundle);
    assert_eq!(serde_json::to_string(&ComponentType::Bundle).unwrap(), "\"bundle-derived\"");
}

#[test]
fn unknown_type_falls_back_to_other() {
    let kind: ComponentType = serde_json::from_str("\"dimmer\"").unwrap();
    assert_eq!(kind, ComponentType::Other);
    assert!(connection_points(ComponentType::Other).is_empty());
}

#[test]
fn scene_with_unknown_type_still_parses() {
    let raw = r#"{"components":[
        {"id":"t1","type":"track","position":[0,0,0],"rotation":[0,0,0]},
        {"id":"b1","type":"bundle-derived","position":[1,0,0],"rotation":[0,0,0]},
        {"id":"d1","type":"dimmer","position":[2,0,0],"rotation":[0,0,0]}
    ]}"#;
    let scene: Scene = serde_json::from_str(raw).unwrap();
    let kinds: Vec<_> = scene.components.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [ComponentType::Track, ComponentType::Bundle, ComponentType::Other]);
}

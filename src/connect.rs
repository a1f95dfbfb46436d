//! Connection protocol: a two-click handshake between connection points.
//!
//! The first click records the source port. A second click on a port of a
//! different component yields exactly one [`Connection`] with a fresh id; a
//! second click on the same component cancels. Port kinds are only checked
//! when strict validation is enabled in [`crate::config::EditorConfig`].

#[cfg(test)]
#[path = "connect_test.rs"]
mod connect_test;

use uuid::Uuid;

use crate::model::{Connection, ConnectionId, PortRef, Scene, connection_point};

/// Result of feeding one connection-point click into the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    /// No connection was pending; `PortRef` is now the pending source.
    Started(PortRef),
    /// The pending source and this click formed a connection.
    Completed(Connection),
    /// Same component clicked twice, or incompatible ports under strict validation.
    Cancelled,
}

/// Generate a fresh connection id.
#[must_use]
pub fn new_connection_id() -> ConnectionId {
    format!("connection-{}", Uuid::new_v4())
}

/// Advance the handshake with a click on `clicked`.
#[must_use]
pub fn advance(pending: Option<PortRef>, clicked: PortRef, scene: &Scene, strict_ports: bool) -> Handshake {
    let Some(source) = pending else {
        return Handshake::Started(clicked);
    };
    if source.component_id == clicked.component_id {
        return Handshake::Cancelled;
    }
    if strict_ports && !ports_compatible(scene, &source, &clicked) {
        log::debug!(
            "connection rejected: {}.{} -> {}.{} have incompatible port kinds",
            source.component_id,
            source.point_id,
            clicked.component_id,
            clicked.point_id
        );
        return Handshake::Cancelled;
    }
    Handshake::Completed(Connection { id: new_connection_id(), source, target: clicked })
}

/// Whether both ports exist and their kinds may be linked.
#[must_use]
pub fn ports_compatible(scene: &Scene, a: &PortRef, b: &PortRef) -> bool {
    let kind_of = |port: &PortRef| {
        scene
            .component(&port.component_id)
            .and_then(|c| connection_point(c.kind, &port.point_id))
            .map(|p| p.kind)
    };
    match (kind_of(a), kind_of(b)) {
        (Some(ka), Some(kb)) => ka.accepts(kb),
        _ => false,
    }
}

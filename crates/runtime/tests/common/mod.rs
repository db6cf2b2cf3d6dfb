#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use game_core::{OrbPool, Portal, Position, WorldConfig, WorldLayout, WorldState, Zone, ZoneKind};
use runtime::{AccountRepository, Connection, InMemoryAccountRepository, Runtime, RuntimeHandle};

pub const WESTHOLD: Position = Position { x: 300.0, y: 375.0 };
pub const EASTGATE: Position = Position { x: 1700.0, y: 375.0 };

/// Small deterministic world: five orbs on a diagonal, two portals.
pub fn fixture_world() -> WorldState {
    let layout = WorldLayout {
        zones: vec![
            Zone::new(150.0, 225.0, 300.0, 300.0, ZoneKind::Town, "westhold"),
            Zone::new(0.0, 0.0, 2000.0, 2000.0, ZoneKind::Wilderness, "plains"),
        ],
        portals: vec![
            Portal::new(1, "Westhold Portal", "Westhold", WESTHOLD),
            Portal::new(2, "Eastgate Portal", "Eastgate", EASTGATE),
        ],
    };
    let orbs = OrbPool::from_positions((1..=5).map(|i| Position::new(i as f64 * 100.0, i as f64 * 100.0)));
    WorldState::with_orbs(WorldConfig::default(), layout, orbs)
}

pub fn start(repo: Arc<dyn AccountRepository>) -> Runtime {
    Runtime::builder()
        .world(fixture_world())
        .accounts(repo)
        .seed(7)
        .build()
        .expect("runtime builds")
}

pub fn start_in_memory() -> (Runtime, Arc<InMemoryAccountRepository>) {
    let repo = Arc::new(InMemoryAccountRepository::new());
    (start(repo.clone()), repo)
}

pub async fn send(handle: &RuntimeHandle, conn: &Connection, message: Value) {
    handle
        .send(conn.id, message.to_string())
        .await
        .expect("runtime accepts message");
}

pub async fn join(handle: &RuntimeHandle, conn: &Connection, username: &str) {
    send(handle, conn, json!({"type": "join", "username": username, "score": 0})).await;
}

pub async fn move_to(handle: &RuntimeHandle, conn: &Connection, at: Position) {
    send(handle, conn, json!({"type": "move", "x": at.x, "y": at.y})).await;
}

/// Waits until the world worker and persistence queue are idle, then
/// returns every frame queued for `conn`.
pub async fn drain(handle: &RuntimeHandle, conn: &mut Connection) -> Vec<Value> {
    handle.flush_persistence().await.expect("persistence flush");
    handle.query_world().await.expect("world query");

    let mut frames = Vec::new();
    while let Ok(frame) = conn.frames.try_recv() {
        frames.push(serde_json::from_str(&frame).expect("frames are JSON"));
    }
    frames
}

pub fn of_type<'a>(frames: &'a [Value], kind: &str) -> Vec<&'a Value> {
    frames.iter().filter(|f| f["type"] == kind).collect()
}

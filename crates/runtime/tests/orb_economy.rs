//! Orb collection, scoring and timed respawn.

mod common;

use std::time::Duration;

use serde_json::json;

use common::{drain, join, of_type, send, start_in_memory};
use runtime::Account;

const RESPAWN_DELAY: Duration = Duration::from_millis(5000);

#[tokio::test]
async fn double_collect_credits_once() {
    let (runtime, _repo) = start_in_memory();
    let handle = runtime.handle();
    let mut alice = handle.connect().await.unwrap();
    let mut bob = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    join(&handle, &bob, "bob").await;
    drain(&handle, &mut alice).await;
    drain(&handle, &mut bob).await;

    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 3})).await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 3})).await;
    send(&handle, &bob, json!({"type": "collectOrb", "orbId": 3})).await;

    let expected = vec![json!({"type": "orbCollected", "orbId": 3, "username": "alice", "score": 10})];
    assert_eq!(drain(&handle, &mut alice).await, expected);
    assert_eq!(drain(&handle, &mut bob).await, expected);

    let world = handle.query_world().await.unwrap();
    assert_eq!(world.player("alice").map(|p| p.score), Some(10));
    assert_eq!(world.player("bob").map(|p| p.score), Some(0));
    assert!(world.orb(3).is_some_and(|orb| orb.collected));
    assert_eq!(world.pending_respawns, 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_orb_is_a_silent_noop() {
    let (runtime, _repo) = start_in_memory();
    let handle = runtime.handle();
    let mut alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    drain(&handle, &mut alice).await;

    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 999})).await;

    assert!(drain(&handle, &mut alice).await.is_empty());
    let world = handle.query_world().await.unwrap();
    assert_eq!(world.player("alice").map(|p| p.score), Some(0));
    assert_eq!(world.pending_respawns, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn collected_orbs_are_absent_from_new_snapshots() {
    let (runtime, _repo) = start_in_memory();
    let handle = runtime.handle();
    let alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 0})).await;

    let mut late = handle.connect().await.unwrap();
    join(&handle, &late, "late").await;
    let frames = drain(&handle, &mut late).await;

    let orbs = frames[0]["orbs"].as_array().unwrap();
    assert_eq!(orbs.len(), 4);
    assert!(orbs.iter().all(|orb| orb["id"] != 0));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn orb_respawns_after_delay_and_not_before() {
    let (runtime, _repo) = start_in_memory();
    let handle = runtime.handle();
    let mut alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    drain(&handle, &mut alice).await;

    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 1})).await;
    assert_eq!(of_type(&drain(&handle, &mut alice).await, "orbCollected").len(), 1);

    tokio::time::sleep(RESPAWN_DELAY - Duration::from_millis(1)).await;
    let world = handle.query_world().await.unwrap();
    assert!(world.orb(1).is_some_and(|orb| orb.collected));
    assert!(drain(&handle, &mut alice).await.is_empty());

    // Still collected: a second collect must not arm another timer.
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 1})).await;

    tokio::time::sleep(Duration::from_millis(10)).await;
    let world = handle.query_world().await.unwrap();
    let orb = world.orb(1).unwrap();
    assert!(!orb.collected);
    assert!((20.0..=1980.0).contains(&orb.x));
    assert!((20.0..=1980.0).contains(&orb.y));
    assert_eq!(world.pending_respawns, 0);

    let frames = drain(&handle, &mut alice).await;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "orbRespawn");
    assert_eq!(frames[0]["orb"]["id"], 1);
    assert_eq!(frames[0]["orb"]["collected"], false);

    // Collectable again once respawned.
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 1})).await;
    let world = handle.query_world().await.unwrap();
    assert_eq!(world.player("alice").map(|p| p.score), Some(20));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_respawns() {
    let (runtime, _repo) = start_in_memory();
    let handle = runtime.handle();
    let alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 2})).await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 4})).await;
    assert_eq!(handle.query_world().await.unwrap().pending_respawns, 2);

    runtime.shutdown().await.unwrap();
    assert!(handle.query_world().await.is_err());
}

#[tokio::test]
async fn score_is_flushed_to_the_account() {
    let (runtime, repo) = start_in_memory();
    let handle = runtime.handle();
    handle.accounts().create("alice").await.unwrap();

    let alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 0})).await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 1})).await;
    handle.flush_persistence().await.unwrap();

    let stored: Vec<Account> = repo.snapshot();
    assert_eq!(stored[0].score, 20);

    runtime.shutdown().await.unwrap();
}

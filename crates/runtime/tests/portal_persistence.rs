//! Portal interaction and durable account updates.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{EASTGATE, WESTHOLD, drain, join, move_to, send, start, start_in_memory};
use game_core::Position;
use runtime::{Account, FileAccountRepository, InMemoryAccountRepository};

#[tokio::test]
async fn portal_in_reach_sets_respawn_and_replies_to_requester_only() {
    let (runtime, repo) = start_in_memory();
    let handle = runtime.handle();
    handle.accounts().create("alice").await.unwrap();

    let mut alice = handle.connect().await.unwrap();
    let mut bob = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    join(&handle, &bob, "bob").await;
    move_to(&handle, &alice, Position::new(WESTHOLD.x + 100.0, WESTHOLD.y)).await;
    drain(&handle, &mut alice).await;
    drain(&handle, &mut bob).await;

    send(&handle, &alice, json!({"type": "interactPortal"})).await;

    assert_eq!(
        drain(&handle, &mut alice).await,
        vec![json!({
            "type": "respawnSet",
            "portal": "Westhold Portal",
            "town": "Westhold",
            "x": 300.0,
            "y": 375.0
        })]
    );
    assert!(drain(&handle, &mut bob).await.is_empty());

    let stored = repo.snapshot();
    assert_eq!(stored[0].respawn_point(Position::ORIGIN), WESTHOLD);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn portal_out_of_reach_changes_nothing() {
    let (runtime, repo) = start_in_memory();
    let handle = runtime.handle();
    handle.accounts().create("alice").await.unwrap();
    let writes_after_signup = repo.write_count();

    let mut alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    move_to(&handle, &alice, Position::new(WESTHOLD.x + 100.5, WESTHOLD.y)).await;
    drain(&handle, &mut alice).await;

    send(&handle, &alice, json!({"type": "interactPortal"})).await;

    assert!(drain(&handle, &mut alice).await.is_empty());
    assert_eq!(repo.write_count(), writes_after_signup);
    assert_eq!(
        repo.snapshot()[0].respawn_point(Position::ORIGIN),
        Position::new(1000.0, 1000.0)
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn portal_without_account_is_abandoned_silently() {
    let (runtime, repo) = start_in_memory();
    let handle = runtime.handle();

    let mut guest = handle.connect().await.unwrap();
    join(&handle, &guest, "guest").await;
    move_to(&handle, &guest, WESTHOLD).await;
    drain(&handle, &mut guest).await;

    send(&handle, &guest, json!({"type": "interactPortal"})).await;

    assert!(drain(&handle, &mut guest).await.is_empty());
    assert!(repo.snapshot().is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn storage_failure_leaves_client_without_reply() {
    let (runtime, repo) = start_in_memory();
    let handle = runtime.handle();
    handle.accounts().create("alice").await.unwrap();
    repo.set_failing(true);

    let mut alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    move_to(&handle, &alice, WESTHOLD).await;
    drain(&handle, &mut alice).await;

    send(&handle, &alice, json!({"type": "interactPortal"})).await;
    assert!(drain(&handle, &mut alice).await.is_empty());

    // The world keeps serving the connection.
    move_to(&handle, &alice, Position::new(600.0, 600.0)).await;
    let world = handle.query_world().await.unwrap();
    assert_eq!(world.player("alice").map(|p| (p.x, p.y)), Some((600.0, 600.0)));

    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn concurrent_portals_never_cross_write_accounts() {
    let repo = Arc::new(
        InMemoryAccountRepository::with_accounts(vec![
            Account::new("alice", Position::new(1000.0, 1000.0)),
            Account::new("bob", Position::new(1000.0, 1000.0)),
        ])
        .with_latency(Duration::from_millis(25)),
    );
    let runtime = start(repo.clone());
    let handle = runtime.handle();

    let mut alice = handle.connect().await.unwrap();
    let mut bob = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    join(&handle, &bob, "bob").await;
    move_to(&handle, &alice, WESTHOLD).await;
    move_to(&handle, &bob, EASTGATE).await;
    send(&handle, &alice, json!({"type": "interactPortal"})).await;
    send(&handle, &bob, json!({"type": "interactPortal"})).await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 0})).await;

    let alice_frames = drain(&handle, &mut alice).await;
    let bob_frames = drain(&handle, &mut bob).await;
    assert!(alice_frames.iter().any(|f| f["town"] == "Westhold"));
    assert!(bob_frames.iter().any(|f| f["town"] == "Eastgate"));
    assert!(alice_frames.iter().all(|f| f["town"] != "Eastgate"));

    let stored = repo.snapshot();
    let account = |name: &str| stored.iter().find(|a| a.username == name).unwrap().clone();
    assert_eq!(account("alice").respawn_point(Position::ORIGIN), WESTHOLD);
    assert_eq!(account("alice").score, 10);
    assert_eq!(account("bob").respawn_point(Position::ORIGIN), EASTGATE);
    assert_eq!(account("bob").score, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn file_backed_accounts_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let runtime = start(Arc::new(FileAccountRepository::new(&path)));
    let handle = runtime.handle();
    handle.accounts().create("alice").await.unwrap();
    let alice = handle.connect().await.unwrap();
    join(&handle, &alice, "alice").await;
    move_to(&handle, &alice, EASTGATE).await;
    send(&handle, &alice, json!({"type": "collectOrb", "orbId": 2})).await;
    send(&handle, &alice, json!({"type": "interactPortal"})).await;
    runtime.shutdown().await.unwrap();

    let runtime = start(Arc::new(FileAccountRepository::new(&path)));
    let handle = runtime.handle();
    let account = handle.accounts().find("alice").await.unwrap().unwrap();
    assert_eq!(account.score, 10);
    assert_eq!(account.respawn_point(Position::ORIGIN), EASTGATE);

    runtime.shutdown().await.unwrap();
}

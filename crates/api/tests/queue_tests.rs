mod common;

use serde_json::json;

use common::setup;

const ENQUEUE: &str = r#"
    mutation Enqueue($playerId: UUID!, $queueType: Qualification!) {
        enqueue(playerId: $playerId, queueType: $queueType) { position queueType }
    }
"#;

const DEQUEUE: &str = r#"
    mutation Dequeue($playerId: UUID!) {
        dequeue(playerId: $playerId)
    }
"#;

const REORDER: &str = r#"
    mutation Reorder($queueType: Qualification!, $playerIds: [UUID!]!) {
        reorderQueue(queueType: $queueType, playerIds: $playerIds) { playerId position }
    }
"#;

#[tokio::test]
async fn test_registration_appends_to_queue() {
    let app = setup();
    let a = app.register("A", "ADVANCED").await;
    let b = app.register("B", "ADVANCED").await;
    let c = app.register("C", "INTERMEDIATE").await;

    assert_eq!(app.queue_ids("ADVANCED").await, vec![a, b]);
    assert_eq!(app.queue_ids("INTERMEDIATE").await, vec![c]);
}

#[tokio::test]
async fn test_dequeue_keeps_positions_dense() {
    let app = setup();
    let mut players = Vec::new();
    for i in 1..=5 {
        players.push(app.register(&format!("P{i}"), "INTERMEDIATE").await);
    }

    for idx in [1, 3] {
        let data = app
            .ok(DEQUEUE, json!({ "playerId": players[idx] }))
            .await;
        assert_eq!(data["dequeue"], json!(true));
    }

    // queue_ids asserts positions run 1..N
    assert_eq!(
        app.queue_ids("INTERMEDIATE").await,
        vec![players[0].clone(), players[2].clone(), players[4].clone()]
    );

    let again = app.ok(DEQUEUE, json!({ "playerId": players[1] })).await;
    assert_eq!(again["dequeue"], json!(false));
}

#[tokio::test]
async fn test_queue_status_lists_both_queues() {
    let app = setup();
    app.register("A", "ADVANCED").await;
    app.register("B", "INTERMEDIATE").await;
    app.register("C", "INTERMEDIATE").await;

    let data = app
        .ok(
            r#"
            query {
                queueStatus {
                    advancedCount
                    intermediateCount
                    advanced { position player { name } }
                    intermediate { position player { name } }
                }
            }
            "#,
            json!({}),
        )
        .await;

    assert_eq!(
        data["queueStatus"],
        json!({
            "advancedCount": 1,
            "intermediateCount": 2,
            "advanced": [{ "position": 1, "player": { "name": "A" } }],
            "intermediate": [
                { "position": 1, "player": { "name": "B" } },
                { "position": 2, "player": { "name": "C" } }
            ]
        })
    );
}

#[tokio::test]
async fn test_enqueue_into_other_qualification_is_conflict() {
    let app = setup();
    let player = app.register("Mid", "INTERMEDIATE").await;

    let (_, code) = app
        .err(ENQUEUE, json!({ "playerId": player, "queueType": "ADVANCED" }))
        .await;

    assert_eq!(code, "CONFLICT");
    assert_eq!(app.queue_ids("INTERMEDIATE").await, vec![player]);
}

#[tokio::test]
async fn test_enqueue_inactive_player_is_conflict() {
    let app = setup();
    let player = app.register("Alice", "ADVANCED").await;
    app.ok(
        r#"
        mutation Deactivate($id: UUID!) {
            setPlayerActive(id: $id, active: false) { id }
        }
        "#,
        json!({ "id": player }),
    )
    .await;

    let (_, code) = app
        .err(ENQUEUE, json!({ "playerId": player, "queueType": "ADVANCED" }))
        .await;

    assert_eq!(code, "CONFLICT");
    assert!(app.queue_ids("ADVANCED").await.is_empty());
}

#[tokio::test]
async fn test_enqueue_takes_player_off_court() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    let seated = app.register("Seated", "ADVANCED").await;
    app.assign(&seated, &court).await;
    let waiting = app.register("Waiting", "ADVANCED").await;

    let data = app
        .ok(ENQUEUE, json!({ "playerId": seated, "queueType": "ADVANCED" }))
        .await;

    assert_eq!(data["enqueue"]["position"], json!(2));
    assert!(app.court_ids(&court).await.is_empty());
    assert_eq!(app.queue_ids("ADVANCED").await, vec![waiting, seated]);
    assert!(app.store.invariants_hold().await);
}

#[tokio::test]
async fn test_reorder_replaces_positions() {
    let app = setup();
    let a = app.register("A", "ADVANCED").await;
    let b = app.register("B", "ADVANCED").await;
    let c = app.register("C", "ADVANCED").await;

    let data = app
        .ok(
            REORDER,
            json!({ "queueType": "ADVANCED", "playerIds": [c, a, b] }),
        )
        .await;

    assert_eq!(
        data["reorderQueue"],
        json!([
            { "playerId": c, "position": 1 },
            { "playerId": a, "position": 2 },
            { "playerId": b, "position": 3 }
        ])
    );
    assert_eq!(app.queue_ids("ADVANCED").await, vec![c, a, b]);
}

#[tokio::test]
async fn test_invalid_reorder_changes_nothing() {
    let app = setup();
    let a = app.register("A", "ADVANCED").await;
    let b = app.register("B", "ADVANCED").await;
    let c = app.register("C", "ADVANCED").await;
    let mid = app.register("Mid", "INTERMEDIATE").await;
    let original = vec![a.clone(), b.clone(), c.clone()];

    let (_, missing) = app
        .err(REORDER, json!({ "queueType": "ADVANCED", "playerIds": [c, a] }))
        .await;
    assert_eq!(missing, "VALIDATION_ERROR");

    let (_, duplicate) = app
        .err(
            REORDER,
            json!({ "queueType": "ADVANCED", "playerIds": [a, a, b, c] }),
        )
        .await;
    assert_eq!(duplicate, "VALIDATION_ERROR");

    let (_, unknown) = app
        .err(
            REORDER,
            json!({
                "queueType": "ADVANCED",
                "playerIds": [a, b, uuid::Uuid::new_v4().to_string()]
            }),
        )
        .await;
    assert_eq!(unknown, "NOT_FOUND");

    let (_, mismatched) = app
        .err(
            REORDER,
            json!({ "queueType": "ADVANCED", "playerIds": [a, b, c, mid] }),
        )
        .await;
    assert_eq!(mismatched, "CONFLICT");

    assert_eq!(app.queue_ids("ADVANCED").await, original);
}

#[tokio::test]
async fn test_reorder_with_inactive_player_is_conflict() {
    let app = setup();
    let a = app.register("A", "ADVANCED").await;
    let b = app.register("B", "ADVANCED").await;
    let c = app.register("C", "ADVANCED").await;
    app.ok(
        r#"
        mutation Deactivate($id: UUID!) {
            setPlayerActive(id: $id, active: false) { id }
        }
        "#,
        json!({ "id": b }),
    )
    .await;
    assert_eq!(app.queue_ids("ADVANCED").await, vec![a.clone(), c.clone()]);

    let (_, code) = app
        .err(
            REORDER,
            json!({ "queueType": "ADVANCED", "playerIds": [c, b, a] }),
        )
        .await;

    assert_eq!(code, "CONFLICT");
    assert_eq!(app.queue_ids("ADVANCED").await, vec![a, c]);
}

#[tokio::test]
async fn test_reorder_rejects_player_not_in_queue() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    let a = app.register("A", "ADVANCED").await;
    let seated = app.register("Seated", "ADVANCED").await;
    app.assign(&seated, &court).await;

    let (_, code) = app
        .err(
            REORDER,
            json!({ "queueType": "ADVANCED", "playerIds": [seated, a] }),
        )
        .await;

    assert_eq!(code, "VALIDATION_ERROR");
    assert_eq!(app.queue_ids("ADVANCED").await, vec![a]);
}

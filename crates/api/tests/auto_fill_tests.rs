mod common;

use serde_json::json;

use common::{setup, AUTO_FILL};

fn detail_names(report: &serde_json::Value) -> Vec<String> {
    report["details"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|d| d["player"]["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_five_advanced_players_one_court() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;

    let mut players = Vec::new();
    for name in ["P1", "P2", "P3", "P4", "P5"] {
        players.push(app.register(name, "ADVANCED").await);
    }

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(4));
    assert_eq!(report["remainingAdvanced"], json!(1));
    assert_eq!(report["remainingIntermediate"], json!(0));
    assert_eq!(report["dryRun"], json!(false));
    assert_eq!(detail_names(&report), vec!["P1", "P2", "P3", "P4"]);
    assert!(report["details"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["matchType"] == json!("perfect_match")));

    assert_eq!(app.court_ids(&court).await, players[..4].to_vec());
    assert_eq!(app.queue_ids("ADVANCED").await, vec![players[4].clone()]);
}

#[tokio::test]
async fn test_overflow_into_intermediate_court() {
    let app = setup();
    let advanced = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    let intermediate = app.create_court("I1", "INTERMEDIATE", "STANDARD", None).await;

    for i in 0..4 {
        let p = app.register(&format!("Adv{i}"), "ADVANCED").await;
        app.assign(&p, &advanced).await;
    }
    for i in 0..2 {
        let p = app.register(&format!("Mid{i}"), "INTERMEDIATE").await;
        app.assign(&p, &intermediate).await;
    }
    let spill = app.register("Spill", "ADVANCED").await;

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(1));
    let detail = &report["details"][0];
    assert_eq!(detail["player"]["id"], json!(spill));
    assert_eq!(detail["court"]["id"], json!(intermediate));
    assert_eq!(detail["matchType"], json!("overflow_assignment"));
    assert_eq!(report["remainingAdvanced"], json!(0));
    assert_eq!(app.court_ids(&intermediate).await.len(), 3);
}

#[tokio::test]
async fn test_advanced_court_with_room_is_served_before_overflow() {
    let app = setup();
    let advanced = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    let intermediate = app.create_court("I1", "INTERMEDIATE", "STANDARD", None).await;

    for i in 0..2 {
        let p = app.register(&format!("Mid{i}"), "INTERMEDIATE").await;
        app.assign(&p, &intermediate).await;
    }
    let adv = app.register("Adv", "ADVANCED").await;

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(1));
    let detail = &report["details"][0];
    assert_eq!(detail["player"]["id"], json!(adv));
    assert_eq!(detail["court"]["id"], json!(advanced));
    assert_eq!(detail["matchType"], json!("perfect_match"));
    assert_eq!(report["remainingAdvanced"], json!(0));
    assert_eq!(app.court_ids(&intermediate).await.len(), 2);
    assert_eq!(app.court_ids(&advanced).await, vec![adv]);
}

#[tokio::test]
async fn test_intermediate_players_never_take_advanced_courts() {
    let app = setup();
    let advanced = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    app.register("Mid", "INTERMEDIATE").await;

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(0));
    assert_eq!(report["remainingIntermediate"], json!(1));
    assert!(app.court_ids(&advanced).await.is_empty());
}

#[tokio::test]
async fn test_auto_fill_is_idempotent() {
    let app = setup();
    app.create_court("G1", "ADVANCED", "GAME", Some(1)).await;
    let warmup = app.create_court("W1", "ADVANCED", "WARMUP", Some(1)).await;
    app.create_court("I1", "INTERMEDIATE", "STANDARD", None).await;
    app.create_court("T1", "TRAINING", "STANDARD", None).await;

    for i in 0..3 {
        let p = app.register(&format!("Warm{i}"), "ADVANCED").await;
        app.assign(&p, &warmup).await;
    }
    for i in 0..7 {
        app.register(&format!("Adv{i}"), "ADVANCED").await;
    }
    for i in 0..2 {
        app.register(&format!("Mid{i}"), "INTERMEDIATE").await;
    }

    let first = app.auto_fill().await;
    assert!(first["assignmentsMade"].as_i64().unwrap() > 0);

    let second = app.auto_fill().await;
    assert_eq!(second["assignmentsMade"], json!(0));
    assert_eq!(second["remainingAdvanced"], first["remainingAdvanced"]);
    assert_eq!(second["remainingIntermediate"], first["remainingIntermediate"]);
    assert!(app.store.invariants_hold().await);
}

#[tokio::test]
async fn test_warmup_cascade_reports_each_move() {
    let app = setup();
    let game = app.create_court("G1", "INTERMEDIATE", "GAME", Some(1)).await;
    let warmup = app.create_court("W1", "INTERMEDIATE", "WARMUP", Some(1)).await;

    let mut warming = Vec::new();
    for i in 0..4 {
        let p = app.register(&format!("Warm{i}"), "INTERMEDIATE").await;
        app.assign(&p, &warmup).await;
        warming.push(p);
    }
    let waiting = app.register("Waiting", "INTERMEDIATE").await;

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(5));
    let details = report["details"].as_array().unwrap();
    for detail in &details[..4] {
        assert_eq!(detail["matchType"], json!("warmup"));
        assert_eq!(detail["court"]["id"], json!(game));
        assert_eq!(detail["fromCourt"]["id"], json!(warmup));
    }
    assert_eq!(details[4]["matchType"], json!("queue_cascade"));
    assert_eq!(details[4]["player"]["id"], json!(waiting));
    assert_eq!(details[4]["fromCourt"], json!(null));

    assert_eq!(app.court_ids(&game).await, warming);
    assert_eq!(app.court_ids(&warmup).await, vec![waiting]);
}

#[tokio::test]
async fn test_failed_placement_does_not_abort_batch() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    let p1 = app.register("P1", "ADVANCED").await;
    let p2 = app.register("P2", "ADVANCED").await;
    let p3 = app.register("P3", "ADVANCED").await;

    app.store
        .fail_placements_for(p2.parse().unwrap())
        .await;

    let report = app.auto_fill().await;

    assert_eq!(report["assignmentsMade"], json!(2));
    assert_eq!(report["remainingAdvanced"], json!(1));
    assert_eq!(report["errors"][0]["playerName"], json!("P2"));
    assert_eq!(report["errors"][0]["courtName"], json!("A1"));
    assert_eq!(app.court_ids(&court).await, vec![p1, p3]);
    assert_eq!(app.queue_ids("ADVANCED").await, vec![p2.clone()]);

    app.store.clear_failures().await;
    let retry = app.auto_fill().await;
    assert_eq!(retry["assignmentsMade"], json!(1));
    assert_eq!(retry["details"][0]["player"]["id"], json!(p2));
}

#[tokio::test]
async fn test_preview_matches_run_without_writing() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    for name in ["P1", "P2"] {
        app.register(name, "ADVANCED").await;
    }

    let preview = app
        .ok(
            r#"
            query {
                autoFillPreview {
                    assignmentsMade
                    dryRun
                    details { player { name } }
                }
            }
            "#,
            json!({}),
        )
        .await;

    assert_eq!(preview["autoFillPreview"]["dryRun"], json!(true));
    assert_eq!(preview["autoFillPreview"]["assignmentsMade"], json!(2));
    assert!(app.court_ids(&court).await.is_empty());
    assert_eq!(app.queue_ids("ADVANCED").await.len(), 2);

    let run = app.ok(AUTO_FILL, json!({})).await;
    assert_eq!(
        detail_names(&run["autoFillCourts"]),
        detail_names(&preview["autoFillPreview"])
    );
}

#[tokio::test]
async fn test_store_outage_surfaces_as_internal_error() {
    let app = setup();
    app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    app.register("P1", "ADVANCED").await;

    app.store.set_unavailable(true).await;
    let (message, code) = app.err(AUTO_FILL, json!({})).await;

    assert_eq!(code, "INTERNAL_ERROR");
    assert_eq!(message, "Internal server error");
}

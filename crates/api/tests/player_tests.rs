mod common;

use serde_json::json;

use common::setup;

const REGISTER: &str = r#"
    mutation Register($input: RegisterPlayerInput!) {
        registerPlayer(input: $input) { id name email qualification isActive courtId }
    }
"#;

const UPDATE: &str = r#"
    mutation Update($id: UUID!, $input: UpdatePlayerInput!) {
        updatePlayer(id: $id, input: $input) { id name qualification teamId }
    }
"#;

#[tokio::test]
async fn test_register_player() {
    let app = setup();

    let data = app
        .ok(
            REGISTER,
            json!({
                "input": {
                    "name": "  Alice  ",
                    "email": "Alice@Example.com",
                    "qualification": "ADVANCED"
                }
            }),
        )
        .await;

    let player = &data["registerPlayer"];
    assert_eq!(player["name"], json!("Alice"));
    assert_eq!(player["email"], json!("alice@example.com"));
    assert_eq!(player["qualification"], json!("ADVANCED"));
    assert_eq!(player["isActive"], json!(true));
    assert_eq!(player["courtId"], json!(null));
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = setup();
    app.ok(
        REGISTER,
        json!({
            "input": {
                "name": "Alice",
                "email": "alice@example.com",
                "qualification": "ADVANCED"
            }
        }),
    )
    .await;

    let (_, same_name) = app
        .err(
            REGISTER,
            json!({ "input": { "name": "Alice", "qualification": "INTERMEDIATE" } }),
        )
        .await;
    assert_eq!(same_name, "CONFLICT");

    let (_, same_email) = app
        .err(
            REGISTER,
            json!({
                "input": {
                    "name": "Bob",
                    "email": "ALICE@example.com",
                    "qualification": "ADVANCED"
                }
            }),
        )
        .await;
    assert_eq!(same_email, "CONFLICT");

    assert_eq!(app.queue_ids("ADVANCED").await.len(), 1);
    assert!(app.queue_ids("INTERMEDIATE").await.is_empty());
}

#[tokio::test]
async fn test_invalid_registration_is_validation_error() {
    let app = setup();

    let (_, blank) = app
        .err(
            REGISTER,
            json!({ "input": { "name": "   ", "qualification": "ADVANCED" } }),
        )
        .await;
    assert_eq!(blank, "VALIDATION_ERROR");

    let (_, bad_email) = app
        .err(
            REGISTER,
            json!({
                "input": {
                    "name": "Bob",
                    "email": "not-an-email",
                    "qualification": "ADVANCED"
                }
            }),
        )
        .await;
    assert_eq!(bad_email, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_qualification_change_moves_queue_entry() {
    let app = setup();
    let mid = app.register("Mid", "INTERMEDIATE").await;
    let adv = app.register("Adv", "ADVANCED").await;
    let other = app.register("Other", "INTERMEDIATE").await;

    let data = app
        .ok(
            UPDATE,
            json!({ "id": mid, "input": { "qualification": "ADVANCED" } }),
        )
        .await;

    assert_eq!(data["updatePlayer"]["qualification"], json!("ADVANCED"));
    assert_eq!(app.queue_ids("ADVANCED").await, vec![adv, mid]);
    assert_eq!(app.queue_ids("INTERMEDIATE").await, vec![other]);
}

#[tokio::test]
async fn test_update_rejects_taken_name() {
    let app = setup();
    app.register("Alice", "ADVANCED").await;
    let bob = app.register("Bob", "ADVANCED").await;

    let (_, code) = app
        .err(UPDATE, json!({ "id": bob, "input": { "name": "Alice" } }))
        .await;

    assert_eq!(code, "CONFLICT");
}

#[tokio::test]
async fn test_assign_team() {
    let app = setup();
    let player = app.register("Alice", "ADVANCED").await;

    let team = app
        .ok(
            r#"mutation { createTeam(number: "7") { id number } }"#,
            json!({}),
        )
        .await;
    let team_id = team["createTeam"]["id"].as_str().unwrap().to_string();

    let data = app
        .ok(UPDATE, json!({ "id": player, "input": { "teamId": team_id } }))
        .await;
    assert_eq!(data["updatePlayer"]["teamId"], json!(team_id));

    let teams = app.ok("query { teams { number } }", json!({})).await;
    assert_eq!(teams["teams"], json!([{ "number": "7" }]));

    let (_, code) = app
        .err(r#"mutation { createTeam(number: "7") { id } }"#, json!({}))
        .await;
    assert_eq!(code, "CONFLICT");
}

#[tokio::test]
async fn test_logout_and_login_cycle() {
    let app = setup();
    let court = app.create_court("A1", "ADVANCED", "STANDARD", None).await;
    app.ok(
        REGISTER,
        json!({
            "input": {
                "name": "Alice",
                "email": "alice@example.com",
                "qualification": "ADVANCED"
            }
        }),
    )
    .await;
    let bob = app.register("Bob", "ADVANCED").await;
    let alice = app.queue_ids("ADVANCED").await[0].clone();
    app.assign(&alice, &court).await;

    let logout = app
        .ok(
            r#"mutation { logoutPlayer(email: "alice@example.com") }"#,
            json!({}),
        )
        .await;
    assert_eq!(logout["logoutPlayer"], json!(true));
    assert!(app.court_ids(&court).await.is_empty());
    assert_eq!(app.queue_ids("ADVANCED").await, vec![bob.clone()]);

    let login = app
        .ok(
            r#"mutation { loginPlayer(email: "ALICE@example.com") { id isActive } }"#,
            json!({}),
        )
        .await;
    assert_eq!(login["loginPlayer"]["isActive"], json!(true));
    assert_eq!(app.queue_ids("ADVANCED").await, vec![bob, alice]);

    let unknown = app
        .ok(
            r#"mutation { logoutPlayer(email: "nobody@example.com") }"#,
            json!({}),
        )
        .await;
    assert_eq!(unknown["logoutPlayer"], json!(false));

    let (_, code) = app
        .err(
            r#"mutation { loginPlayer(email: "nobody@example.com") { id } }"#,
            json!({}),
        )
        .await;
    assert_eq!(code, "NOT_FOUND");
}

#[tokio::test]
async fn test_players_filter_and_search() {
    let app = setup();
    app.register("Alice", "ADVANCED").await;
    app.register("Alan", "INTERMEDIATE").await;
    let bob = app.register("Bob", "ADVANCED").await;
    app.ok(
        r#"
        mutation Deactivate($id: UUID!) {
            setPlayerActive(id: $id, active: false) { id }
        }
        "#,
        json!({ "id": bob }),
    )
    .await;

    let names = |data: &serde_json::Value| -> Vec<String> {
        data["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    };

    let all = app.ok("query { players { name } }", json!({})).await;
    assert_eq!(names(&all), vec!["Alan", "Alice", "Bob"]);

    let active = app
        .ok("query { players(isActive: true) { name } }", json!({}))
        .await;
    assert_eq!(names(&active), vec!["Alan", "Alice"]);

    let inactive = app
        .ok("query { players(isActive: false) { name } }", json!({}))
        .await;
    assert_eq!(names(&inactive), vec!["Bob"]);

    let advanced = app
        .ok(
            "query { players(qualification: ADVANCED) { name } }",
            json!({}),
        )
        .await;
    assert_eq!(names(&advanced), vec!["Alice", "Bob"]);

    let search = app
        .ok(r#"query { players(search: "al") { name } }"#, json!({}))
        .await;
    assert_eq!(names(&search), vec!["Alan", "Alice"]);
}

#[tokio::test]
async fn test_delete_player_closes_queue_gap() {
    let app = setup();
    let a = app.register("A", "INTERMEDIATE").await;
    let b = app.register("B", "INTERMEDIATE").await;
    let c = app.register("C", "INTERMEDIATE").await;

    let data = app
        .ok(
            r#"mutation Delete($id: UUID!) { deletePlayer(id: $id) }"#,
            json!({ "id": b }),
        )
        .await;
    assert_eq!(data["deletePlayer"], json!(true));
    assert_eq!(app.queue_ids("INTERMEDIATE").await, vec![a, c]);

    let (_, code) = app
        .err(
            r#"mutation Delete($id: UUID!) { deletePlayer(id: $id) }"#,
            json!({ "id": b }),
        )
        .await;
    assert_eq!(code, "NOT_FOUND");
}

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Variables};
use courtside::gql::{build_schema, CourtsideSchema};
use courtside::{AppConfig, AppState};
use infra::store::MemoryFacilityStore;
use serde_json::{json, Value};

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryFacilityStore>,
    pub schema: CourtsideSchema,
}

pub fn setup() -> TestApp {
    setup_with(AppConfig::default())
}

pub fn setup_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryFacilityStore::new());
    let state = AppState::new(store.clone(), config);
    let schema = build_schema(state.clone());

    TestApp {
        state,
        store,
        schema,
    }
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &CourtsideSchema,
    query: &str,
    variables: Option<Variables>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    schema.execute(request).await
}

impl TestApp {
    /// Run an operation that must succeed and return its `data` as JSON.
    pub async fn ok(&self, query: &str, variables: Value) -> Value {
        let response =
            execute_graphql(&self.schema, query, Some(Variables::from_json(variables))).await;
        assert!(
            response.errors.is_empty(),
            "unexpected errors: {:?}",
            response.errors
        );
        response.data.into_json().expect("data is valid JSON")
    }

    /// Run an operation that must fail; returns the first error message and code.
    pub async fn err(&self, query: &str, variables: Value) -> (String, String) {
        let response =
            execute_graphql(&self.schema, query, Some(Variables::from_json(variables))).await;
        assert!(!response.errors.is_empty(), "expected an error");

        let body = serde_json::to_value(&response).expect("response serializes");
        let error = &body["errors"][0];
        (
            error["message"].as_str().unwrap_or_default().to_string(),
            error["extensions"]["code"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        )
    }

    pub async fn register(&self, name: &str, qualification: &str) -> String {
        let data = self
            .ok(
                r#"
                mutation Register($input: RegisterPlayerInput!) {
                    registerPlayer(input: $input) { id }
                }
                "#,
                json!({ "input": { "name": name, "qualification": qualification } }),
            )
            .await;
        data["registerPlayer"]["id"]
            .as_str()
            .expect("player id")
            .to_string()
    }

    pub async fn create_court(
        &self,
        name: &str,
        court_type: &str,
        role: &str,
        pair_number: Option<i32>,
    ) -> String {
        let data = self
            .ok(
                r#"
                mutation CreateCourt($input: CreateCourtInput!) {
                    createCourt(input: $input) { id }
                }
                "#,
                json!({
                    "input": {
                        "name": name,
                        "courtType": court_type,
                        "role": role,
                        "pairNumber": pair_number,
                    }
                }),
            )
            .await;
        data["createCourt"]["id"]
            .as_str()
            .expect("court id")
            .to_string()
    }

    pub async fn assign(&self, player_id: &str, court_id: &str) -> Value {
        self.ok(
            r#"
            mutation Assign($playerId: UUID!, $courtId: UUID!) {
                assignPlayerToCourt(playerId: $playerId, courtId: $courtId) {
                    matchType
                    player { id courtId }
                }
            }
            "#,
            json!({ "playerId": player_id, "courtId": court_id }),
        )
        .await
    }

    /// Player ids of a queue, head first.
    pub async fn queue_ids(&self, queue_type: &str) -> Vec<String> {
        let data = self
            .ok(
                r#"
                query Queue($queueType: Qualification!) {
                    queue(queueType: $queueType) { position player { id } }
                }
                "#,
                json!({ "queueType": queue_type }),
            )
            .await;

        let entries = data["queue"].as_array().cloned().unwrap_or_default();
        for (idx, entry) in entries.iter().enumerate() {
            assert_eq!(entry["position"], json!(idx + 1), "queue positions are dense");
        }
        entries
            .iter()
            .map(|e| e["player"]["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Player ids on a court, first placed first.
    pub async fn court_ids(&self, court_id: &str) -> Vec<String> {
        let data = self
            .ok(
                r#"
                query CourtPlayers($courtId: UUID!) {
                    courtPlayers(courtId: $courtId) { id }
                }
                "#,
                json!({ "courtId": court_id }),
            )
            .await;
        data["courtPlayers"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .map(|p| p["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub async fn auto_fill(&self) -> Value {
        let data = self.ok(AUTO_FILL, json!({})).await;
        data["autoFillCourts"].clone()
    }
}

pub const AUTO_FILL: &str = r#"
    mutation {
        autoFillCourts {
            assignmentsMade
            remainingAdvanced
            remainingIntermediate
            dryRun
            details {
                matchType
                player { id name }
                court { id name }
                fromCourt { id }
            }
            errors { playerId playerName courtName message }
        }
    }
"#;

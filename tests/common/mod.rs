use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use vitalpath::api::ApiClient;
use vitalpath::config::ApiConfig;
use vitalpath::session::{MemoryTokenStore, SessionTokens, TokenStore};
use wiremock::MockServer;

/// Client against `server` whose session lives in a fresh memory store.
#[allow(dead_code)]
pub fn client_with_tokens(
    server: &MockServer,
    tokens: Option<SessionTokens>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(match tokens {
        Some(tokens) => MemoryTokenStore::with_tokens(tokens),
        None => MemoryTokenStore::default(),
    });
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    let client = ApiClient::new(&config, store.clone() as Arc<dyn TokenStore>)
        .expect("failed to build client");
    (client, store)
}

/// Client holding access token `access` and refresh token `refresh`.
#[allow(dead_code)]
pub fn signed_in_client(
    server: &MockServer,
    access: &str,
    refresh: Option<&str>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    client_with_tokens(
        server,
        Some(SessionTokens::new(access, refresh.map(str::to_string))),
    )
}

/// A dashboard entry body as returned by the API.
#[allow(dead_code)]
pub fn entry_json(id: i64, timestamp: &str, score: u8) -> Value {
    json!({
        "id": id,
        "timestamp": timestamp,
        "fulfillment": score, "happiness": score, "energy": score,
        "stress": score, "sleep": score, "activity": score,
        "nutrition": score, "purpose": score, "motivation": score,
        "confidence": score
    })
}

/// A stored discovery profile body with every baseline at `baseline`.
#[allow(dead_code)]
pub fn profile_json(baseline: u8) -> Value {
    json!({
        "uuid": "6f1c1a4e-8c7a-4a53-9b0e-2d8f3c9e1a11",
        "preferred_name": "Alex",
        "age": 34,
        "gender": "female",
        "height_feet": 5,
        "height_inches": 7,
        "weight": 150,
        "location": "Seattle",
        "marital_status": "",
        "goal_1": "longevity",
        "goal_2": "",
        "goal_3": "",
        "baseline_fulfillment": baseline,
        "baseline_happiness": baseline,
        "baseline_energy": baseline,
        "baseline_stress": baseline,
        "baseline_sleep": baseline,
        "baseline_activity": baseline,
        "baseline_nutrition": baseline,
        "baseline_purpose": baseline,
        "baseline_motivation": baseline,
        "baseline_confidence": baseline,
        "bmi": 23.5,
        "bmi_category": "Normal weight",
        "submitted_at": "2025-03-01T12:00:00Z"
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

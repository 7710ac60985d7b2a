//! Integration tests for the file token store
//!
//! **Coverage:**
//! - Hand-written credential files are readable
//! - Concurrent writers leave a valid file behind
//! - A rotated refresh token is the one used by the next refresh grant

use std::sync::Arc;

use serde_json::{json, Value};
use smartthings_core::RefreshTokenStore;
use smartthings_domain::{AuthData, ClientSettings, RefreshData};
use smartthings_infra::{EndpointClientBuilder, FileTokenStore, StoredCredentials};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn reads_hand_written_credentials() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(
        &path,
        r#"{"client_id": "cli", "client_secret": "shh", "refresh_token": "seed"}"#,
    )
    .unwrap();

    let store = FileTokenStore::new(&path);

    assert_eq!(store.get_refresh_data().await.unwrap(), RefreshData::new("seed", "cli", "shh"));
    assert_eq!(store.auth_token().await.unwrap(), None);
}

#[tokio::test]
async fn concurrent_writes_leave_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    let store = Arc::new(
        FileTokenStore::create(&path, RefreshData::new("refresh-0", "id", "secret")).await.unwrap(),
    );

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .put_auth_data(&AuthData::new(format!("access-{i}"), format!("refresh-{i}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let stored: StoredCredentials = serde_json::from_str(&contents).unwrap();
    let suffix = stored.refresh_token.trim_start_matches("refresh-");
    assert_ne!(suffix, "0");
    assert_eq!(stored.auth_token, Some(format!("access-{suffix}")));
    assert_eq!(stored.client_id, "id");
    assert!(!dir.path().join("credentials.json.tmp").exists());
}

#[tokio::test]
async fn rotated_refresh_token_is_used_by_next_refresh() {
    let server = MockServer::start().await;

    for (old_refresh, access, refresh) in
        [("refresh-1", "access-2", "refresh-2"), ("refresh-2", "access-3", "refresh-3")]
    {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains(format!("refresh_token={old_refresh}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": access, "refresh_token": refresh})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/devices/abc"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"round": 1})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    for token in ["access-1", "access-2"] {
        Mock::given(method("GET"))
            .and(path("/devices/abc"))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/devices/abc"))
        .and(header("Authorization", "Bearer access-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"round": 2})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("credentials.json");
    let store = Arc::new(
        FileTokenStore::create(&token_path, RefreshData::new("refresh-1", "id", "secret")).await.unwrap(),
    );
    let settings = ClientSettings {
        base_url: server.uri(),
        auth_url: format!("{}/oauth/token", server.uri()),
        ..Default::default()
    };
    let client = EndpointClientBuilder::new("devices")
        .settings(settings)
        .refresh_token("access-1", store.clone())
        .build()
        .unwrap();

    let first: Value = client.get(Some("abc"), None, None).await.unwrap();
    let second: Value = client.get(Some("abc"), None, None).await.unwrap();

    assert_eq!(first, json!({"round": 1}));
    assert_eq!(second, json!({"round": 2}));
    assert_eq!(store.get_refresh_data().await.unwrap().refresh_token, "refresh-3");
    assert_eq!(store.auth_token().await.unwrap().as_deref(), Some("access-3"));
}

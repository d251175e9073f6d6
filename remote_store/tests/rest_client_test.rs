//! Integration tests for the PostgREST client against a mock server

use config::{RemoteConfig, Returning};
use remote_store::prelude::*;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-anon-key";

fn client(server: &MockServer, returning: Returning) -> RestClient {
    let config = RemoteConfig::new(server.uri(), KEY.to_string()).with_returning(returning);
    RestClient::new(&config).unwrap()
}

fn users(server: &MockServer) -> Collection {
    Collection::new(Arc::new(client(server, Returning::Representation)), "users").unwrap()
}

#[tokio::test]
async fn test_select_sends_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("select", "*"))
        .and(header("apikey", KEY))
        .and(header("authorization", format!("Bearer {}", KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u1", "username": "ana" },
            { "id": "u2", "username": "bo" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = users(&server).select().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["username"], "bo");
}

#[tokio::test]
async fn test_select_single_uses_object_media_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.u1"))
        .and(header("accept", "application/vnd.pgrst.object+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "u1", "username": "ana" })),
        )
        .mount(&server)
        .await;

    let row = users(&server)
        .select_single(&RecordId::new("u1").unwrap())
        .await
        .unwrap();
    assert_eq!(row["username"], "ana");
}

#[tokio::test]
async fn test_select_single_miss_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(406).set_body_json(json!({
            "code": "PGRST116",
            "details": "The result contains 0 rows",
            "hint": null,
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let err = users(&server)
        .select_single(&RecordId::new("missing").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "JSON object requested, multiple (or no) rows returned"
    );
}

#[tokio::test]
async fn test_insert_prefers_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({ "username": "ana", "email": "ana@x.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "u1", "username": "ana", "email": "ana@x.com" }
        ])))
        .mount(&server)
        .await;

    let rows = users(&server)
        .insert(json!({ "username": "ana", "email": "ana@x.com" }))
        .await
        .unwrap();
    assert_eq!(rows[0]["id"], "u1");
}

#[tokio::test]
async fn test_minimal_mutations_return_no_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/posts"))
        .and(header("prefer", "return=minimal"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let posts = Collection::new(Arc::new(client(&server, Returning::Minimal)), "posts").unwrap();
    let rows = posts.insert(json!({ "title": "hello" })).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_update_and_delete_filter_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.u1"))
        .and(body_json(json!({ "email": "ana2@x.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "u1", "username": "ana", "email": "ana2@x.com" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.u1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let users = users(&server);
    let id = RecordId::new("u1").unwrap();
    let updated = users
        .update(&id, json!({ "email": "ana2@x.com" }))
        .await
        .unwrap();
    assert_eq!(updated[0]["email"], "ana2@x.com");

    assert!(users.delete(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_conflict_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "details": "Key (id)=(u1) already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"users_pkey\""
        })))
        .mount(&server)
        .await;

    let err = users(&server).insert(json!({ "id": "u1" })).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.status, Some(409));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = RemoteConfig::new("http://127.0.0.1:9".to_string(), KEY.to_string()).with_timeout(2);
    let store = Arc::new(RestClient::new(&config).unwrap());
    let users = Collection::new(store, "users").unwrap();

    let err = users.select().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
}

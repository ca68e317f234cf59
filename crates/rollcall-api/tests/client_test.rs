// Contract tests for `ActivitiesClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rollcall_api::{ActivitiesClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ActivitiesClient) {
    let server = MockServer::start().await;
    let client = ActivitiesClient::from_reqwest(&server.uri(), reqwest::Client::new())
        .expect("mock server URI is a valid base");
    (server, client)
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_activities_preserves_server_order() {
    let (server, client) = setup().await;

    // Raw body: the server's (non-alphabetical) order is part of the
    // contract and must survive decoding.
    let body = r#"{
        "Chess Club": {
            "description": "Learn strategies and compete in chess tournaments",
            "schedule": "Fridays, 3:30 PM - 5:00 PM",
            "max_participants": 12,
            "participants": ["michael@mergington.edu", "daniel@mergington.edu"]
        },
        "Art Studio": {
            "description": "Painting, drawing, and visual arts exploration",
            "schedule": "Fridays, 2:00 PM - 3:30 PM",
            "max_participants": 18,
            "participants": []
        },
        "Basketball Team": {
            "description": "Competitive basketball training and matches",
            "schedule": "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            "max_participants": 15,
            "participants": ["alex@mergington.edu"]
        }
    }"#;

    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let catalog = client.activities().await.unwrap();

    let names: Vec<&str> = catalog.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Chess Club", "Art Studio", "Basketball Team"]);

    let chess = &catalog["Chess Club"];
    assert_eq!(chess.max_participants, 12);
    assert_eq!(chess.participants.len(), 2);
    assert_eq!(chess.participants[0], "michael@mergington.edu");
    assert_eq!(chess.spots_left(), 10);
    assert!(catalog["Art Studio"].participants.is_empty());
}

#[tokio::test]
async fn test_activities_bad_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let result = client.activities().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Signup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_signup_success() {
    let (server, client) = setup().await;

    // Spaces in the activity name must be percent-encoded in the path;
    // the email rides in the query string.
    Mock::given(method("POST"))
        .and(path("/activities/Chess%20Club/signup"))
        .and(query_param("email", "newkid@mergington.edu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Signed up newkid@mergington.edu for Chess Club"
        })))
        .mount(&server)
        .await;

    let msg = client
        .signup("Chess Club", "newkid@mergington.edu")
        .await
        .unwrap();

    assert_eq!(msg.message, "Signed up newkid@mergington.edu for Chess Club");
}

#[tokio::test]
async fn test_signup_duplicate_surfaces_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/activities/Chess%20Club/signup"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Student already signed up"
        })))
        .mount(&server)
        .await;

    let result = client.signup("Chess Club", "michael@mergington.edu").await;

    match result {
        Err(Error::Api { status, ref detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail.as_deref(), Some("Student already signed up"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_signup_unknown_activity_404() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/activities/Knitting/signup"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Activity not found"
        })))
        .mount(&server)
        .await;

    let result = client.signup("Knitting", "kid@mergington.edu").await;

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.detail(), Some("Activity not found"));
}

// ── Unregister ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_unregister_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(
            "/activities/Art%20Studio/participants/noah@mergington.edu",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Removed noah@mergington.edu from Art Studio"
        })))
        .mount(&server)
        .await;

    let msg = client
        .unregister("Art Studio", "noah@mergington.edu")
        .await
        .unwrap();

    assert_eq!(msg.message, "Removed noah@mergington.edu from Art Studio");
}

#[tokio::test]
async fn test_unregister_participant_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(
            "/activities/Art%20Studio/participants/ghost@mergington.edu",
        ))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Participant not found"
        })))
        .mount(&server)
        .await;

    let result = client.unregister("Art Studio", "ghost@mergington.edu").await;

    match result {
        Err(Error::Api { status, ref detail }) => {
            assert_eq!(status, 404);
            assert_eq!(detail.as_deref(), Some("Participant not found"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Membership lookup ───────────────────────────────────────────────

#[tokio::test]
async fn test_my_activities_empty_mapping() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/my-activities"))
        .and(query_param("email", "loner@mergington.edu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mine = client.my_activities("loner@mergington.edu").await.unwrap();

    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_my_activities_tolerates_full_objects() {
    let (server, client) = setup().await;

    // A server may answer with the complete activity object; the extra
    // fields are ignored by the reduced view.
    let body = r#"{
        "Chess Club": {
            "description": "Learn strategies and compete in chess tournaments",
            "schedule": "Fridays, 3:30 PM - 5:00 PM",
            "max_participants": 12,
            "participants": ["michael@mergington.edu"]
        },
        "Debate Team": {
            "description": "Competitive debate and public speaking skills",
            "schedule": "Mondays and Fridays, 3:30 PM - 4:30 PM"
        }
    }"#;

    Mock::given(method("GET"))
        .and(path("/my-activities"))
        .and(query_param("email", "michael@mergington.edu"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let mine = client
        .my_activities("michael@mergington.edu")
        .await
        .unwrap();

    assert_eq!(mine.len(), 2);
    let names: Vec<&str> = mine.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Chess Club", "Debate Team"]);
    assert_eq!(mine["Debate Team"].schedule, "Mondays and Fridays, 3:30 PM - 4:30 PM");
}

// ── Error taxonomy ──────────────────────────────────────────────────

#[tokio::test]
async fn test_error_500_without_detail_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.activities().await;

    match result {
        Err(Error::Api { status, ref detail }) => {
            assert_eq!(status, 500);
            assert!(detail.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_non_json_failure_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_raw("boom", "text/plain"))
        .mount(&server)
        .await;

    let result = client.signup("Chess Club", "kid@mergington.edu").await;

    match result {
        Err(Error::Api { status, ref detail }) => {
            assert_eq!(status, 400);
            assert!(detail.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let (server, client) = setup().await;
    drop(server);

    let result = client.activities().await;

    let err = result.unwrap_err();
    assert!(err.is_transport(), "expected Transport error, got: {err:?}");
    assert!(err.detail().is_none());
}

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::{Layer, ServiceExt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{api, state::AppState};

const SAMPLE_IGC: &str = "\
AXCSABC FLIGHT:1
HFDTE250818
HFFXA035
HFPLTPILOTINCHARGE:Ola Nordmann
HFGTYGLIDERTYPE:ASK-21
HFGIDGLIDERID:LN-GAB
C250818094500250818000201
C5111359N00101899WTAKEOFF
C5110179N00102644WSTART
C5209092N00255227WTURN
C5110179N00102644WFINISH
C5111359N00101899WLANDING
B0945005111359N00101899WA0063000650
B0945055111200N00101700WA0063500655
LXXXSOME LOG LINE
G1234567890
";

fn setup_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new());
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn serve_sample() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/sample.igc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_IGC))
        .mount(&server)
        .await;
    server
}

fn sample_url(server: &MockServer) -> String {
    format!("{}/tracks/sample.igc", server.uri())
}

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_json(app: &axum::Router, uri: &str, body: String) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn register(app: &axum::Router, url: &str) -> axum::response::Response {
    post_json(app, "/igcinfo/api/igc", json!({ "url": url }).to_string()).await
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

async fn read_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("parse json")
}

#[tokio::test]
async fn service_info_reports_identity_and_uptime() {
    let (app, _state) = setup_app();

    let response = get(&app, "/igcinfo/api").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["Info"], "Service for igc tracks.");
    assert_eq!(body["Version"], "v1");
    let uptime = body["Uptime"].as_str().expect("uptime string");
    assert!(
        uptime.starts_with("P0Y0M0DT0H0M"),
        "unexpected uptime {uptime}"
    );
}

#[tokio::test]
async fn empty_store_lists_an_empty_array() {
    let (app, _state) = setup_app();

    let response = get(&app, "/igcinfo/api/igc").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn register_assigns_sequential_ids() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;

    let first = register(&app, &sample_url(&server)).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_text(first).await, "1");

    let second = register(&app, &sample_url(&server)).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_text(second).await, "2");

    let listing = get(&app, "/igcinfo/api/igc").await;
    assert_eq!(read_json(listing).await, json!([1, 2]));
}

#[tokio::test]
async fn concurrent_registrations_get_distinct_ids() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;
    let url = sample_url(&server);

    let (first, second) = tokio::join!(register(&app, &url), register(&app, &url));
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let mut ids = [
        read_json(first).await.as_u64().expect("id"),
        read_json(second).await.as_u64().expect("id"),
    ];
    ids.sort_unstable();
    assert_eq!(ids, [1, 2]);
}

#[tokio::test]
async fn register_rejects_malformed_json() {
    let (app, _state) = setup_app();

    let response = post_json(&app, "/igcinfo/api/igc", "{not json".to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid json object\n");
}

#[tokio::test]
async fn register_rejects_unknown_json_members() {
    let (app, _state) = setup_app();

    let body = json!({ "url": "http://example.com/x.igc", "extra": 1 }).to_string();
    let response = post_json(&app, "/igcinfo/api/igc", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid json object\n");
}

#[tokio::test]
async fn register_requires_a_json_content_type() {
    let (app, _state) = setup_app();

    let request = Request::builder()
        .method("POST")
        .uri("/igcinfo/api/igc")
        .body(Body::from(
            json!({ "url": "http://example.com/x.igc" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid json object\n");
}

#[tokio::test]
async fn register_rejects_a_relative_url() {
    let (app, _state) = setup_app();

    let response = register(&app, "tracks/sample.igc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid url\n");
}

#[tokio::test]
async fn register_reports_an_unparseable_file() {
    let (app, _state) = setup_app();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/noise.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("just some text\n"))
        .mount(&server)
        .await;

    let response = register(&app, &format!("{}/tracks/noise.txt", server.uri())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.starts_with("Bad request: "), "unexpected body {body:?}");
}

#[tokio::test]
async fn register_reports_a_missing_upstream_file() {
    let (app, _state) = setup_app();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/gone.igc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = register(&app, &format!("{}/tracks/gone.igc", server.uri())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.starts_with("Bad request: "));
}

#[tokio::test]
async fn failed_registration_leaves_the_store_untouched() {
    let (app, state) = setup_app();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/noise.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not igc"))
        .mount(&server)
        .await;

    let response = register(&app, &format!("{}/tracks/noise.txt", server.uri())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.tracks.count(), 0);
}

#[tokio::test]
async fn track_metadata_round_trip() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;
    register(&app, &sample_url(&server)).await;

    let expected = igc_core::parse(SAMPLE_IGC).expect("sample parses");

    let response = get(&app, "/igcinfo/api/igc/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["H_date"], "2018-08-25T00:00:00Z");
    assert_eq!(body["pilot"], "Ola Nordmann");
    assert_eq!(body["glider"], "ASK-21");
    assert_eq!(body["glider_id"], "LN-GAB");
    let length = body["track_length"].as_f64().expect("track length");
    assert!((length - expected.task.distance()).abs() < 1e-9);
}

#[tokio::test]
async fn field_projection_serves_plain_text() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;
    register(&app, &sample_url(&server)).await;

    let expected = igc_core::parse(SAMPLE_IGC).expect("sample parses");

    assert_eq!(
        body_text(get(&app, "/igcinfo/api/igc/1/pilot").await).await,
        "Ola Nordmann"
    );
    assert_eq!(
        body_text(get(&app, "/igcinfo/api/igc/1/glider").await).await,
        "ASK-21"
    );
    assert_eq!(
        body_text(get(&app, "/igcinfo/api/igc/1/glider_id").await).await,
        "LN-GAB"
    );
    assert_eq!(
        body_text(get(&app, "/igcinfo/api/igc/1/track_length").await).await,
        expected.task.distance().to_string()
    );
    assert_eq!(
        body_text(get(&app, "/igcinfo/api/igc/1/H_date").await).await,
        "2018-08-25 00:00:00 UTC"
    );
}

#[tokio::test]
async fn unknown_field_is_named_in_the_error() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;
    register(&app, &sample_url(&server)).await;

    let response = get(&app, "/igcinfo/api/igc/1/Pilot").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Bad request: Pilot is not a valid field.\n"
    );
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let (app, _state) = setup_app();

    let response = get(&app, "/igcinfo/api/igc/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Bad request: id must be a number\n");
}

#[tokio::test]
async fn overflowing_id_is_an_internal_error() {
    let (app, _state) = setup_app();

    let response = get(
        &app,
        "/igcinfo/api/igc/123456789012345678901234567890123456789",
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Internal server error: could not get id from idString\n"
    );
}

#[tokio::test]
async fn unassigned_id_is_rejected() {
    let (app, _state) = setup_app();
    let server = serve_sample().await;
    register(&app, &sample_url(&server)).await;

    for uri in [
        "/igcinfo/api/igc/0",
        "/igcinfo/api/igc/2",
        "/igcinfo/api/igc/2/pilot",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Bad request: no such id exists\n");
    }
}

#[tokio::test]
async fn trailing_slashes_reach_the_same_routes() {
    let (app, _state) = setup_app();
    let app = tower_http::normalize_path::NormalizePathLayer::trim_trailing_slash().layer(app);

    let request = Request::builder()
        .uri("/igcinfo/api/igc/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

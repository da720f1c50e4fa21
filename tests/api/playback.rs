use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use uuid::Uuid;
use vidstream::core::jwt_auth::Role;

use crate::helpers::spawn_app;

#[actix_web::test]
async fn a_session_can_be_started_updated_and_completed() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::post()
        .uri("/api/v1/playback/start")
        .insert_header(harness.bearer())
        .set_json(json!({
            "profileId": profile_id,
            "titleId": Uuid::new_v4(),
            "durationMs": 600000
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    let session_uri = format!(
        "/api/v1/playback/{}",
        body["data"]["session_id"].as_str().unwrap()
    );

    let request = test::TestRequest::patch()
        .uri(&session_uri)
        .insert_header(harness.bearer())
        .set_json(json!({
            "lastPositionMs": 300000,
            "playback_error": { "code": "E_STALL", "message": "buffer underrun" }
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::post()
        .uri(&format!("{}/complete", session_uri))
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::get()
        .uri(&session_uri)
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let session = &body["data"];
    assert_eq!(session["last_position_ms"], 300000);
    assert_eq!(session["duration_ms"], 600000);
    assert_eq!(session["is_completed"], true);
    assert!(session["completed_at"].is_string());
    assert_eq!(session["playback_errors"][0]["code"], "E_STALL");

    let request = test::TestRequest::get()
        .uri(&session_uri)
        .insert_header(harness.bearer_for(Uuid::new_v4(), Role::Member))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn negative_positions_are_rejected_with_the_error_envelope() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/playback/start")
        .insert_header(harness.bearer())
        .set_json(json!({
            "profile_id": Uuid::new_v4(),
            "title_id": Uuid::new_v4(),
            "duration_ms": -1
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("duration_ms must not be negative"));
}

#[actix_web::test]
async fn malformed_payloads_are_a_bad_request() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/playback/start")
        .insert_header(harness.bearer())
        .set_json(json!({ "title_id": "not-a-uuid" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::get()
        .uri("/api/v1/playback/not-a-uuid")
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_sessions_are_not_found() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/playback/{}/complete", Uuid::new_v4()))
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

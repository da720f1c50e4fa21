use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use vidstream::models::content::ContentType;

use crate::helpers::spawn_app;

#[actix_web::test]
async fn reporting_twice_keeps_a_single_entry() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let film = harness.publish(ContentType::Movie, "Film", &["Drama"], 0);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    for progress in [10.0, 50.0] {
        let request = test::TestRequest::post()
            .uri("/api/v1/progress/update")
            .insert_header(harness.bearer())
            .set_json(json!({
                "profileId": profile_id,
                "contentId": film.id,
                "contentType": "Movie",
                "episodeId": null,
                "progress": progress,
                "duration": 100.0
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/progress/history?profile_id={}", profile_id))
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["progress"], 50.0);
    assert_eq!(history[0]["duration"], 100.0);
}

#[actix_web::test]
async fn an_episode_on_a_movie_is_rejected() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let film = harness.publish(ContentType::Movie, "Film", &["Drama"], 0);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::post()
        .uri("/api/v1/progress/update")
        .insert_header(harness.bearer())
        .set_json(json!({
            "profile_id": profile_id,
            "content_id": film.id,
            "content_type": "Movie",
            "episode_id": uuid::Uuid::new_v4(),
            "progress": 1.0,
            "duration": 100.0
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn continue_watching_lists_the_latest_first() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let first = harness.publish(ContentType::Movie, "Watched First", &["Drama"], 0);
    let second = harness.publish(ContentType::Series, "Watched Second", &["Comedy"], 0);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    for item in [&first, &second] {
        let request = test::TestRequest::post()
            .uri("/api/v1/progress/update")
            .insert_header(harness.bearer())
            .set_json(json!({
                "profile_id": profile_id,
                "content_id": item.id,
                "content_type": item.content_type,
                "progress": 5.0,
                "duration": 60.0
            }))
            .to_request();
        test::call_service(&app, request).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let request = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/progress/continue-watching?profile_id={}&limit=1",
            profile_id
        ))
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["content"]["title"], "Watched Second");
}

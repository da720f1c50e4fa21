use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use uuid::Uuid;
use vidstream::core::jwt_auth::Role;
use vidstream::models::content::ContentType;

use crate::helpers::{spawn_app, titles};

#[actix_web::test]
async fn a_new_profile_is_recommended_trending_titles() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    harness.publish(ContentType::Movie, "Quiet", &["Drama"], 1);
    harness.publish(ContentType::Series, "Loud", &["Action"], 90);
    harness.publish(ContentType::Movie, "Middling", &["Comedy"], 40);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/recommendations?profile_id={}&limit=2", profile_id))
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(titles(&body), vec!["Loud", "Middling"]);
}

#[actix_web::test]
async fn neighbours_titles_are_recommended_before_trending() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let shared = harness.publish(ContentType::Movie, "Shared", &["Drama"], 5);
    let discovered = harness.publish(ContentType::Series, "Discovered", &["Drama"], 0);
    harness.publish(ContentType::Movie, "Popular", &["Action"], 100);

    let mine = harness.bearer();
    let neighbour = harness.bearer_for(Uuid::new_v4(), Role::Member);
    let mut profile_ids = Vec::new();
    for token in [&mine, &neighbour] {
        let request = test::TestRequest::post()
            .uri("/api/v1/profiles")
            .insert_header(token.clone())
            .set_json(json!({ "name": "Main" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        profile_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let reports = [
        (&mine, &profile_ids[0], &shared),
        (&neighbour, &profile_ids[1], &shared),
        (&neighbour, &profile_ids[1], &discovered),
    ];
    for (token, profile_id, item) in reports {
        let request = test::TestRequest::post()
            .uri("/api/v1/progress/update")
            .insert_header(token.clone())
            .set_json(json!({
                "profile_id": profile_id,
                "content_id": item.id,
                "content_type": item.content_type,
                "progress": 10.0,
                "duration": 100.0
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/recommendations?profile_id={}", profile_ids[0]))
        .insert_header(mine.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(titles(&body), vec!["Discovered", "Popular"]);
}

#[actix_web::test]
async fn related_content_prefers_the_watchlist() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let a = harness.publish(ContentType::Movie, "A", &["Horror"], 1);
    let b = harness.publish(ContentType::Series, "B", &["Drama"], 2);
    let c = harness.publish(ContentType::Movie, "C", &["Drama"], 3);
    harness.publish(ContentType::Movie, "D", &["Action"], 50);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    for item in [&a, &b] {
        let request = test::TestRequest::post()
            .uri(&format!("/api/v1/profiles/{}/my-list", profile_id))
            .insert_header(harness.bearer())
            .set_json(json!({ "content_id": item.id, "content_type": item.content_type }))
            .to_request();
        test::call_service(&app, request).await;
    }

    let request = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/content/{}/related?type=movie&profile_id={}&limit=3",
            c.id, profile_id
        ))
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(titles(&body), vec!["A", "B", "D"]);
}

#[actix_web::test]
async fn related_content_for_an_unknown_title_is_not_found() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/content/{}/related?type=Series&profile_id={}",
            Uuid::new_v4(),
            profile_id
        ))
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn trending_is_served_without_a_cache() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    harness.publish(ContentType::Movie, "Second", &["Drama"], 10);
    harness.publish(ContentType::Series, "First", &["Drama"], 20);

    let request = test::TestRequest::get()
        .uri("/api/v1/content/trending")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(titles(&body), vec!["First", "Second"]);
}

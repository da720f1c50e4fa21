use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use uuid::Uuid;
use vidstream::core::jwt_auth::Role;
use vidstream::models::content::ContentType;

use crate::helpers::{spawn_app, titles};

#[actix_web::test]
async fn requests_without_a_token_are_rejected() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::get().uri("/api/v1/profiles").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn an_account_is_limited_to_five_profiles() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    for name in ["Ada", "Bo", "Cy", "Di", "Ed"] {
        let request = test::TestRequest::post()
            .uri("/api/v1/profiles")
            .insert_header(harness.bearer())
            .set_json(json!({ "name": name }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Fay" }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = test::TestRequest::get()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
}

#[actix_web::test]
async fn invalid_profile_names_are_a_bad_request() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    for name in ["", "   ", "<script>"] {
        let request = test::TestRequest::post()
            .uri("/api/v1/profiles")
            .insert_header(harness.bearer())
            .set_json(json!({ "name": name }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "accepted {:?}", name);
    }
}

#[actix_web::test]
async fn profiles_of_other_accounts_are_hidden() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Mine" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::delete()
        .uri(&format!("/api/v1/profiles/{}", profile_id))
        .insert_header(harness.bearer_for(Uuid::new_v4(), Role::Member))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn my_list_round_trip() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let show = harness.publish(ContentType::Series, "Long Show", &["Drama"], 3);
    let film = harness.publish(ContentType::Movie, "Short Film", &["Drama"], 5);

    let request = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .insert_header(harness.bearer())
        .set_json(json!({ "name": "Main" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();
    let list_uri = format!("/api/v1/profiles/{}/my-list", profile_id);

    for item in [&show, &film] {
        let request = test::TestRequest::post()
            .uri(&list_uri)
            .insert_header(harness.bearer())
            .set_json(json!({ "content_id": item.id, "content_type": item.content_type }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let request = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(titles(&body), vec!["Long Show", "Short Film"]);

    let request = test::TestRequest::delete()
        .uri(&format!("{}/{}", list_uri, show.id))
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header(harness.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(titles(&body), vec!["Short Film"]);
}

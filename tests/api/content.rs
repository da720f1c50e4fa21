use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::Value;
use uuid::Uuid;
use vidstream::core::jwt_auth::Role;
use vidstream::models::content::ContentType;

use crate::helpers::spawn_app;

#[actix_web::test]
async fn viewing_content_counts_the_view() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let film = harness.publish(ContentType::Movie, "Film", &["Drama"], 0);

    for expected in [1, 2] {
        let request = test::TestRequest::get()
            .uri(&format!("/api/v1/content/{}?type=Movie", film.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["data"]["view_count"], expected);
    }

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/content/{}?type=Series", film.id))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_admins_can_delete_content() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;
    let show = harness.publish(ContentType::Series, "Show", &["Drama"], 0);
    let uri = format!("/api/v1/content/{}?type=series", show.id);

    let request = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(harness.bearer())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(harness.bearer_for(Uuid::new_v4(), Role::Admin))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::get().uri(&uri).to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

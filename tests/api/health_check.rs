use actix_web::{test, App};

use crate::helpers::spawn_app;

#[actix_web::test]
async fn health_check_works() {
    let harness = spawn_app();
    let app = test::init_service(App::new().configure(|c| harness.configure(c))).await;

    let request = test::TestRequest::get()
        .uri("/api/v1/health_check")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert!(response.status().is_success());
}

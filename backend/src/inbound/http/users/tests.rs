//! Tests for users API handlers.

use super::*;
use crate::inbound::http::test_utils::{bearer, test_app};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn credentials(username: &str, password: &str) -> Value {
    json!({ "username": username, "password": password })
}

#[rstest]
#[actix_web::test]
async fn registered_users_can_obtain_a_token() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(credentials("ada", "secret"))
        .to_request();
    let created: UserIdBody = actix_test::call_and_read_body_json(&app, request).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/token")
        .set_json(credentials("ada", "secret"))
        .to_request();
    let token: TokenBody = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(token.user_id, created.user_id);

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header((AUTHORIZATION, format!("Bearer {}", token.access_token)))
        .to_request();
    let users: Vec<UserBody> = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(
        users,
        vec![UserBody {
            user_id: created.user_id,
            username: "ada".into(),
        }]
    );
}

#[rstest]
#[case("ada", "wrong")]
#[case("nobody", "secret")]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] username: &str, #[case] password: &str) {
    let app = actix_test::init_service(test_app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(credentials("ada", "secret"))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::OK
    );

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users/token")
        .set_json(credentials(username, password))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn mismatched_confirmation_is_rejected() {
    let app = actix_test::init_service(test_app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(credentials("ada", "secret"))
        .to_request();
    let created: UserIdBody = actix_test::call_and_read_body_json(&app, request).await;

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/v1/users/{}/password", created.user_id))
        .insert_header(bearer())
        .set_json(json!({ "password": "one", "confirmPassword": "two" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["details"]["failures"],
        json!([{ "rule": "matches", "field": "confirmPassword" }])
    );
}

#[rstest]
#[actix_web::test]
async fn renaming_and_removing_a_user() {
    let app = actix_test::init_service(test_app()).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(credentials("ada", "secret"))
        .to_request();
    let created: UserIdBody = actix_test::call_and_read_body_json(&app, request).await;
    let uri = format!("/api/v1/users/{}", created.user_id);

    let request = actix_test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer())
        .set_json(json!({ "username": "lovelace" }))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::OK
    );

    let request = actix_test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer())
        .to_request();
    let user: UserBody = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(user.username, "lovelace");

    for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
        let request = actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer())
            .to_request();
        assert_eq!(actix_test::call_service(&app, request).await.status(), expected);
    }
}

#[rstest]
#[actix_web::test]
async fn listing_requires_a_token() {
    let app = actix_test::init_service(test_app()).await;
    let request = actix_test::TestRequest::get().uri("/api/v1/users").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use juicebox_core::ports::TokenService;
use juicebox_infra::JwtTokenService;

use super::configure_routes;
use crate::test_support::{test_jwt, test_state};

/// Bearer header for a token signed with the app's key but minted outside it.
fn bearer_for(user_id: Uuid, expiration_hours: i64) -> String {
    let token = JwtTokenService::new(test_jwt(expiration_hours))
        .generate_token(user_id, "ghost")
        .unwrap();
    format!("Bearer {token}")
}

macro_rules! init_app {
    () => {{
        let state = test_state().await;
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await
    }};
}

/// Register a user and return their bearer header value.
macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(json!({
                "username": $username,
                "password": "bertie99",
                "name": "Al Bert",
                "location": "Sidney, Australia"
            }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        format!("Bearer {}", body["data"]["access_token"].as_str().unwrap())
    }};
}

macro_rules! create_post {
    ($app:expr, $auth:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((header::AUTHORIZATION, $auth.as_str()))
            .set_json($body)
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        body["data"].clone()
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_register_and_login() {
    let app = init_app!();
    register!(app, "albert");

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({"username": "albert", "password": "bertie99"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 3600);

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({"username": "albert", "password": "wrong-password"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "IncorrectCredentialsError");

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({"username": "nobody", "password": "bertie99"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "IncorrectCredentialsError");
}

#[actix_web::test]
async fn test_register_rejects_duplicates_and_short_passwords() {
    let app = init_app!();
    register!(app, "albert");

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({"username": "albert", "password": "another-one"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "UserExistsError");

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({"username": "sandra", "password": "short"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "ValidationError");
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "BadRequestError");
}

#[actix_web::test]
async fn test_authorization_header_must_be_bearer() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, "Token abc"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "AuthorizationHeaderError");
    assert_eq!(body["detail"], "Authorization token must start with Bearer ");
}

#[actix_web::test]
async fn test_invalid_token_is_rejected() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "AuthenticationError");
}

#[actix_web::test]
async fn test_missing_header_proceeds_unauthenticated() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "MissingUserError");
    assert_eq!(body["detail"], "You must be logged in to perform this action");
}

#[actix_web::test]
async fn test_create_post_hydrates_tags_and_author() {
    let app = init_app!();
    let albert = register!(app, "albert");

    let post = create_post!(
        app,
        albert,
        json!({"title": "First", "content": "Hello", "tags": " happy  sad happy "})
    );

    assert_eq!(post["author"]["username"], "albert");
    assert!(post.get("author_id").is_none());
    assert!(post["author"].get("password").is_none());
    let mut tags: Vec<&str> = post["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    tags.sort_unstable();
    assert_eq!(tags, vec!["happy", "sad"]);

    let req = test::TestRequest::get().uri("/api/tags/happy/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/tags/missing/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/tags").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_inactive_posts_are_visible_only_to_author() {
    let app = init_app!();
    let albert = register!(app, "albert");
    let post = create_post!(
        app,
        albert,
        json!({"title": "Secret", "content": "Shh", "tags": ["quiet"]})
    );
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, albert.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["active"], false);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, albert.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/tags/quiet/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri(&uri).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "PostNotFoundError");
}

#[actix_web::test]
async fn test_only_owner_may_update_post() {
    let app = init_app!();
    let albert = register!(app, "albert");
    let sandra = register!(app, "sandra");
    let post = create_post!(app, albert, json!({"title": "Mine", "content": "C"}));
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, sandra.as_str()))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "UnauthorizedUserError");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, sandra.as_str()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_update_post_tags_only() {
    let app = init_app!();
    let albert = register!(app, "albert");
    let post = create_post!(
        app,
        albert,
        json!({"title": "T", "content": "C", "tags": ["happy", "sad"]})
    );
    let uri = format!("/api/posts/{}", post["id"].as_str().unwrap());

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, albert.as_str()))
        .set_json(json!({"tags": ["sad", "new"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let updated = &body["data"];
    assert_eq!(updated["title"], "T");
    assert_eq!(updated["content"], "C");
    let tags: Vec<&str> = updated["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["new", "sad"]);
}

#[actix_web::test]
async fn test_invalid_post_id_is_bad_request() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/posts/not-a-uuid").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_current_user_profile() {
    let app = init_app!();
    let albert = register!(app, "albert");
    create_post!(app, albert, json!({"title": "T", "content": "C"}));

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header((header::AUTHORIZATION, albert.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "albert");
    assert!(body["data"].get("password").is_none());
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::patch()
        .uri("/api/users/me")
        .insert_header((header::AUTHORIZATION, albert.as_str()))
        .set_json(json!({"location": "Melbourne"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["location"], "Melbourne");
    assert_eq!(body["data"]["name"], "Al Bert");

    let req = test::TestRequest::get().uri("/api/users").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    let app = init_app!();
    let expired = bearer_for(Uuid::new_v4(), -1);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, expired.as_str()))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "TokenExpiredError");
}

#[actix_web::test]
async fn test_token_for_deleted_user_proceeds_anonymously() {
    let app = init_app!();
    let ghost = bearer_for(Uuid::new_v4(), 1);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, ghost.as_str()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, ghost.as_str()))
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "MissingUserError");
}

#[actix_web::test]
async fn test_unknown_api_route_is_not_found() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/comments").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "NotFoundError");
    assert_eq!(body["detail"], "No route for GET /api/comments");
}

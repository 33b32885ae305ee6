//! Client tests against a stub API server.

use std::sync::Arc;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use blog_shared::dto::{
    AuthorResponse, BlogResponse, CreateBlogRequest, SignInRequest, SignUpRequest, UserResponse,
};
use blog_shared::{ApiResponse, ErrorResponse, TokenTriple};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::presentation::{Feed, LOAD_FAILED, PUBLISH_FAILED, Publish};
use crate::{BlogClient, ClientError, FileSessionStore, MemorySessionStore, Session, SessionStore};

const PASSWORD: &str = "password123";
const TOKEN: &str = "tok-1";

fn user(email: &str) -> UserResponse {
    UserResponse {
        id: Uuid::nil(),
        email: email.to_string(),
        name: Some("alice".to_string()),
        image: None,
        created_at: Utc.with_ymd_and_hms(2024, 11, 6, 0, 0, 0).unwrap(),
    }
}

fn blog(content: &str, minute: u32) -> BlogResponse {
    let at = Utc.with_ymd_and_hms(2024, 11, 6, 12, minute, 0).unwrap();
    BlogResponse {
        id: Uuid::new_v4(),
        content: content.to_string(),
        user: Some(AuthorResponse {
            id: Uuid::nil(),
            name: "alice".to_string(),
        }),
        created_at: at,
        updated_at: at,
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn signed_in(req: &HttpRequest) -> bool {
    header(req, "access-token") == Some(TOKEN)
        && header(req, "client").is_some()
        && header(req, "uid").is_some()
}

fn token_response(mut builder: actix_web::HttpResponseBuilder, email: &str) -> HttpResponse {
    builder
        .insert_header(("access-token", TOKEN))
        .insert_header(("client", "cli-1"))
        .insert_header(("uid", email.to_string()))
        .insert_header(("token-type", "Bearer"))
        .json(ApiResponse::ok(user(email)))
}

async fn stub_sign_up(body: web::Json<SignUpRequest>) -> HttpResponse {
    if body.password != body.password_confirmation {
        let errors = BTreeMap::from([(
            "password_confirmation".to_string(),
            vec!["doesn't match Password".to_string()],
        )]);
        return HttpResponse::UnprocessableEntity().json(ErrorResponse::unprocessable(errors));
    }
    token_response(HttpResponse::Created(), &body.email)
}

async fn stub_sign_in(body: web::Json<SignInRequest>) -> HttpResponse {
    if body.password != PASSWORD {
        return HttpResponse::Unauthorized().json(ErrorResponse::unauthorized());
    }
    token_response(HttpResponse::Ok(), &body.email)
}

async fn stub_sign_out(req: HttpRequest) -> HttpResponse {
    if header(&req, "client") == Some("broken") {
        return HttpResponse::InternalServerError().json(ErrorResponse::internal_error());
    }
    if !signed_in(&req) {
        return HttpResponse::NotFound()
            .json(ErrorResponse::not_found("User was not found or was not logged in."));
    }
    HttpResponse::Ok().json(ApiResponse::done("Signed out successfully."))
}

async fn stub_validate(req: HttpRequest) -> HttpResponse {
    if !signed_in(&req) {
        return HttpResponse::Unauthorized().json(ErrorResponse::unauthorized());
    }
    let uid = header(&req, "uid").unwrap_or_default();
    HttpResponse::Ok().json(ApiResponse::ok(user(uid)))
}

async fn stub_list(req: HttpRequest) -> HttpResponse {
    if !signed_in(&req) {
        return HttpResponse::Unauthorized().json(ErrorResponse::unauthorized());
    }
    HttpResponse::Ok().json(vec![blog("b", 2), blog("a", 1)])
}

async fn stub_create(req: HttpRequest, body: web::Json<CreateBlogRequest>) -> HttpResponse {
    if !signed_in(&req) {
        return HttpResponse::Unauthorized().json(ErrorResponse::unauthorized());
    }
    let content = body
        .into_inner()
        .blog
        .and_then(|b| b.content)
        .unwrap_or_default();
    if content.trim().is_empty() {
        let errors = BTreeMap::from([("content".to_string(), vec!["can't be blank".to_string()])]);
        return HttpResponse::UnprocessableEntity().json(ErrorResponse::unprocessable(errors));
    }
    if content == "explode" {
        return HttpResponse::InternalServerError().json(ErrorResponse::internal_error());
    }
    HttpResponse::Created().json(blog(&content, 3))
}

/// Start the stub API on an ephemeral port and return its base URL.
fn start_stub() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route("/auth", web::post().to(stub_sign_up))
            .route("/auth/sign_in", web::post().to(stub_sign_in))
            .route("/auth/sign_out", web::delete().to(stub_sign_out))
            .route("/auth/validate_token", web::get().to(stub_validate))
            .route("/api/blogs", web::get().to(stub_list))
            .route("/api/blogs", web::post().to(stub_create))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    format!("http://{addr}")
}

fn client_with(base_url: &str) -> (BlogClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let client = BlogClient::new(base_url, store.clone()).unwrap();
    (client, store)
}

fn store_triple(store: &MemorySessionStore, triple: TokenTriple) {
    store.save(&Session::new(triple, None)).unwrap();
}

#[actix_rt::test]
async fn test_login_stores_triple_and_attaches_it() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    assert!(matches!(
        client.list_blogs().await,
        Err(ClientError::Unauthorized)
    ));
    assert!(!client.is_logged_in());

    let user = client.login("alice@example.com", PASSWORD).await.unwrap();
    assert_eq!(user.email, "alice@example.com");

    let session = store.load().unwrap().unwrap();
    assert_eq!(
        session.triple,
        TokenTriple::new(TOKEN, "cli-1", "alice@example.com")
    );
    assert_eq!(session.user, Some(user));
    assert!(client.is_logged_in());

    let blogs = client.list_blogs().await.unwrap();
    let contents: Vec<_> = blogs.iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, vec!["b", "a"]);
}

#[actix_rt::test]
async fn test_failed_login_stores_nothing() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    let result = client.login("alice@example.com", "wrong-password").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert!(store.load().unwrap().is_none());
}

#[actix_rt::test]
async fn test_signup_signs_in_and_maps_validation_errors() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    let mut request = SignUpRequest {
        email: "bob@example.com".to_string(),
        password: PASSWORD.to_string(),
        password_confirmation: "different1".to_string(),
        name: Some("bob".to_string()),
    };
    match client.signup(&request).await {
        Err(ClientError::Validation(errors)) => {
            assert_eq!(errors["password_confirmation"], vec!["doesn't match Password"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.load().unwrap().is_none());

    request.password_confirmation = PASSWORD.to_string();
    client.signup(&request).await.unwrap();
    assert_eq!(store.load().unwrap().unwrap().triple.uid, "bob@example.com");
}

#[actix_rt::test]
async fn test_incomplete_triple_is_not_attached() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    store_triple(&store, TokenTriple::new(TOKEN, "", "alice@example.com"));
    assert!(matches!(
        client.list_blogs().await,
        Err(ClientError::Unauthorized)
    ));
}

#[actix_rt::test]
async fn test_rejected_triple_is_cleared_by_blog_calls() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    store_triple(&store, TokenTriple::new("stale", "cli-1", "alice@example.com"));
    assert!(client.is_logged_in());
    assert!(matches!(
        client.list_blogs().await,
        Err(ClientError::Unauthorized)
    ));
    assert!(store.load().unwrap().is_none());
    assert!(!client.is_logged_in());

    store_triple(&store, TokenTriple::new("stale", "cli-1", "alice@example.com"));
    let mut feed = Feed::new();
    let result = feed.publish(&client, "hello").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(feed.take_notice().as_deref(), Some(PUBLISH_FAILED));
    assert!(store.load().unwrap().is_none());
}

#[actix_rt::test]
async fn test_failed_login_keeps_the_current_session() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    store_triple(&store, TokenTriple::new(TOKEN, "cli-1", "alice@example.com"));
    let result = client.login("alice@example.com", "wrong-password").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(store.load().unwrap().unwrap().triple.access_token, TOKEN);
}

#[actix_rt::test]
async fn test_logout_clears_even_when_server_fails() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    store_triple(&store, TokenTriple::new(TOKEN, "broken", "alice@example.com"));
    let result = client.logout().await;
    assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
    assert!(store.load().unwrap().is_none());

    store_triple(&store, TokenTriple::new(TOKEN, "cli-1", "alice@example.com"));
    client.logout().await.unwrap();
    assert!(store.load().unwrap().is_none());
}

#[actix_rt::test]
async fn test_validate_token() {
    let base = start_stub();
    let (client, store) = client_with(&base);

    // Nothing stored: no call, logged out.
    assert_eq!(client.validate_token().await.unwrap(), None);

    store_triple(&store, TokenTriple::new(TOKEN, "cli-1", "alice@example.com"));
    let user = client.validate_token().await.unwrap().unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(store.load().unwrap().unwrap().user, Some(user));

    store_triple(&store, TokenTriple::new("stale", "cli-1", "alice@example.com"));
    assert_eq!(client.validate_token().await.unwrap(), None);
    assert!(store.load().unwrap().is_none());
}

#[actix_rt::test]
async fn test_feed_publish_and_notices() {
    let base = start_stub();
    let (client, store) = client_with(&base);
    let mut feed = Feed::new();

    // Not signed in yet: loading fails with a notice.
    assert!(feed.refresh(&client).await.is_err());
    assert_eq!(feed.take_notice().as_deref(), Some(LOAD_FAILED));
    assert!(feed.take_notice().is_none());

    store_triple(&store, TokenTriple::new(TOKEN, "cli-1", "alice@example.com"));
    feed.refresh(&client).await.unwrap();
    assert_eq!(feed.posts().len(), 2);

    assert_eq!(
        feed.publish(&client, "   ").await.unwrap(),
        Publish::RejectedBlank
    );
    assert_eq!(feed.posts().len(), 2);

    let Publish::Posted(posted) = feed.publish(&client, "hello").await.unwrap() else {
        panic!("expected the post to be published");
    };
    assert_eq!(posted.content, "hello");
    assert_eq!(feed.posts()[0], posted);
    assert_eq!(feed.posts().len(), 3);

    let result = feed.publish(&client, "explode").await;
    assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
    assert_eq!(feed.take_notice().as_deref(), Some(PUBLISH_FAILED));
    assert_eq!(feed.posts().len(), 3);
}

#[actix_rt::test]
async fn test_server_side_validation_is_mapped() {
    let base = start_stub();
    let (client, store) = client_with(&base);
    store_triple(&store, TokenTriple::new(TOKEN, "cli-1", "alice@example.com"));

    match client.create_blog("").await {
        Err(ClientError::Validation(errors)) => {
            assert_eq!(errors["content"], vec!["can't be blank"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[actix_rt::test]
async fn test_network_failure() {
    // Nothing listens on port 9 of the loopback interface.
    let (client, _store) = client_with("http://127.0.0.1:9");
    let mut feed = Feed::new();

    let result = feed.refresh(&client).await;
    assert!(matches!(result, Err(ClientError::Network(_))));
    assert_eq!(feed.take_notice().as_deref(), Some(LOAD_FAILED));
}

#[actix_rt::test]
async fn test_file_session_survives_a_new_client() {
    let base = start_stub();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = BlogClient::new(&base, Arc::new(FileSessionStore::new(&path))).unwrap();
    first.login("alice@example.com", PASSWORD).await.unwrap();

    let second = BlogClient::new(&base, Arc::new(FileSessionStore::new(&path))).unwrap();
    assert!(second.is_logged_in());
    assert_eq!(second.list_blogs().await.unwrap().len(), 2);

    second.logout().await.unwrap();
    assert!(!path.exists());
}

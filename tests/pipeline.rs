//! End-to-end tests for the assembled middleware chain, driven without a
//! socket: build a `Pipeline`, hand it `Request` values, inspect `Response`
//! values. This is exactly what the server's dispatch does per request.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::header::{HeaderValue, AUTHORIZATION};
use http::{HeaderMap, Method, StatusCode};
use secrecy::SecretString;

use gatehouse::registry::{InMemoryUsers, UserStore};
use gatehouse::{
    users, BearerAuth, ErrorBoundary, Fault, Pipeline, Request, RequestLog, Response, Router,
};

const TOKEN: &str = "supersecret-token-12345";

fn secret() -> SecretString {
    SecretString::from(TOKEN.to_owned())
}

/// The standard three-stage chain around an arbitrary route table.
fn pipeline(router: Router) -> Pipeline {
    Pipeline::new(router)
        .layer(ErrorBoundary)
        .layer(RequestLog)
        .layer(BearerAuth::new(secret()))
}

fn request(method: Method, path: &str, auth: Option<&str>, body: &[u8]) -> Request {
    let mut headers = HeaderMap::new();
    if let Some(value) = auth {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    }
    Request::new(method, path, headers, body.to_vec(), "127.0.0.1:4000".parse().unwrap())
}

/// A route table with one protected endpoint and a hit counter, for
/// verifying whether the handler behind the auth stage was ever invoked.
fn spy_router(hits: &Arc<AtomicUsize>) -> Router {
    let hits = Arc::clone(hits);
    Router::new().on(Method::POST, "/api/widgets", move |_req| {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Response::text("made")
        }
    })
}

#[tokio::test]
async fn exempted_path_needs_no_credential() {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let router = Router::new().on(Method::GET, "/api/users", move |_req| {
        let h = Arc::clone(&h);
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            Response::text("listed")
        }
    });

    let resp = pipeline(router)
        .handle(request(Method::GET, "/api/users", None, b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(resp.body(), b"listed");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_header_is_401_and_handler_is_never_called() {
    let hits = Arc::new(AtomicUsize::new(0));
    let resp = pipeline(spy_router(&hits))
        .handle(request(Method::POST, "/api/widgets", None, b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body(), b"Missing or invalid Authorization header.");
    assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_scheme_is_401_with_scheme_message() {
    let hits = Arc::new(AtomicUsize::new(0));
    let resp = pipeline(spy_router(&hits))
        .handle(request(Method::POST, "/api/widgets", Some("Basic dXNlcg=="), b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body(), b"Authorization scheme must be Bearer.");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_token_is_401_and_handler_is_never_called() {
    let hits = Arc::new(AtomicUsize::new(0));
    let resp = pipeline(spy_router(&hits))
        .handle(request(Method::POST, "/api/widgets", Some("Bearer wrong-token"), b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body(), b"Invalid or expired token.");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let resp = pipeline(spy_router(&hits))
        .handle(request(
            Method::POST,
            "/api/widgets",
            Some(&format!("Bearer {TOKEN}")),
            b"",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn not_found_fault_becomes_404_problem() {
    let router = Router::new().on(Method::GET, "/api/users/{id}", |_req| async {
        Err::<Response, Fault>(Fault::NotFound)
    });

    let resp = pipeline(router)
        .handle(request(Method::GET, "/api/users/999", None, b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(resp.header("content-type"), Some("application/problem+json"));

    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Not Found");
    assert_eq!(body["detail"], "The requested resource was not found.");
    assert_eq!(body["instance"], "/api/users/999");
}

#[tokio::test]
async fn logging_stage_never_alters_response_bytes() {
    let router = Router::new().on(Method::GET, "/api/users/hello", |_req| async {
        Response::text("hello")
    });

    let resp = pipeline(router)
        .handle(request(Method::GET, "/api/users/hello", None, b""))
        .await
        .unwrap();

    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(resp.body(), b"hello");
}

#[tokio::test]
async fn identical_exempted_reads_get_identical_responses() {
    let router = Router::new().on(Method::GET, "/api/users", |_req| async {
        Response::json(br#"[{"id":1}]"#.to_vec())
    });
    let chain = pipeline(router);

    let first = chain
        .handle(request(Method::GET, "/api/users", None, b""))
        .await
        .unwrap();
    let second = chain
        .handle(request(Method::GET, "/api/users", None, b""))
        .await
        .unwrap();

    assert_eq!(first.status_code(), second.status_code());
    assert_eq!(first.body(), second.body());
    assert_eq!(first.headers(), second.headers());
}

// ── Full service scenario: the real user routes behind the real chain ─────────

#[tokio::test]
async fn user_api_scenario() {
    let store: Arc<dyn UserStore> = Arc::new(InMemoryUsers::seeded());
    let chain = pipeline(users::routes(Arc::clone(&store)));

    // Unauthenticated create is refused before the handler runs.
    let resp = chain
        .handle(request(
            Method::POST,
            "/api/users",
            None,
            br#"{"name":"A","email":"a@x.com","department":"IT"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.list().unwrap().len(), 2);

    // Authenticated create succeeds.
    let resp = chain
        .handle(request(
            Method::POST,
            "/api/users",
            Some(&format!("Bearer {TOKEN}")),
            br#"{"name":"A","email":"a@x.com","department":"IT"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status_code(), StatusCode::CREATED);
    assert_eq!(resp.header("location"), Some("/api/users/3"));

    // Reading a missing user yields the uniform 404 problem body.
    let resp = chain
        .handle(request(Method::GET, "/api/users/999", None, b""))
        .await
        .unwrap();
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["title"], "Not Found");

    // Invalid payloads surface the validation message.
    let resp = chain
        .handle(request(
            Method::POST,
            "/api/users",
            Some(&format!("Bearer {TOKEN}")),
            br#"{"name":"B","email":"not-an-email","department":"IT"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["title"], "Validation Error");
    assert_eq!(body["detail"], "email must be a valid email address");
}

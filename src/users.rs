//! User CRUD endpoints.
//!
//! Handlers raise [`Fault`]s with `?` and let the pipeline's error boundary
//! shape them for the client; nothing here writes an error body by hand.

use std::future::Future;
use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Fault, Outcome};
use crate::registry::{NewUser, UserPatch, UserStore};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// Builds the route table for the user API.
///
/// ```text
/// GET    /api/users         list
/// GET    /api/users/{id}    fetch one
/// POST   /api/users         create           (requires bearer token)
/// PUT    /api/users/{id}    partial update   (requires bearer token)
/// DELETE /api/users/{id}    delete           (requires bearer token)
/// ```
///
/// Which of these require a token is decided by the auth stage's policy, not
/// here — handlers stay oblivious to authentication.
pub fn routes(store: Arc<dyn UserStore>) -> Router {
    Router::new()
        .on(Method::GET, "/api/users", with_store(Arc::clone(&store), list_users))
        .on(Method::GET, "/api/users/{id}", with_store(Arc::clone(&store), get_user))
        .on(Method::POST, "/api/users", with_store(Arc::clone(&store), create_user))
        .on(Method::PUT, "/api/users/{id}", with_store(Arc::clone(&store), update_user))
        .on(Method::DELETE, "/api/users/{id}", with_store(store, delete_user))
}

/// Adapts a `(store, request)` handler to the `Fn(Request)` shape the router
/// stores, capturing one shared registry handle per route.
fn with_store<F, Fut>(store: Arc<dyn UserStore>, handler: F) -> impl Fn(Request) -> Fut
where
    F: Fn(Arc<dyn UserStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    move |req| handler(Arc::clone(&store), req)
}

async fn list_users(store: Arc<dyn UserStore>, _req: Request) -> Outcome {
    let users = store.list()?;
    info!(count = users.len(), "returning users");
    Ok(Response::json(to_json(&users)?))
}

async fn get_user(store: Arc<dyn UserStore>, req: Request) -> Outcome {
    let id = id_param(&req)?;
    let user = store.get(id).inspect_err(|_| warn!(id, "user not found"))?;
    Ok(Response::json(to_json(&user)?))
}

async fn create_user(store: Arc<dyn UserStore>, req: Request) -> Outcome {
    let new: NewUser = serde_json::from_slice(req.body()).map_err(|_| Fault::InvalidArgument)?;
    let user = store.create(new)?;

    info!(id = user.id, name = %user.name, email = %user.email, "created user");

    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", &format!("/api/users/{}", user.id))
        .json(to_json(&user)?))
}

async fn update_user(store: Arc<dyn UserStore>, req: Request) -> Outcome {
    let id = id_param(&req)?;
    let patch: UserPatch = serde_json::from_slice(req.body()).map_err(|_| Fault::InvalidArgument)?;

    let user = store
        .update(id, patch)
        .inspect_err(|_| warn!(id, "update failed"))?;

    info!(id, name = %user.name, department = %user.department, "updated user");
    Ok(Response::status(StatusCode::NO_CONTENT))
}

async fn delete_user(store: Arc<dyn UserStore>, req: Request) -> Outcome {
    let id = id_param(&req)?;
    let user = store
        .delete(id)
        .inspect_err(|_| warn!(id, "delete failed"))?;

    info!(id, name = %user.name, "deleted user");
    Ok(Response::status(StatusCode::NO_CONTENT))
}

/// The `{id}` route parameter as a number; anything else is a client error.
fn id_param(req: &Request) -> Result<u32, Fault> {
    req.param("id")
        .and_then(|raw| raw.parse().ok())
        .ok_or(Fault::InvalidArgument)
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Fault> {
    serde_json::to_vec(value).map_err(Fault::internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryUsers;
    use http::HeaderMap;

    fn store() -> Arc<dyn UserStore> {
        Arc::new(InMemoryUsers::seeded())
    }

    fn request(method: Method, path: &str, body: &[u8]) -> Request {
        Request::new(
            method,
            path,
            HeaderMap::new(),
            body.to_vec(),
            "127.0.0.1:5000".parse().unwrap(),
        )
    }

    async fn run(store: Arc<dyn UserStore>, req: Request) -> Outcome {
        crate::middleware::Pipeline::new(routes(store)).handle(req).await
    }

    #[tokio::test]
    async fn list_returns_seeded_users() {
        let resp = run(store(), request(Method::GET, "/api/users", b"")).await.unwrap();
        assert_eq!(resp.status_code(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["name"], "John Doe");
    }

    #[tokio::test]
    async fn get_by_id_returns_the_user() {
        let resp = run(store(), request(Method::GET, "/api/users/2", b"")).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["email"], "jane.smith@techhive.com");
    }

    #[tokio::test]
    async fn non_numeric_id_is_invalid_argument() {
        let outcome = run(store(), request(Method::GET, "/api/users/abc", b"")).await;
        assert!(matches!(outcome, Err(Fault::InvalidArgument)));
    }

    #[tokio::test]
    async fn create_returns_201_with_location() {
        let body = br#"{"name":"A","email":"a@x.com","department":"IT"}"#;
        let resp = run(store(), request(Method::POST, "/api/users", body)).await.unwrap();

        assert_eq!(resp.status_code(), StatusCode::CREATED);
        assert_eq!(resp.header("location"), Some("/api/users/3"));

        let created: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(created["id"], 3);
        assert_eq!(created["name"], "A");
    }

    #[tokio::test]
    async fn create_with_malformed_body_is_invalid_argument() {
        let outcome = run(store(), request(Method::POST, "/api/users", b"{not json")).await;
        assert!(matches!(outcome, Err(Fault::InvalidArgument)));
    }

    #[tokio::test]
    async fn update_returns_204_and_applies_patch() {
        let s = store();
        let body = br#"{"department":"Security"}"#;
        let resp = run(Arc::clone(&s), request(Method::PUT, "/api/users/1", body))
            .await
            .unwrap();

        assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
        assert!(resp.body().is_empty());
        assert_eq!(s.get(1).unwrap().department, "Security");
    }

    #[tokio::test]
    async fn delete_returns_204() {
        let s = store();
        let resp = run(Arc::clone(&s), request(Method::DELETE, "/api/users/2", b""))
            .await
            .unwrap();

        assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
        assert!(matches!(s.get(2), Err(Fault::NotFound)));
    }
}

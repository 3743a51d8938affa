//! Problem responses: the uniform error payload returned to clients.
//!
//! Every failure that escapes a handler is rendered as the same four-field
//! JSON document, content-type `application/problem+json`:
//!
//! ```json
//! { "status": 404, "title": "Not Found", "detail": "The requested resource was not found.", "instance": "/api/users/999" }
//! ```
//!
//! Client-input failures carry actionable detail; unclassified internal
//! failures get a deliberately generic detail so nothing about the server's
//! insides leaks to the caller.

use http::StatusCode;
use serde::Serialize;

use crate::error::Fault;
use crate::response::Response;

/// The normalized error payload.
///
/// Constructed fresh per failed request by [`Problem::classify`] and never
/// persisted. `instance` is the path of the request that failed.
#[derive(Debug, Serialize)]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub instance: String,
}

impl Problem {
    /// Maps a [`Fault`] to its client-visible description.
    ///
    /// Total over the taxonomy: every variant has an arm and the default arm
    /// is a generic 500, so this can never fail to produce a description.
    pub fn classify(fault: &Fault, instance: &str) -> Self {
        let (status, title, detail) = match fault {
            Fault::InvalidArgument => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                "Invalid request parameters.".to_owned(),
            ),
            Fault::NotFound => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested resource was not found.".to_owned(),
            ),
            Fault::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication is required.".to_owned(),
            ),
            Fault::Validation(message) => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                message.clone(),
            ),
            Fault::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
                "We're sorry — something went wrong on our end.".to_owned(),
            ),
        };

        Self {
            status: status.as_u16(),
            title: title.to_owned(),
            detail,
            instance: instance.to_owned(),
        }
    }

    /// Renders the problem as an HTTP response.
    ///
    /// Serialization of this struct cannot fail short of allocation failure;
    /// this sits on the last-line-of-defense path, so a failure here is fatal
    /// rather than re-caught.
    pub fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).expect("problem status out of range");
        let body = serde_json::to_vec(&self).expect("problem body serialization");

        Response::builder().status(status).problem_json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_maps_to_400() {
        let p = Problem::classify(&Fault::InvalidArgument, "/api/users/abc");
        assert_eq!(p.status, 400);
        assert_eq!(p.title, "Bad Request");
        assert_eq!(p.detail, "Invalid request parameters.");
        assert_eq!(p.instance, "/api/users/abc");
    }

    #[test]
    fn not_found_maps_to_404() {
        let p = Problem::classify(&Fault::NotFound, "/api/users/999");
        assert_eq!(p.status, 404);
        assert_eq!(p.title, "Not Found");
        assert_eq!(p.detail, "The requested resource was not found.");
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let p = Problem::classify(&Fault::Unauthorized, "/api/users");
        assert_eq!(p.status, 401);
        assert_eq!(p.title, "Unauthorized");
        assert_eq!(p.detail, "Authentication is required.");
    }

    #[test]
    fn validation_carries_its_message() {
        let fault = Fault::Validation("email must be a valid email address".to_owned());
        let p = Problem::classify(&fault, "/api/users");
        assert_eq!(p.status, 400);
        assert_eq!(p.title, "Validation Error");
        assert_eq!(p.detail, "email must be a valid email address");
    }

    #[test]
    fn everything_else_maps_to_generic_500() {
        let p = Problem::classify(&Fault::Internal("registry lock poisoned".to_owned()), "/");
        assert_eq!(p.status, 500);
        assert_eq!(p.title, "An unexpected error occurred");
        assert_eq!(p.detail, "We're sorry — something went wrong on our end.");
    }

    #[test]
    fn response_has_problem_content_type() {
        let resp = Problem::classify(&Fault::NotFound, "/api/users/7").into_response();
        assert_eq!(resp.status_code().as_u16(), 404);
        assert_eq!(resp.header("content-type"), Some("application/problem+json"));

        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["instance"], "/api/users/7");
    }
}

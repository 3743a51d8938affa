//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use http::{HeaderMap, Method};

/// An incoming HTTP request.
///
/// Method and path are fixed once the request enters the pipeline; stages may
/// observe them but never rewrite them. The authentication stage may attach a
/// principal marker for downstream handlers via [`Request::set_principal`].
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Vec<u8>,
    remote: SocketAddr,
    params: HashMap<String, String>,
    principal: Option<&'static str>,
}

impl Request {
    /// Builds a request from its parts.
    ///
    /// The server constructs one per incoming HTTP request; embedders and
    /// tests construct them directly to drive a [`Pipeline`](crate::Pipeline)
    /// without a socket.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        body: Vec<u8>,
        remote: SocketAddr,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            remote,
            params: HashMap::new(),
            principal: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Remote origin of the connection this request arrived on.
    pub fn remote(&self) -> SocketAddr {
        self.remote
    }

    /// Case-insensitive header lookup. Returns `None` for headers whose value
    /// is not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/users/{id}`, `req.param("id")` on `/api/users/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The authenticated principal, if the auth stage verified a credential.
    pub fn principal(&self) -> Option<&'static str> {
        self.principal
    }

    /// Marks the request as authenticated. Called by the auth stage after a
    /// successful credential check.
    pub fn set_principal(&mut self, principal: &'static str) {
        self.principal = Some(principal);
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, AUTHORIZATION};

    fn request_with_auth(value: &str) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        Request::new(
            Method::GET,
            "/api/users",
            headers,
            Vec::new(),
            "127.0.0.1:9999".parse().unwrap(),
        )
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = request_with_auth("Bearer abc");
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer abc"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn principal_starts_unset() {
        let mut req = request_with_auth("Bearer abc");
        assert_eq!(req.principal(), None);
        req.set_principal("api-client");
        assert_eq!(req.principal(), Some("api-client"));
    }
}

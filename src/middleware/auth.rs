//! Bearer-token authentication stage.

use http::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::error::Outcome;
use crate::request::Request;
use crate::response::Response;

use super::{BoxFuture, Middleware, Next};

/// Principal marker attached to requests that presented a valid token.
///
/// The shared-secret model has no per-user identity, so every authenticated
/// request carries the same fixed principal.
pub const PRINCIPAL: &str = "api-client";

/// Validates the `Authorization: Bearer <token>` header against a single
/// configured secret, short-circuiting denied requests with a plain-text 401.
///
/// Exempted requests (see [`exempt`]) skip the credential check entirely.
/// Denied requests never reach inner stages; the handler is not invoked.
/// The header value itself is never logged — deny-path warnings carry only
/// the reason.
pub struct BearerAuth {
    token: SecretString,
}

impl BearerAuth {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl Middleware for BearerAuth {
    fn handle<'a>(&'a self, mut req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let decision = decide(
                req.path(),
                req.method(),
                req.header("authorization"),
                self.token.expose_secret(),
            );

            match decision {
                Access::Allow { principal } => {
                    if let Some(principal) = principal {
                        req.set_principal(principal);
                    }
                    next.run(req).await
                }
                Access::Deny(reason) => {
                    warn!(
                        method = %req.method(),
                        path = %req.path(),
                        reason = %reason.as_str(),
                        "request denied"
                    );
                    Ok(Response::builder()
                        .status(StatusCode::UNAUTHORIZED)
                        .text(reason.message()))
                }
            }
        })
    }
}

// ── Decision policy ───────────────────────────────────────────────────────────

/// The access-control outcome for one request.
///
/// Computed fresh per request from the static exemption rules plus the
/// presented credential; carries no state across requests.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Access {
    /// Forward the request. `principal` is set only when a credential was
    /// actually verified — exempted requests stay anonymous.
    Allow { principal: Option<&'static str> },
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DenyReason {
    MissingHeader,
    WrongScheme,
    InvalidToken,
}

impl DenyReason {
    /// Short tag for log lines.
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing header",
            Self::WrongScheme => "wrong scheme",
            Self::InvalidToken => "invalid token",
        }
    }

    /// The client-visible 401 body.
    fn message(self) -> &'static str {
        match self {
            Self::MissingHeader => "Missing or invalid Authorization header.",
            Self::WrongScheme => "Authorization scheme must be Bearer.",
            Self::InvalidToken => "Invalid or expired token.",
        }
    }
}

/// Whether a path/method pair bypasses the credential check.
///
/// Prefix matches are ASCII case-insensitive. `/api/users` is exempt for
/// reads only — mutating methods on the user collection always require a
/// credential.
fn exempt(path: &str, method: &Method) -> bool {
    has_prefix(path, "/api/auth")
        || has_prefix(path, "/swagger")
        || has_prefix(path, "/health")
        || (has_prefix(path, "/api/users") && *method == Method::GET)
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path.len() >= prefix.len()
        && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// The full decision policy as a pure function.
///
/// Checked in order: exemption, header presence, scheme, token match. The
/// token is the remainder after the scheme, trimmed of surrounding
/// whitespace; an empty token is invalid, not missing.
fn decide(path: &str, method: &Method, header: Option<&str>, secret: &str) -> Access {
    if exempt(path, method) {
        return Access::Allow { principal: None };
    }

    let Some(header) = header else {
        return Access::Deny(DenyReason::MissingHeader);
    };

    let Some((scheme, rest)) = header.split_once(' ') else {
        return Access::Deny(DenyReason::WrongScheme);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Access::Deny(DenyReason::WrongScheme);
    }

    let token = rest.trim();
    if token.is_empty() || token != secret {
        return Access::Deny(DenyReason::InvalidToken);
    }

    Access::Allow { principal: Some(PRINCIPAL) }
}

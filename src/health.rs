//! Built-in health-check handlers.
//!
//! Both paths fall under the auth stage's `/health` exemption, so probes
//! never need a credential. Register them on the router:
//!
//! ```rust,no_run
//! use gatehouse::{health, Router};
//! use http::Method;
//!
//! let app = Router::new()
//!     .on(Method::GET, "/healthz", health::liveness)
//!     .on(Method::GET, "/readyz", health::readiness);
//! ```

use crate::request::Request;
use crate::response::Response;

/// Liveness probe handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive — this handler intentionally has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation).
///
/// Returns `200 OK` with body `"ready"`. Replace with your own handler if the
/// service must verify dependency health before accepting traffic.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

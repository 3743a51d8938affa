//! Request/response logging stage.

use std::time::Instant;

use tracing::{error, info};

use crate::error::Outcome;
use crate::request::Request;

use super::{BoxFuture, Middleware, Next};

/// Logs each request before forwarding it and the resulting status and
/// latency after the inner stages return.
///
/// Transparent by construction: stages exchange response values, so this
/// stage can observe status and timing without touching the body bytes the
/// inner stages produced. Faults are logged and re-raised unchanged for the
/// boundary above to classify.
///
/// The "incoming" line is always emitted before forwarding and the
/// "outgoing" line after the inner call returns, per request — concurrent
/// requests may interleave lines, but never reorder within one request.
pub struct RequestLog;

impl Middleware for RequestLog {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.path().to_owned();

            info!(method = %method, path = %path, remote = %req.remote(), "incoming request");
            let started = Instant::now();

            match next.run(req).await {
                Ok(response) => {
                    info!(
                        status = response.status_code().as_u16(),
                        method = %method,
                        path = %path,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "outgoing response"
                    );
                    Ok(response)
                }
                Err(fault) => {
                    error!(
                        fault = %fault,
                        method = %method,
                        path = %path,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "request processing failed"
                    );
                    Err(fault)
                }
            }
        })
    }
}

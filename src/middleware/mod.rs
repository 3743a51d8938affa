//! Middleware layer: the ordered request-interceptor chain.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns. Three stages ship with the crate:
//!
//! - [`ErrorBoundary`] — catches every [`Fault`](crate::Fault) from inner
//!   stages and renders the uniform problem response
//! - [`RequestLog`] — logs each request on the way in and its status and
//!   latency on the way out
//! - [`BearerAuth`] — validates the `Authorization` header, short-circuiting
//!   denied requests with a 401 before they reach any handler
//!
//! # Composition
//!
//! A [`Pipeline`] is an explicit ordered list of stages terminating in the
//! router. The first [`Pipeline::layer`] call is the outermost stage; at
//! request time each stage receives the request and a [`Next`] continuation
//! representing the rest of the chain. A stage forwards by calling
//! [`Next::run`], short-circuits by returning without calling it, and
//! observes the inner result on the way back.
//!
//! ```rust,no_run
//! use gatehouse::{BearerAuth, ErrorBoundary, Pipeline, RequestLog, Router};
//! use secrecy::SecretString;
//!
//! # let router = Router::new();
//! # let token = SecretString::from("not-a-real-token-xx".to_owned());
//! // Order is load-bearing: the boundary must wrap logging and auth so it
//! // catches their failures too, and auth must run after logging begins so
//! // denied requests still show up in the log.
//! let pipeline = Pipeline::new(router)
//!     .layer(ErrorBoundary)
//!     .layer(RequestLog)
//!     .layer(BearerAuth::new(token));
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Fault, Outcome};
use crate::handler::ErasedHandler;
use crate::request::Request;
use crate::router::Router;

mod auth;
mod boundary;
mod trace;

pub use auth::{BearerAuth, PRINCIPAL};
pub use boundary::ErrorBoundary;
pub use trace::RequestLog;

/// A heap-allocated future borrowing from the stage that produced it.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One stage of the request-processing chain.
///
/// A stage holds no per-request state; everything request-scoped lives in
/// locals of the returned future, which is why a single stage value can serve
/// concurrent requests without locks.
pub trait Middleware: Send + Sync + 'static {
    /// Processes one request.
    ///
    /// Call `next.run(req)` to forward to the remainder of the chain, or
    /// return an outcome directly to short-circuit.
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome>;
}

/// The continuation handed to a stage: the remaining stages plus the router.
///
/// Consumed by [`Next::run`] — a stage can forward a request at most once,
/// so exactly one response is produced per request.
pub struct Next<'a> {
    stack: &'a [Arc<dyn Middleware>],
    router: &'a Router,
}

impl Next<'_> {
    /// Runs the rest of the chain on `req`.
    ///
    /// When no stages remain, dispatches to the router; an unmatched route
    /// raises [`Fault::NotFound`] so the boundary renders the same problem
    /// body as a missing resource.
    pub async fn run(self, mut req: Request) -> Outcome {
        match self.stack.split_first() {
            Some((stage, rest)) => {
                let next = Next { stack: rest, router: self.router };
                stage.handle(req, next).await
            }
            None => match self.router.lookup(req.method(), req.path()) {
                Some((endpoint, params)) => {
                    req.set_params(params);
                    endpoint.call(req).await
                }
                None => Err(Fault::NotFound),
            },
        }
    }
}

/// The assembled request-processing chain.
///
/// Stages are stored outermost-first in a plain list, so the composition
/// order is visible data rather than hidden registration coupling.
pub struct Pipeline {
    stack: Vec<Arc<dyn Middleware>>,
    router: Router,
}

impl Pipeline {
    /// A pipeline with no middleware: requests go straight to `router`.
    pub fn new(router: Router) -> Self {
        Self { stack: Vec::new(), router }
    }

    /// Appends a stage. The first stage added is the outermost.
    pub fn layer(mut self, stage: impl Middleware) -> Self {
        self.stack.push(Arc::new(stage));
        self
    }

    /// Runs one request through every stage and the router.
    ///
    /// With an [`ErrorBoundary`] as the outermost stage this never returns
    /// `Err`; without one, faults surface to the caller — the server's
    /// dispatch then falls back to a bare 500.
    pub async fn handle(&self, req: Request) -> Outcome {
        Next { stack: &self.stack, router: &self.router }.run(req).await
    }
}

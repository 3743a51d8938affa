//! # gatehouse
//!
//! A user-registry HTTP API fronted by an ordered middleware pipeline.
//!
//! The registry itself is a trivial keyed collection. The part worth reusing
//! is the pipeline: three cross-cutting stages that wrap any request handler
//! with uniform error translation, request/response logging, and
//! bearer-token authentication — composed in a fixed, visible order.
//!
//! ## The chain
//!
//! ```text
//! ErrorBoundary → RequestLog → BearerAuth → Router → handler
//! ```
//!
//! Each stage receives the request and a continuation for the rest of the
//! chain; the response travels back as a plain value. Order is load-bearing:
//! the boundary is outermost so it catches failures from logging and auth
//! too, and auth runs after logging begins so denied requests still appear
//! in the log — but before the router, so unauthenticated calls never reach
//! business logic.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gatehouse::registry::{InMemoryUsers, UserStore};
//! use gatehouse::{users, BearerAuth, ErrorBoundary, Pipeline, RequestLog, Server};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() {
//!     let token = SecretString::from("not-a-real-token-xx".to_owned());
//!     let store: Arc<dyn UserStore> = Arc::new(InMemoryUsers::seeded());
//!
//!     let pipeline = Pipeline::new(users::routes(store))
//!         .layer(ErrorBoundary)
//!         .layer(RequestLog)
//!         .layer(BearerAuth::new(token));
//!
//!     Server::bind("0.0.0.0:3000").serve(pipeline).await.unwrap();
//! }
//! ```
//!
//! ## Error contract
//!
//! Handlers raise [`Fault`]s; the boundary renders each one as the same
//! four-field `application/problem+json` body. Client-input faults carry
//! actionable detail, unclassified internal ones a deliberately generic
//! message. Auth denials are the one exception — the auth stage answers
//! those itself with a plain-text 401 and the chain stops there.

mod error;
mod handler;
mod problem;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod health;
pub mod middleware;
pub mod registry;
pub mod users;

pub use error::{Error, Fault, Outcome};
pub use handler::{Handler, IntoOutcome};
pub use middleware::{BearerAuth, ErrorBoundary, Middleware, Next, Pipeline, RequestLog};
pub use problem::Problem;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;

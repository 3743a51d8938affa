use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gatehouse::config::Config;
use gatehouse::registry::{InMemoryUsers, UserStore};
use gatehouse::{health, users, BearerAuth, ErrorBoundary, Pipeline, RequestLog, Server};
use http::Method;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    if let Err(err) = config.validate() {
        eprintln!("configuration error: {err}");
        process::exit(2);
    }

    let store: Arc<dyn UserStore> = Arc::new(InMemoryUsers::seeded());

    let router = users::routes(store)
        .on(Method::GET, "/healthz", health::liveness)
        .on(Method::GET, "/readyz", health::readiness);

    // Outermost first. The boundary wraps everything; auth runs last so
    // denied requests are still logged but never reach a handler.
    let pipeline = Pipeline::new(router)
        .layer(ErrorBoundary)
        .layer(RequestLog)
        .layer(BearerAuth::new(config.api_token.clone()));

    Server::bind(&config.addr)
        .serve(pipeline)
        .await
        .expect("server error");
}

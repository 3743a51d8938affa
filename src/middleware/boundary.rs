//! Outermost stage: turns every escaped fault into a problem response.

use tracing::error;

use crate::error::Outcome;
use crate::problem::Problem;
use crate::request::Request;

use super::{BoxFuture, Middleware, Next};

/// Catches any [`Fault`](crate::Fault) raised by inner stages or handlers
/// and replaces it with the classified problem response, so the client
/// always receives a well-formed body instead of a dropped connection.
///
/// Must be the outermost stage of the pipeline — only then does it cover
/// failures from logging and auth as well as from handlers. It catches each
/// fault exactly once and never wraps itself: a failure while rendering the
/// problem body is fatal.
pub struct ErrorBoundary;

impl Middleware for ErrorBoundary {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let instance = req.path().to_owned();

            match next.run(req).await {
                Ok(response) => Ok(response),
                Err(fault) => {
                    error!(fault = %fault, path = %instance, "unhandled failure");
                    Ok(Problem::classify(&fault, &instance).into_response())
                }
            }
        })
    }
}

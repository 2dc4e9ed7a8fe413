//! Request/handler plumbing.
//!
//! Each use case is a [`Request`] type paired with exactly one
//! [`RequestHandler`]. [`dispatch`] validates a request against its rules and
//! only then hands it to the handler, so a rejected request never reaches a
//! repository.

use async_trait::async_trait;
use tracing::debug;

use super::Error;
use super::validation::{self, Rule};

/// A command or query with a single response type.
pub trait Request: Send + Sync + Sized + 'static {
    /// Value produced by the handler on success.
    type Response: Send;

    /// Stable name used in logs.
    const NAME: &'static str;

    /// Field-level rules checked before dispatch.
    fn rules() -> &'static [Rule<Self>] {
        &[]
    }
}

/// Handles one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Execute the use case.
    async fn handle(&self, request: R) -> Result<R::Response, Error>;
}

/// Validate `request` and route it to `handler`.
///
/// # Examples
/// ```
/// use async_trait::async_trait;
/// use notes_backend::domain::dispatch::{dispatch, Request, RequestHandler};
/// use notes_backend::domain::Error;
///
/// struct Ping;
/// impl Request for Ping {
///     type Response = &'static str;
///     const NAME: &'static str = "ping";
/// }
///
/// struct PingHandler;
/// #[async_trait]
/// impl RequestHandler<Ping> for PingHandler {
///     async fn handle(&self, _request: Ping) -> Result<&'static str, Error> {
///         Ok("pong")
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// assert_eq!(dispatch(&PingHandler, Ping).await.unwrap(), "pong");
/// # });
/// ```
pub async fn dispatch<R, H>(handler: &H, request: R) -> Result<R::Response, Error>
where
    R: Request,
    H: RequestHandler<R> + ?Sized,
{
    if let Err(error) = validation::validate(&request, R::rules()) {
        debug!(request = R::NAME, "request rejected by validation");
        return Err(error);
    }
    debug!(request = R::NAME, "dispatching request");
    handler.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::validation::not_blank;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        text: String,
    }

    const ECHO_RULES: [Rule<Echo>; 1] = [|r| not_blank("text", &r.text)];

    impl Request for Echo {
        type Response = String;
        const NAME: &'static str = "echo";

        fn rules() -> &'static [Rule<Self>] {
            &ECHO_RULES
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler<Echo> for CountingHandler {
        async fn handle(&self, request: Echo) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(request.text)
        }
    }

    #[tokio::test]
    async fn valid_requests_reach_the_handler() {
        let handler = CountingHandler::default();
        let response = dispatch(&handler, Echo { text: "hi".into() })
            .await
            .expect("dispatch succeeds");
        assert_eq!(response, "hi");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_handler() {
        let handler = CountingHandler::default();
        let error = dispatch(&handler, Echo { text: " ".into() })
            .await
            .expect_err("blank text is rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }
}

//! Dispatch middleware and page handlers.
//!
//! A dispatch rule runs its middleware strictly in registration order, each
//! awaited before the next starts. A middleware that returns [`Flow::Stop`]
//! ends the chain: the remaining middleware and the handler are skipped, and
//! the response is assumed to have been produced already.
//!
//! # Example
//!
//! ```
//! use folio_dispatch::{Flow, FnHandler, FnMiddleware};
//!
//! let members_only = FnMiddleware::new("members-only", |req| {
//!     Box::pin(async move {
//!         if req.params.get("poet") == Some("anonymous") {
//!             req.not_found = true;
//!             return Ok(Flow::Stop);
//!         }
//!         Ok(Flow::Continue)
//!     })
//! });
//!
//! let show_poet = FnHandler::new(|req| {
//!     Box::pin(async move {
//!         req.template = Some("show".to_string());
//!         Ok(())
//!     })
//! });
//! # let _ = (members_only, show_poet);
//! ```

use folio_core::{BoxFuture, FolioResult, PageRequest};

/// What a dispatch middleware asks the chain to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next middleware, or the handler after the last one.
    Continue,
    /// Skip the rest of the chain and the handler.
    Stop,
}

/// A step run before a dispatch rule's handler.
///
/// # Invariants
///
/// - Middleware runs after parameters are bound and the page type has
///   accepted responsibility for the request
/// - Errors propagate to the caller untouched
pub trait DispatchMiddleware: Send + Sync + 'static {
    /// Returns the name used in logs and outcomes.
    fn name(&self) -> &'static str;

    /// Processes the request.
    fn process<'a>(&'a self, req: &'a mut PageRequest) -> BoxFuture<'a, FolioResult<Flow>>;
}

/// The terminal step of a dispatch rule.
pub trait PageHandler: Send + Sync + 'static {
    /// Handles the request, typically by filling in template data.
    fn handle<'a>(&'a self, req: &'a mut PageRequest) -> BoxFuture<'a, FolioResult<()>>;
}

/// A middleware backed by a closure.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut PageRequest) -> BoxFuture<'a, FolioResult<Flow>> + Send + Sync + 'static,
{
    /// Creates a function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> DispatchMiddleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut PageRequest) -> BoxFuture<'a, FolioResult<Flow>> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(&'a self, req: &'a mut PageRequest) -> BoxFuture<'a, FolioResult<Flow>> {
        (self.func)(req)
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A handler backed by a closure.
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F>
where
    F: for<'a> Fn(&'a mut PageRequest) -> BoxFuture<'a, FolioResult<()>> + Send + Sync + 'static,
{
    /// Creates a function-based handler.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> PageHandler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut PageRequest) -> BoxFuture<'a, FolioResult<()>> + Send + Sync + 'static,
{
    fn handle<'a>(&'a self, req: &'a mut PageRequest) -> BoxFuture<'a, FolioResult<()>> {
        (self.func)(req)
    }
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Handler that sets the request template to a fixed name.
#[derive(Debug, Clone)]
pub struct SetTemplate {
    template: String,
}

impl SetTemplate {
    /// Creates a handler that renders `template`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl PageHandler for SetTemplate {
    fn handle<'a>(&'a self, req: &'a mut PageRequest) -> BoxFuture<'a, FolioResult<()>> {
        Box::pin(async move {
            req.template = Some(self.template.clone());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::FolioError;

    #[tokio::test]
    async fn test_fn_middleware() {
        let stop = FnMiddleware::new("stop", |req| {
            Box::pin(async move {
                req.not_found = true;
                Ok(Flow::Stop)
            })
        });
        let mut req = PageRequest::new("/");
        assert_eq!(stop.name(), "stop");
        assert_eq!(stop.process(&mut req).await.unwrap(), Flow::Stop);
        assert!(req.not_found);
    }

    #[tokio::test]
    async fn test_fn_handler_error() {
        let failing = FnHandler::new(|_req| Box::pin(async { Err(FolioError::handler("nope")) }));
        let mut req = PageRequest::new("/");
        assert!(failing.handle(&mut req).await.is_err());
    }

    #[tokio::test]
    async fn test_set_template() {
        let handler = SetTemplate::new("page");
        let mut req = PageRequest::new("/");
        handler.handle(&mut req).await.unwrap();
        assert_eq!(req.template.as_deref(), Some("page"));
    }
}

//! Dispatch rules.

use std::fmt;
use std::sync::Arc;

use folio_core::{FolioResult, PageRequest, Params};
use folio_router::PathPattern;
use tracing::trace;

use crate::error::DispatchError;
use crate::middleware::{DispatchMiddleware, Flow, PageHandler};

/// How a matched rule's chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainOutcome {
    /// Every middleware continued and the handler ran.
    Handled,
    /// The named middleware stopped the chain.
    Stopped(&'static str),
}

/// A compiled pattern with its middleware chain and handler.
#[derive(Clone)]
pub struct Rule {
    pattern: PathPattern,
    middleware: Vec<Arc<dyn DispatchMiddleware>>,
    handler: Arc<dyn PageHandler>,
}

impl Rule {
    /// Compiles `pattern` into a rule.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidPattern`] if the pattern is malformed.
    pub fn new(
        pattern: &str,
        middleware: Vec<Arc<dyn DispatchMiddleware>>,
        handler: Arc<dyn PageHandler>,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            pattern: PathPattern::compile(pattern)?,
            middleware,
            handler,
        })
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the middleware names in chain order.
    pub fn middleware_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.middleware.iter().map(|m| m.name())
    }

    /// Matches a remainder, treating an empty one as `/`.
    #[must_use]
    pub fn matches(&self, remainder: &str) -> Option<Params> {
        let path = if remainder.is_empty() { "/" } else { remainder };
        self.pattern.captures(path)
    }

    pub(crate) fn set_handler(&mut self, handler: Arc<dyn PageHandler>) {
        self.handler = handler;
    }

    pub(crate) async fn run(&self, req: &mut PageRequest) -> FolioResult<ChainOutcome> {
        for middleware in &self.middleware {
            trace!(middleware = middleware.name(), "running dispatch middleware");
            if middleware.process(req).await? == Flow::Stop {
                return Ok(ChainOutcome::Stopped(middleware.name()));
            }
        }
        self.handler.handle(req).await?;
        Ok(ChainOutcome::Handled)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern.as_str())
            .field("middleware", &self.middleware_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

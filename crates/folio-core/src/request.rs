//! The per-request state page-type dispatch operates on.

use serde_json::{Map, Value};

use crate::ids::RequestId;
use crate::page::Page;
use folio_router::Params;

/// Data gathered for rendering.
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    /// The page whose slug is the longest prefix of the URL, if any.
    pub best_page: Option<Page>,

    /// The page that accepted responsibility for the URL.
    pub page: Option<Page>,

    /// Anything handlers want to hand to the template.
    pub extra: Map<String, Value>,
}

/// A request that has been resolved to a candidate page.
///
/// Upstream page resolution fills in [`PageRequest::remainder`] and
/// [`RequestData::best_page`]; dispatch fills in the rest. The request is
/// exclusively owned by the dispatch call for its whole lifetime.
///
/// # Example
///
/// ```
/// use folio_core::{Page, PageRequest};
///
/// let req = PageRequest::new("/chaucer")
///     .with_best_page(Page::new("poet-page", "/poets"));
///
/// assert_eq!(req.remainder, "/chaucer");
/// assert!(!req.has_empty_remainder());
/// assert!(!req.not_found);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    request_id: RequestId,

    /// The part of the URL path left after the best page's slug.
    pub remainder: String,

    /// Parameters captured by the matching dispatch rule.
    pub params: Params,

    /// Page data.
    pub data: RequestData,

    /// Rendering scene selected by the page type, if it configures one.
    pub scene: Option<String>,

    /// Template chosen by a handler.
    pub template: Option<String>,

    /// Set when no page type accepted the URL.
    pub not_found: bool,
}

impl PageRequest {
    /// Creates a request with the given remainder.
    #[must_use]
    pub fn new(remainder: impl Into<String>) -> Self {
        Self {
            remainder: remainder.into(),
            ..Self::default()
        }
    }

    /// Sets the candidate page.
    #[must_use]
    pub fn with_best_page(mut self, page: Page) -> Self {
        self.data.best_page = Some(page);
        self
    }

    /// Returns the request id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns true when the URL named the page itself, with nothing after
    /// its slug but an optional trailing slash.
    #[must_use]
    pub fn has_empty_remainder(&self) -> bool {
        self.remainder.is_empty() || self.remainder == "/"
    }

    /// Returns the type name of the candidate page.
    #[must_use]
    pub fn best_page_type(&self) -> Option<&str> {
        self.data.best_page.as_ref().map(|p| p.page_type.as_str())
    }
}

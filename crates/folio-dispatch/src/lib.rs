//! # Folio Dispatch
//!
//! Page-type URL dispatch for Folio.
//!
//! Once upstream page resolution has found the page whose slug is the
//! longest prefix of a URL, the rest of the path (the *remainder*) is routed
//! by that page's [`PageType`]:
//!
//! 1. A page type without rules serves only the exact page URL
//! 2. Otherwise its rules are tried in registration order; the first
//!    matching pattern wins and its parameters are bound to the request
//! 3. The rule's middleware runs in order; [`Flow::Stop`] skips the rest
//! 4. The handler runs last
//!
//! Not finding a match is a normal outcome: it sets
//! [`PageRequest::not_found`](folio_core::PageRequest::not_found).
//!
//! The [`placement`] module replays page placement between draft and
//! published modes.

#![doc(html_root_url = "https://docs.rs/folio-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod middleware;
mod page_type;
pub mod placement;
mod registry;
mod rule;

pub use error::DispatchError;
pub use middleware::{DispatchMiddleware, Flow, FnHandler, FnMiddleware, PageHandler, SetTemplate};
pub use page_type::{
    DispatchOutcome, PageType, DEFAULT_TEMPLATE, FORBIDDEN_FIELDS, UTILITY_GROUP,
};
pub use placement::PageStore;
pub use registry::PageTypeRegistry;
pub use rule::Rule;

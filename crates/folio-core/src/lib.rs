//! # Folio Core
//!
//! Core types shared by every Folio crate.
//!
//! - [`Page`] - A page document as seen by page-type dispatch
//! - [`PageRequest`] - Per-request state that dispatch reads and enriches
//! - [`RequestId`] / [`new_id`] - Identifiers for requests and editor items
//! - [`FolioError`] - Standard error type for handlers and collaborators

#![doc(html_root_url = "https://docs.rs/folio-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod ids;
mod page;
mod request;

pub use error::{FolioError, FolioResult};
pub use ids::{new_id, RequestId};
pub use page::{Mode, Page, Position};
pub use request::{PageRequest, RequestData};

/// A boxed, sendable future borrowed for `'a`.
///
/// Dispatch steps, page stores, and modal hosts return this so they can be
/// stored as trait objects.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Re-exported so handlers can name captured parameters without a direct
/// dependency on the router crate.
pub use folio_router::Params;

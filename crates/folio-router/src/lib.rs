//! Express-style path patterns for Folio.
//!
//! Page types in Folio answer for "the rest" of a URL once the page itself
//! has been resolved by its slug. This crate compiles the route templates
//! those page types register into anchored regular expressions and extracts
//! named parameters from a matching remainder.
//!
//! # Features
//!
//! - **Named parameters**: `/:poet` captures one path segment
//! - **Modifiers**: `:name?` (optional), `:name*` (zero or more segments),
//!   `:name+` (one or more segments)
//! - **Custom captures**: `/:id(\d+)` restricts what a parameter accepts
//! - **Wildcards**: a bare `*` captures anything; its key is its index
//! - **Non-strict matching**: a trailing slash is always tolerated
//!
//! # Example
//!
//! ```rust
//! use folio_router::PathPattern;
//!
//! let pattern = PathPattern::compile("/:poet/works/:year?").unwrap();
//!
//! let params = pattern.captures("/chaucer/works").unwrap();
//! assert_eq!(params.get("poet"), Some("chaucer"));
//! assert_eq!(params.get("year"), None);
//!
//! let params = pattern.captures("/chaucer/works/1387").unwrap();
//! assert_eq!(params.get("year"), Some("1387"));
//!
//! assert!(pattern.captures("/").is_none());
//! ```
//!
//! # Compilation
//!
//! ```text
//!   "/:poet/works/:year?"
//!          │
//!          ▼  tokenize
//!   [Param(poet, prefix "/"), Literal("/works"), Param(year?, prefix "/")]
//!          │
//!          ▼  emit
//!   (?i)^/(?P<p0>[^/]+?)/works(?:/(?P<p1>[^/]+?))?(?:/)?$
//! ```

mod error;
mod params;
mod pattern;
mod token;

pub use error::PatternError;
pub use params::Params;
pub use pattern::{Key, PathPattern};
pub use token::Modifier;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_root_pattern() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/anything"));
    }

    #[test]
    fn test_named_params_in_order() {
        let pattern = PathPattern::compile("/:year/:month/:slug").unwrap();
        let names: Vec<_> = pattern.keys().iter().map(Key::name).collect();
        assert_eq!(names, vec!["year", "month", "slug"]);

        let params = pattern.captures("/2024/05/spring-poems").unwrap();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("year", "2024"), ("month", "05"), ("slug", "spring-poems")]
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let pattern = PathPattern::compile("/tag/:tag").unwrap();
        assert!(pattern.captures("/category/news").is_none());
    }
}

//! Page documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which locale mode a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The editable draft.
    #[default]
    Draft,
    /// The live, published copy.
    Published,
}

impl Mode {
    /// Returns the suffix this mode carries in document ids (`:draft`).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Draft => ":draft",
            Self::Published => ":published",
        }
    }

    /// Returns the other mode.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Draft => Self::Published,
            Self::Published => Self::Draft,
        }
    }

    /// Rewrites a mode-suffixed document id into this mode.
    ///
    /// ```
    /// use folio_core::Mode;
    ///
    /// assert_eq!(Mode::Draft.rebase_id("home:en:published"), "home:en:draft");
    /// assert_eq!(Mode::Published.rebase_id("home:en:published"), "home:en:published");
    /// ```
    #[must_use]
    pub fn rebase_id(self, id: &str) -> String {
        id.replacen(self.counterpart().suffix(), self.suffix(), 1)
    }
}

/// Where a page sits relative to the page it was placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    /// Sibling before the target.
    Before,
    /// Sibling after the target.
    After,
    /// First child of the target.
    FirstChild,
    /// Last child of the target.
    LastChild,
}

/// A page document.
///
/// Only the properties dispatch and placement rely on are typed; everything
/// else the page type's schema defines lives in [`Page::fields`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Document id, suffixed with its mode.
    #[serde(rename = "_id")]
    pub id: String,

    /// Name of the page type this page belongs to.
    #[serde(rename = "type")]
    pub page_type: String,

    /// Page title.
    #[serde(default)]
    pub title: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Depth in the page tree; the home page is level 0.
    #[serde(default)]
    pub level: u32,

    /// Page the last positioning operation was relative to.
    #[serde(
        rename = "lastTargetId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_target_id: Option<String>,

    /// Position used by the last positioning operation.
    #[serde(
        rename = "lastPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_position: Option<Position>,

    /// Schema-defined fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Page {
    /// Creates a page of `page_type` at `slug`.
    #[must_use]
    pub fn new(page_type: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            page_type: page_type.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the tree level.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Records the placement the page was inserted with.
    #[must_use]
    pub fn with_placement(mut self, target_id: impl Into<String>, position: Position) -> Self {
        self.last_target_id = Some(target_id.into());
        self.last_position = Some(position);
        self
    }

    /// Returns true for the root of the page tree.
    #[must_use]
    pub const fn is_home(&self) -> bool {
        self.level == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_rebase_id() {
        assert_eq!(Mode::Published.rebase_id("p1:en:draft"), "p1:en:published");
        assert_eq!(Mode::Draft.rebase_id("p1:en:draft"), "p1:en:draft");
    }

    #[test]
    fn test_mode_rebase_id_rewrites_first_suffix_only() {
        assert_eq!(
            Mode::Published.rebase_id("p1:draft:en:draft"),
            "p1:published:en:draft"
        );
    }

    #[test]
    fn test_page_serde_shape() {
        let page = Page::new("poet-page", "/poets")
            .with_id("p1:en:draft")
            .with_title("Poets")
            .with_level(1)
            .with_placement("home:en:draft", Position::LastChild);

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["_id"], "p1:en:draft");
        assert_eq!(value["type"], "poet-page");
        assert_eq!(value["lastTargetId"], "home:en:draft");
        assert_eq!(value["lastPosition"], "lastChild");
        assert!(value.get("last_position").is_none());
    }

    #[test]
    fn test_page_keeps_schema_fields() {
        let page: Page = serde_json::from_value(json!({
            "_id": "p2:en:draft",
            "type": "default-page",
            "slug": "/about",
            "orphan": true
        }))
        .unwrap();
        assert_eq!(page.fields.get("orphan"), Some(&json!(true)));
        assert_eq!(page.level, 0);
        assert!(page.is_home());
        assert!(page.last_target_id.is_none());
    }
}

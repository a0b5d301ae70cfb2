//! The page type registry.

use indexmap::IndexMap;
use tracing::{debug, trace};

use folio_core::{FolioResult, PageRequest};
use folio_schema::Choice;

use crate::error::DispatchError;
use crate::page_type::{DispatchOutcome, PageType};

/// All page types of a site, in registration order.
///
/// Serving a request hands it to the page type named by the best page's
/// `type`; every other page type leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct PageTypeRegistry {
    types: IndexMap<String, PageType>,
}

impl PageTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page type and refreshes the `type` choices of every page type.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicatePageType`] if the name is taken.
    pub fn register(&mut self, page_type: PageType) -> Result<(), DispatchError> {
        let name = page_type.name().to_string();
        if self.types.contains_key(&name) {
            return Err(DispatchError::DuplicatePageType { name });
        }
        debug!(page_type = %name, rules = page_type.rules().len(), "page type registered");
        self.types.insert(name, page_type);

        let choices = self.type_choices();
        for page_type in self.types.values_mut() {
            page_type.set_type_choices(choices.clone());
        }
        Ok(())
    }

    /// Returns the page type called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PageType> {
        self.types.get(name)
    }

    /// Returns a mutable page type, for registering more rules.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PageType> {
        self.types.get_mut(name)
    }

    /// Returns the registered page types.
    pub fn iter(&self) -> impl Iterator<Item = &PageType> {
        self.types.values()
    }

    /// Returns the number of page types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no page type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns one `type` choice per page type.
    #[must_use]
    pub fn type_choices(&self) -> Vec<Choice> {
        self.types
            .values()
            .map(|t| Choice::new(t.name(), t.label()))
            .collect()
    }

    /// Serves a request resolved to a best page.
    ///
    /// Requests without a best page, or whose best page has an unregistered
    /// type, return [`DispatchOutcome::Ignored`] unchanged.
    ///
    /// # Errors
    ///
    /// Returns errors from middleware and handlers unchanged.
    pub async fn serve(&self, req: &mut PageRequest) -> FolioResult<DispatchOutcome> {
        let Some(page_type) = req.best_page_type().and_then(|name| self.types.get(name)) else {
            trace!(best_page_type = ?req.best_page_type(), "no page type serves request");
            return Ok(DispatchOutcome::Ignored);
        };
        page_type.route(req).await
    }
}

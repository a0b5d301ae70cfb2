//! Building a site's page types from configuration.

use tracing::debug;

use folio_config::{FolioConfig, PageTypeSettings};
use folio_dispatch::{DispatchError, PageType, PageTypeRegistry};

/// Applies configured label, scene and template to a page type.
///
/// Unset settings leave the page type as it is.
#[must_use]
pub fn apply_settings(mut page_type: PageType, settings: &PageTypeSettings) -> PageType {
    if let Some(label) = &settings.label {
        page_type = page_type.with_label(label);
    }
    if let Some(scene) = &settings.scene {
        page_type = page_type.with_scene(scene);
    }
    if let Some(template) = &settings.template {
        page_type = page_type.with_template(template);
    }
    page_type
}

/// Registers `page_types` with their configured settings.
///
/// Page types that only appear in the configuration are registered without
/// rules, so they serve their exact page URL. Configured types come after
/// the given ones, in file order.
///
/// # Errors
///
/// Returns [`DispatchError::DuplicatePageType`] if two page types share a
/// name.
pub fn build_registry(
    config: &FolioConfig,
    page_types: impl IntoIterator<Item = PageType>,
) -> Result<PageTypeRegistry, DispatchError> {
    let mut registry = PageTypeRegistry::new();

    for page_type in page_types {
        let page_type = match config.page_types.get(page_type.name()) {
            Some(settings) => apply_settings(page_type, settings),
            None => page_type,
        };
        registry.register(page_type)?;
    }

    for (name, settings) in &config.page_types {
        if registry.get(name).is_none() {
            debug!(page_type = %name, "registering configured page type without rules");
            registry.register(apply_settings(PageType::new(name.as_str()), settings))?;
        }
    }

    Ok(registry)
}

//! Replaying page placement across draft and published modes.
//!
//! Every page exists once per mode. When a page is first inserted in one
//! mode, its counterpart in the other mode is inserted at the same place in
//! the tree by replaying the target and position recorded on the page. The
//! home page has no placement and is inserted directly.

use folio_core::{BoxFuture, FolioResult, Mode, Page, Position};
use tracing::debug;

use crate::error::DispatchError;

/// Page tree persistence, provided by the application.
pub trait PageStore: Send + Sync {
    /// Inserts `page` relative to `target_id` in `mode`.
    fn insert<'a>(
        &'a self,
        mode: Mode,
        target_id: &'a str,
        position: Position,
        page: Page,
    ) -> BoxFuture<'a, FolioResult<Page>>;

    /// Inserts the home page, which has no placement, in `mode`.
    fn insert_home<'a>(&'a self, mode: Mode, page: Page) -> BoxFuture<'a, FolioResult<Page>>;

    /// Moves an existing page relative to `target_id` in `mode`.
    fn move_page<'a>(
        &'a self,
        mode: Mode,
        page_id: &'a str,
        target_id: &'a str,
        position: Position,
    ) -> BoxFuture<'a, FolioResult<()>>;
}

/// Copies the placement metadata of a draft onto the page about to be
/// published.
pub fn copy_for_publication(draft: &Page, published: &mut Page) {
    published.last_target_id.clone_from(&draft.last_target_id);
    published.last_position = draft.last_position;
}

/// Inserts the draft counterpart of a page inserted in published mode.
///
/// # Errors
///
/// Returns [`DispatchError::MissingPlacement`] if `published` is not the
/// home page and carries no placement, or the store's error.
pub async fn insert_draft_of<S>(
    store: &S,
    published: &Page,
    draft: Page,
) -> Result<Page, DispatchError>
where
    S: PageStore + ?Sized,
{
    insert_counterpart(store, Mode::Draft, published, draft).await
}

/// Inserts the published counterpart of a page inserted in draft mode.
///
/// # Errors
///
/// Returns [`DispatchError::MissingPlacement`] if `draft` is not the home
/// page and carries no placement, or the store's error.
pub async fn insert_published_of<S>(
    store: &S,
    draft: &Page,
    published: Page,
) -> Result<Page, DispatchError>
where
    S: PageStore + ?Sized,
{
    insert_counterpart(store, Mode::Published, draft, published).await
}

async fn insert_counterpart<S>(
    store: &S,
    mode: Mode,
    source: &Page,
    counterpart: Page,
) -> Result<Page, DispatchError>
where
    S: PageStore + ?Sized,
{
    if let (Some(target), Some(position)) = (&source.last_target_id, source.last_position) {
        let target = mode.rebase_id(target);
        debug!(page_id = %source.id, target = %target, ?position, ?mode, "replaying page placement");
        return Ok(store.insert(mode, &target, position, counterpart).await?);
    }
    if source.is_home() {
        debug!(page_id = %source.id, ?mode, "inserting home page counterpart");
        return Ok(store.insert_home(mode, counterpart).await?);
    }
    Err(DispatchError::MissingPlacement {
        page_id: source.id.clone(),
        mode: mode_name(mode),
    })
}

/// Moves a freshly published page to the placement recorded on it.
///
/// The home page never moves.
///
/// # Errors
///
/// Returns [`DispatchError::MissingPlacement`] if a non-home page carries
/// no placement, or the store's error.
pub async fn replay_move_after_published<S>(store: &S, published: &Page) -> Result<(), DispatchError>
where
    S: PageStore + ?Sized,
{
    if published.is_home() {
        return Ok(());
    }
    let (Some(target), Some(position)) = (&published.last_target_id, published.last_position)
    else {
        return Err(DispatchError::MissingPlacement {
            page_id: published.id.clone(),
            mode: mode_name(Mode::Published),
        });
    };
    let target = Mode::Published.rebase_id(target);
    store
        .move_page(Mode::Published, &published.id, &target, position)
        .await?;
    Ok(())
}

const fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Draft => "draft",
        Mode::Published => "published",
    }
}

use crate::core::{ClientResult, LocalStore, FAVICON_STORAGE_KEY};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaviconAction {
    Keep,
    /// The cached favicon changed; the page must reload to pick it up.
    Reload,
}

/// Syncs the cached favicon with the one from freshly fetched domain data.
///
/// A new favicon is stored and triggers a reload. A cached favicon that the
/// deployment no longer has is cleared and also triggers a reload, but only
/// once loading finished, so an empty in-progress state never wipes the cache.
pub fn reconcile_favicon(
    store: &dyn LocalStore,
    fetched: Option<&str>,
    loading: bool,
) -> ClientResult<FaviconAction> {
    let cached = store.get(FAVICON_STORAGE_KEY)?;
    let fetched = fetched.filter(|f| !f.is_empty());

    match (fetched, cached) {
        (Some(new), cached) if cached.as_deref() != Some(new) => {
            info!("Favicon changed to {}", new);
            store.set(FAVICON_STORAGE_KEY, new)?;
            Ok(FaviconAction::Reload)
        }
        (None, Some(old)) if !loading => {
            info!("Favicon {} removed from domain data", old);
            store.remove(FAVICON_STORAGE_KEY)?;
            Ok(FaviconAction::Reload)
        }
        _ => Ok(FaviconAction::Keep),
    }
}

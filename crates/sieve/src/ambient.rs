//! Process-wide backend locators.
//!
//! Filter forms built without an explicit locator fall back to the ones
//! configured here. The registry is read each time a form needs a locator,
//! so a locator installed after a form was created is still picked up.
//!
//! ```
//! use std::sync::Arc;
//! use sieve::ambient;
//! use sieve_criteria::{ServiceLocator, TableRepository};
//!
//! let locator = Arc::new(ServiceLocator::new());
//! locator.register_repository("Person", Arc::new(TableRepository::new("person")));
//!
//! let _guard = ambient::install_repositories(locator);
//! assert!(ambient::repositories().is_some());
//! ```
//!
//! Tests that touch the registry share global state and should run serially.

use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use sieve_criteria::{CollectionLocator, RepositoryLocator};
use tracing::debug;

type Slot<T> = Lazy<Mutex<Option<Arc<T>>>>;

static REPOSITORIES: Slot<dyn RepositoryLocator> = Lazy::new(|| Mutex::new(None));
static COLLECTIONS: Slot<dyn CollectionLocator> = Lazy::new(|| Mutex::new(None));

fn swap<T: ?Sized>(slot: &Mutex<Option<Arc<T>>>, value: Option<Arc<T>>) -> Option<Arc<T>> {
    let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *current, value)
}

fn read<T: ?Sized>(slot: &Mutex<Option<Arc<T>>>) -> Option<Arc<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Sets, or clears with `None`, the ambient repository locator.
pub fn configure_repositories(locator: Option<Arc<dyn RepositoryLocator>>) {
    debug!(set = locator.is_some(), "configuring ambient repository locator");
    swap(&*REPOSITORIES, locator);
}

/// Sets, or clears with `None`, the ambient collection locator.
pub fn configure_collections(locator: Option<Arc<dyn CollectionLocator>>) {
    debug!(set = locator.is_some(), "configuring ambient collection locator");
    swap(&*COLLECTIONS, locator);
}

/// The ambient repository locator, if one is configured.
pub fn repositories() -> Option<Arc<dyn RepositoryLocator>> {
    read(&*REPOSITORIES)
}

/// The ambient collection locator, if one is configured.
pub fn collections() -> Option<Arc<dyn CollectionLocator>> {
    read(&*COLLECTIONS)
}

/// Installs `locator` until the returned guard is dropped.
///
/// The previous locator, if any, is restored on drop.
#[must_use = "the locator is uninstalled when the guard is dropped"]
pub fn install_repositories(locator: Arc<dyn RepositoryLocator>) -> AmbientGuard {
    let previous = swap(&*REPOSITORIES, Some(locator));
    AmbientGuard {
        restore: Restore::Repositories(previous),
    }
}

/// Installs `locator` until the returned guard is dropped.
#[must_use = "the locator is uninstalled when the guard is dropped"]
pub fn install_collections(locator: Arc<dyn CollectionLocator>) -> AmbientGuard {
    let previous = swap(&*COLLECTIONS, Some(locator));
    AmbientGuard {
        restore: Restore::Collections(previous),
    }
}

enum Restore {
    Repositories(Option<Arc<dyn RepositoryLocator>>),
    Collections(Option<Arc<dyn CollectionLocator>>),
}

/// Restores the previously configured locator when dropped.
pub struct AmbientGuard {
    restore: Restore,
}

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        match &mut self.restore {
            Restore::Repositories(previous) => {
                swap(&*REPOSITORIES, previous.take());
            }
            Restore::Collections(previous) => {
                swap(&*COLLECTIONS, previous.take());
            }
        }
    }
}

impl std::fmt::Debug for AmbientGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.restore {
            Restore::Repositories(_) => "repositories",
            Restore::Collections(_) => "collections",
        };
        f.debug_struct("AmbientGuard").field("restores", &kind).finish()
    }
}

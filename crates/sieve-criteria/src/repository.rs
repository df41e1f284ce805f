//! Backend contracts: where queries and criteria come from.
//!
//! Filter forms never build queries themselves. A [`RepositoryLocator`]
//! resolves an entity name to a [`Repository`], which hands out fresh
//! queries and backend-flavoured criteria. Document stores go through a
//! [`CollectionLocator`] and [`Collection`] instead.
//!
//! [`ServiceLocator`] and [`CollectionRegistry`] are in-memory
//! implementations, enough for applications that register their backends
//! at startup.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::criteria::Criteria;
use crate::document::DocumentQuery;
use crate::error::{CriteriaError, Result};
use crate::query::SqlQuery;
use crate::traits::QueryInterface;

// ============================================================================
// Repositories
// ============================================================================

/// A query source for one entity.
pub trait Repository: Send + Sync {
    /// Creates an empty criteria container for this backend.
    fn criteria(&self) -> Criteria {
        Criteria::new()
    }

    /// Creates a fresh query selecting every entity.
    fn builder(&self) -> Box<dyn QueryInterface>;
}

/// Resolves entity names to repositories.
pub trait RepositoryLocator: Send + Sync {
    /// Returns the repository of `entity`, or `None` if it is unknown.
    fn repository(&self, entity: &str) -> Option<Arc<dyn Repository>>;
}

/// A repository backed by one SQL table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRepository {
    table: String,
}

impl TableRepository {
    /// Creates a repository on `table`.
    pub fn new(table: impl Into<String>) -> Self {
        TableRepository {
            table: table.into(),
        }
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Repository for TableRepository {
    fn builder(&self) -> Box<dyn QueryInterface> {
        Box::new(SqlQuery::new(self.table.as_str()))
    }
}

/// In-memory repository registry.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sieve_criteria::{RepositoryLocator, ServiceLocator, TableRepository};
///
/// let locator = ServiceLocator::new();
/// locator.register_repository("Person", Arc::new(TableRepository::new("person")));
///
/// let query = locator.repository("Person").unwrap().builder();
/// assert_eq!(query.to_string(), "SELECT t0.* FROM person t0");
/// assert!(locator.repository("Unknown").is_none());
/// ```
#[derive(Default)]
pub struct ServiceLocator {
    repositories: RwLock<HashMap<String, Arc<dyn Repository>>>,
}

impl ServiceLocator {
    /// Creates an empty locator.
    pub fn new() -> Self {
        ServiceLocator::default()
    }

    /// Registers (or replaces) the repository of `entity`.
    pub fn register_repository(&self, entity: impl Into<String>, repository: Arc<dyn Repository>) {
        let entity = entity.into();
        debug!(entity = %entity, "registering repository");
        self.repositories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity, repository);
    }

    /// Removes every registered repository.
    pub fn clear_repositories(&self) {
        self.repositories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Names of the registered entities, sorted.
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .repositories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl RepositoryLocator for ServiceLocator {
    fn repository(&self, entity: &str) -> Option<Arc<dyn Repository>> {
        self.repositories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(entity)
            .cloned()
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLocator")
            .field("entities", &self.entities())
            .finish()
    }
}

// ============================================================================
// Collections
// ============================================================================

/// A document collection.
pub trait Collection: Send + Sync {
    /// Creates a fresh query matching every document.
    fn query(&self) -> Box<dyn QueryInterface>;
}

/// Resolves document names to collections.
pub trait CollectionLocator: Send + Sync {
    /// Returns the collection of `document`.
    ///
    /// # Errors
    ///
    /// [`CriteriaError::UnknownCollection`] if nothing is registered.
    fn collection(&self, document: &str) -> Result<Arc<dyn Collection>>;
}

/// A collection known by name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCollection {
    name: String,
}

impl NamedCollection {
    /// Creates a collection called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        NamedCollection { name: name.into() }
    }

    /// The collection name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Collection for NamedCollection {
    fn query(&self) -> Box<dyn QueryInterface> {
        Box::new(DocumentQuery::new(self.name.as_str()))
    }
}

/// In-memory collection registry.
#[derive(Default)]
pub struct CollectionRegistry {
    collections: RwLock<HashMap<String, Arc<dyn Collection>>>,
}

impl CollectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        CollectionRegistry::default()
    }

    /// Registers (or replaces) the collection of `document`.
    pub fn register_collection(&self, document: impl Into<String>, collection: Arc<dyn Collection>) {
        let document = document.into();
        debug!(document = %document, "registering collection");
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document, collection);
    }

    /// Removes every registered collection.
    pub fn clear_collections(&self) {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CollectionLocator for CollectionRegistry {
    fn collection(&self, document: &str) -> Result<Arc<dyn Collection>> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document)
            .cloned()
            .ok_or_else(|| CriteriaError::UnknownCollection(document.to_string()))
    }
}

impl fmt::Debug for CollectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("CollectionRegistry")
            .field("collections", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_locator_register_and_clear() {
        let locator = ServiceLocator::new();
        locator.register_repository("Person", Arc::new(TableRepository::new("person")));
        locator.register_repository("Address", Arc::new(TableRepository::new("address")));

        assert_eq!(locator.entities(), ["Address", "Person"]);
        assert!(locator.repository("Person").is_some());

        locator.clear_repositories();
        assert!(locator.repository("Person").is_none());
    }

    #[test]
    fn table_repository_builds_sql_queries() {
        let repository = TableRepository::new("person");
        let query = repository.builder();

        assert!(query.as_any().downcast_ref::<SqlQuery>().is_some());
        assert!(repository.criteria().is_empty());
    }

    #[test]
    fn collection_registry_lookup() {
        let registry = CollectionRegistry::new();
        registry.register_collection("Person", Arc::new(NamedCollection::new("person")));

        let query = registry.collection("Person").unwrap().query();
        assert_eq!(query.to_string(), "{}");

        let err = registry.collection("Missing").err().unwrap();
        assert!(matches!(err, CriteriaError::UnknownCollection(ref name) if name == "Missing"));
    }
}

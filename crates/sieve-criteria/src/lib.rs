//! Sieve Criteria - predicate containers and query compilation.
//!
//! This crate is the query side of a filter form. It provides:
//!
//! - A [`Criteria`] container of `key => value` predicates
//! - Operator-suffixed keys (`"age :between"`, `"score >="`)
//! - A [`Like`] expression builder for prefix/contains searches
//! - Query builders for SQL tables ([`SqlQuery`]) and document
//!   collections ([`DocumentQuery`])
//! - Pagination ([`Paginable`], [`Paginator`])
//! - Backend locators ([`RepositoryLocator`], [`CollectionLocator`])
//!
//! # Quick Start
//!
//! ```rust
//! use sieve_criteria::{Criteria, Like, SqlQuery, Whereable};
//!
//! let mut criteria = Criteria::new();
//! criteria
//!     .add("firstName", Like::new("J").escape().starts_with())
//!     .add("age :between", vec![20, 55]);
//!
//! let mut query = SqlQuery::new("person");
//! query.where_criteria(criteria.all()).unwrap();
//!
//! assert_eq!(
//!     query.to_raw_sql(),
//!     "SELECT t0.* FROM person t0 WHERE t0.firstName LIKE 'J%' AND t0.age BETWEEN 20 AND 55"
//! );
//! ```
//!
//! # Key Encoding
//!
//! A key is an attribute, optionally followed by a single space and an
//! operator token. Bare keys starting with `:` are query options.
//!
//! | Token | Operator |
//! |-------|----------|
//! | (none), `=`, `:eq` | `Eq` |
//! | `!=`, `<>`, `:ne` | `Ne` |
//! | `>`, `>=`, `<`, `<=` | comparisons |
//! | `:in`, `:notin` | set membership |
//! | `:between`, `:notbetween` | inclusive range (two bounds) |
//! | `:like`, `:notlike` | pattern |
//! | `:limit`, `:offset`, `:page` | query options |

mod clause;
mod criteria;
mod document;
mod error;
mod like;
mod op;
mod pagination;
mod query;
mod repository;
mod traits;
mod value;

// Re-export public API
pub use clause::Clause;
pub use criteria::Criteria;
pub use document::{DocumentQuery, ReadQuery};
pub use error::{CriteriaError, Result};
pub use like::{Like, LikeKind};
pub use op::{split_key, Key, Op, QueryOption};
pub use pagination::{Paginator, DEFAULT_PAGE_SIZE};
pub use query::{Condition, SqlQuery};
pub use repository::{
    Collection, CollectionLocator, CollectionRegistry, NamedCollection, Repository,
    RepositoryLocator, ServiceLocator, TableRepository,
};
pub use traits::{Paginable, QueryInterface, Whereable};
pub use value::{Number, Value};

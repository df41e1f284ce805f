//! Sieve - filter forms that compile validated input into query criteria.
//!
//! A filter form is an ordinary form whose children can be declared as
//! criteria. When the submitted payload is accepted, every criterion child
//! writes one predicate into a [`Criteria`](sieve_criteria::Criteria)
//! container, which is then handed to a query.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sieve::{BaseFilterForm, ChildBuilding, FilterFormBuilder, FilterTarget, FormBuilding};
//! use sieve_criteria::SqlQuery;
//!
//! let schema = |builder: &mut FilterFormBuilder, _: &mut FilterTarget| {
//!     builder.string("firstName", None).start_with();
//!     builder.search_begins("lastName", None);
//!     builder
//!         .embedded("age", |age| {
//!             age.integer("0", None).setter(None);
//!             age.integer("1", None).setter(None);
//!             age.generates_value(json!([]));
//!         })
//!         .between();
//! };
//!
//! let mut form = BaseFilterForm::new(&schema);
//! form.submit(&json!({ "firstName": "J", "lastName": "Smi", "age": [20, 55] }));
//!
//! let mut query = SqlQuery::new("person");
//! form.apply(&mut query).unwrap();
//!
//! assert_eq!(
//!     query.to_raw_sql(),
//!     "SELECT t0.* FROM person t0 WHERE t0.firstName LIKE 'J%' AND t0.lastName LIKE 'Smi%' AND t0.age BETWEEN 20 AND 55"
//! );
//! ```
//!
//! # Declaring Criteria
//!
//! A child contributes nothing unless declared as a criterion:
//!
//! | Call | Key written for child `foo` |
//! |------|-----------------------------|
//! | `criterion(None, None)` | `foo` |
//! | `criterion(Some("bar"), None)` | `bar` |
//! | `operator(">=")` | `foo >=` |
//! | `in_()`, `not_in()`, `between()` | `foo :in`, `foo :notin`, `foo :between` |
//! | `not_eq()`, `like()` | `foo !=`, `foo :like` |
//! | `start_with()`, `contains()` | `foo`, with a [`Like`](sieve_criteria::Like) value |
//!
//! Empty values (`null`, `""`, `[]`, `{}`) are skipped. `0`, `false` and
//! `" "` are not empty. A hydrator set explicitly on a child always wins
//! over its criterion declaration.
//!
//! # Backends
//!
//! [`FilterForm`] builds queries from a repository entity and
//! [`DocumentFilterForm`] from a document collection. Locators are injected
//! at construction or, failing that, read from [`ambient`].

pub mod ambient;
mod building;
mod child_builder;
mod error;
mod form;
mod form_builder;
mod hydrator;
mod spec;

pub use ambient::AmbientGuard;
pub use building::{ChildBuilding, FormBuilding};
pub use child_builder::FilterChildBuilder;
pub use error::{FilterError, Result};
pub use form::{BaseFilterForm, DocumentFilterForm, FilterForm, FilterSchema, FilterTarget};
pub use form_builder::FilterFormBuilder;
pub use hydrator::{is_criterion_value_empty, CriteriaHydrator, CriterionTransform, CustomWrite};
pub use spec::CriterionSpec;

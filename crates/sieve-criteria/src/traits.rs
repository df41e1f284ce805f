//! Query contracts consumed by filter forms.
//!
//! A filter only needs to hand its criteria to a query ([`Whereable`]).
//! Building a query from a backend and paginating it go through
//! [`QueryInterface`] and [`Paginable`].
//!
//! # Manual Implementation
//!
//! ```
//! use sieve_criteria::{Result, Value, Whereable};
//!
//! #[derive(Default)]
//! struct Recorder(Vec<String>);
//!
//! impl Whereable for Recorder {
//!     fn where_criteria(&mut self, criteria: &[(String, Value)]) -> Result<()> {
//!         self.0.extend(criteria.iter().map(|(k, _)| k.clone()));
//!         Ok(())
//!     }
//! }
//!
//! let mut recorder = Recorder::default();
//! recorder.where_criteria(&[("age :between".into(), Value::from(vec![20, 55]))]).unwrap();
//! assert_eq!(recorder.0, ["age :between"]);
//! ```

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::value::Value;

/// A query that accepts criteria.
pub trait Whereable {
    /// Adds the criteria as one AND-ed condition group.
    ///
    /// Implementations must either accept every entry or change nothing.
    fn where_criteria(&mut self, criteria: &[(String, Value)]) -> Result<()>;
}

/// A query built by a backend.
///
/// `Display` renders the compiled query (raw SQL, a filter document, ...)
/// for logging and inspection.
pub trait QueryInterface: Whereable + fmt::Display + Any {
    /// Returns the pagination capability, if this query supports it.
    fn as_paginable(&self) -> Option<&dyn Paginable> {
        None
    }

    /// Mutable access to the pagination capability.
    fn as_paginable_mut(&mut self) -> Option<&mut dyn Paginable> {
        None
    }

    /// Upcast for downcasting to the concrete query type.
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn QueryInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A query that supports limit/offset pagination.
pub trait Paginable {
    /// Maximum number of rows, if set.
    fn limit(&self) -> Option<usize>;

    /// One-based page number.
    fn page(&self) -> usize;

    /// Restricts the query to one page of `max_rows` rows.
    fn paginate(&mut self, max_rows: usize, page: usize);
}

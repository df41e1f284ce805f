//! Page-based view over a query.

use std::fmt;

use crate::traits::QueryInterface;

/// Page size used when a query carries no limit.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a paginable query.
///
/// The paginator owns the query, already restricted to the requested page.
/// Executing it is left to the backend.
pub struct Paginator {
    query: Box<dyn QueryInterface>,
    page: usize,
    max_rows: usize,
}

impl Paginator {
    /// Restricts `query` to `page` (one-based) of `max_rows` rows.
    ///
    /// Returns the query back if it is not paginable.
    pub fn new(
        mut query: Box<dyn QueryInterface>,
        max_rows: usize,
        page: usize,
    ) -> Result<Self, Box<dyn QueryInterface>> {
        let page = page.max(1);
        if query.as_paginable().is_none() {
            return Err(query);
        }
        if let Some(paginable) = query.as_paginable_mut() {
            paginable.paginate(max_rows, page);
        }

        Ok(Paginator {
            query,
            page,
            max_rows,
        })
    }

    /// The one-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_max_rows(&self) -> usize {
        self.max_rows
    }

    /// Rows skipped before this page, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.max_rows)
    }

    /// The paginated query.
    pub fn query(&self) -> &dyn QueryInterface {
        self.query.as_ref()
    }

    /// Downcasts the paginated query to its concrete type.
    pub fn query_as<Q: QueryInterface>(&self) -> Option<&Q> {
        self.query.as_any().downcast_ref::<Q>()
    }

    /// Consumes the paginator, returning the query.
    pub fn into_query(self) -> Box<dyn QueryInterface> {
        self.query
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("query", &self.query.to_string())
            .field("page", &self.page)
            .field("max_rows", &self.max_rows)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentQuery, SqlQuery};

    #[test]
    fn restricts_query_to_page() {
        let paginator = Paginator::new(Box::new(SqlQuery::new("person")), 15, 3).unwrap();

        assert_eq!(paginator.page(), 3);
        assert_eq!(paginator.page_max_rows(), 15);
        assert_eq!(paginator.offset(), 30);
        assert_eq!(
            paginator.query().to_string(),
            "SELECT t0.* FROM person t0 LIMIT 15 OFFSET 30"
        );
        assert!(paginator.query_as::<SqlQuery>().is_some());
    }

    #[test]
    fn page_zero_is_first_page() {
        let paginator = Paginator::new(Box::new(SqlQuery::new("person")), 10, 0).unwrap();
        assert_eq!(paginator.page(), 1);
        assert_eq!(paginator.offset(), 0);
    }

    #[test]
    fn last_representable_page() {
        let paginator =
            Paginator::new(Box::new(SqlQuery::new("person")), 15, usize::MAX).unwrap();
        assert_eq!(paginator.offset(), usize::MAX);
    }

    #[test]
    fn rejects_non_paginable_query() {
        let result = Paginator::new(Box::new(DocumentQuery::new("person")), 10, 1);
        assert!(result.is_err());
    }
}

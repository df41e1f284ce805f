//! SQL query builder.
//!
//! [`SqlQuery`] collects conditions and renders them as a `SELECT`
//! statement. It is the query flavour handed out by table repositories.

use std::any::Any;
use std::fmt;

use tracing::debug;

use crate::clause::Clause;
use crate::error::Result;
use crate::op::{split_key, Key, Op, QueryOption};
use crate::traits::{Paginable, QueryInterface, Whereable};
use crate::value::{Number, Value};

/// A condition of the WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single predicate.
    Clause(Clause),
    /// Predicates that must all hold.
    Group(Vec<Clause>),
}

/// Criteria entries compiled into clauses and query options.
#[derive(Debug, Default)]
pub(crate) struct CompiledCriteria {
    pub(crate) clauses: Vec<Clause>,
    pub(crate) limit: Option<usize>,
    pub(crate) offset: Option<usize>,
    pub(crate) page: Option<usize>,
}

impl CompiledCriteria {
    /// Compiles every entry; nothing is returned if one entry is invalid.
    pub(crate) fn compile(criteria: &[(String, Value)]) -> Result<Self> {
        let mut compiled = CompiledCriteria::default();

        for (key, value) in criteria {
            match split_key(key)? {
                Key::Predicate { field, op } => {
                    compiled.clauses.push(Clause::new(field, op, value.clone())?);
                }
                Key::Option(option) => {
                    let n = option_value(value);
                    match option {
                        QueryOption::Limit => compiled.limit = n,
                        QueryOption::Offset => compiled.offset = n,
                        QueryOption::Page => compiled.page = n,
                    }
                }
            }
        }

        Ok(compiled)
    }
}

fn option_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(Number::I64(n)) => usize::try_from(*n).ok(),
        Value::Number(Number::U64(n)) => usize::try_from(*n).ok(),
        Value::Number(Number::F64(n)) if *n >= 0.0 => Some(*n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A `SELECT` query on one table.
///
/// Each call to [`where_criteria`](Whereable::where_criteria) adds one
/// condition group; groups are AND-ed together and parenthesised when more
/// than one top-level condition exists.
///
/// # Example
///
/// ```
/// use sieve_criteria::{Like, Op, SqlQuery, Value, Whereable};
///
/// let mut query = SqlQuery::new("person");
/// query.where_criteria(&[
///     ("firstName".into(), Value::from(Like::new("J").escape().starts_with())),
///     ("age :between".into(), Value::from(vec![20, 55])),
/// ]).unwrap();
///
/// assert_eq!(
///     query.to_raw_sql(),
///     "SELECT t0.* FROM person t0 WHERE t0.firstName LIKE 'J%' AND t0.age BETWEEN 20 AND 55"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    table: String,
    alias: String,
    conditions: Vec<Condition>,
    limit: Option<usize>,
    offset: Option<usize>,
    page: Option<usize>,
}

impl SqlQuery {
    /// Creates a query selecting every row of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        SqlQuery {
            table: table.into(),
            alias: "t0".to_string(),
            conditions: Vec::new(),
            limit: None,
            offset: None,
            page: None,
        }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a single predicate.
    pub fn where_clause(
        &mut self,
        field: &str,
        op: Op,
        value: impl Into<Value>,
    ) -> Result<&mut Self> {
        let clause = Clause::new(field, op, value)?;
        self.conditions.push(Condition::Clause(clause));
        Ok(self)
    }

    /// Sets the maximum number of rows.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of rows to skip.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The queried table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The WHERE conditions.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the effective offset: explicit, or derived from the page.
    ///
    /// A derived offset saturates at `usize::MAX`.
    pub fn get_offset(&self) -> Option<usize> {
        match (self.offset, self.page, self.limit) {
            (Some(offset), _, _) => Some(offset),
            (None, Some(page), Some(limit)) if page > 1 => {
                Some((page - 1).saturating_mul(limit))
            }
            _ => None,
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Renders the query as SQL with inlined literals.
    pub fn to_raw_sql(&self) -> String {
        let mut sql = format!("SELECT {alias}.* FROM {} {alias}", self.table, alias = self.alias);

        let grouped = self.conditions.len() > 1;
        let parts: Vec<String> = self
            .conditions
            .iter()
            .filter_map(|condition| match condition {
                Condition::Clause(clause) => Some(clause.to_sql(&self.alias)),
                Condition::Group(clauses) if clauses.is_empty() => None,
                Condition::Group(clauses) => {
                    let inner: Vec<String> =
                        clauses.iter().map(|c| c.to_sql(&self.alias)).collect();
                    let inner = inner.join(" AND ");
                    if grouped && clauses.len() > 1 {
                        Some(format!("({})", inner))
                    } else {
                        Some(inner)
                    }
                }
            })
            .collect();

        if !parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&parts.join(" AND "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.get_offset().filter(|offset| *offset > 0) {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }
}

impl Whereable for SqlQuery {
    fn where_criteria(&mut self, criteria: &[(String, Value)]) -> Result<()> {
        let compiled = CompiledCriteria::compile(criteria)?;
        debug!(
            table = %self.table,
            clauses = compiled.clauses.len(),
            "adding criteria to sql query"
        );

        self.conditions.push(Condition::Group(compiled.clauses));
        if compiled.limit.is_some() {
            self.limit = compiled.limit;
        }
        if compiled.offset.is_some() {
            self.offset = compiled.offset;
        }
        if compiled.page.is_some() {
            self.page = compiled.page;
        }
        Ok(())
    }
}

impl Paginable for SqlQuery {
    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    fn paginate(&mut self, max_rows: usize, page: usize) {
        let page = page.max(1);
        self.limit = Some(max_rows);
        self.page = Some(page);
        self.offset = Some((page - 1).saturating_mul(max_rows));
    }
}

impl QueryInterface for SqlQuery {
    fn as_paginable(&self) -> Option<&dyn Paginable> {
        Some(self)
    }

    fn as_paginable_mut(&mut self) -> Option<&mut dyn Paginable> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw_sql())
    }
}

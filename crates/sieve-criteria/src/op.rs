//! Comparison operators encoded in criteria keys.
//!
//! A criteria key is either a bare attribute (`"name"`, equality) or an
//! attribute followed by a single space and an operator token
//! (`"age :between"`, `"score >="`). [`Op::parse`] maps tokens to operators
//! and [`split_key`] splits a key at its last space.

use crate::error::{CriteriaError, Result};

/// Comparison operator of a criterion.
///
/// Operators are grouped by the values they accept:
/// - **Scalar**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`
/// - **Set**: `In`, `NotIn` - a list (or a single scalar)
/// - **Range**: `Between`, `NotBetween` - a list of exactly two bounds
/// - **Pattern**: `Like`, `NotLike` - a string pattern or a `Like` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Member of a set.
    In,
    /// Not member of a set.
    NotIn,
    /// Inside an inclusive range.
    Between,
    /// Outside an inclusive range.
    NotBetween,
    /// Matches a pattern.
    Like,
    /// Does not match a pattern.
    NotLike,
}

impl Op {
    /// Parses an operator token (`">="`, `":in"`, `"!="`, ...).
    ///
    /// Returns `None` for unknown tokens.
    pub fn parse(token: &str) -> Option<Op> {
        let op = match token {
            "=" | ":eq" => Op::Eq,
            "!=" | "<>" | ":ne" | ":neq" => Op::Ne,
            ">" | ":gt" => Op::Gt,
            ">=" | ":gte" => Op::Gte,
            "<" | ":lt" => Op::Lt,
            "<=" | ":lte" => Op::Lte,
            ":in" => Op::In,
            ":notin" => Op::NotIn,
            ":between" => Op::Between,
            ":notbetween" => Op::NotBetween,
            ":like" => Op::Like,
            ":notlike" => Op::NotLike,
            _ => return None,
        };
        Some(op)
    }

    /// Returns `true` for operators that take a list of two bounds.
    pub fn is_range_op(self) -> bool {
        matches!(self, Op::Between | Op::NotBetween)
    }

    /// Returns `true` for set membership operators.
    pub fn is_set_op(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Returns the negated operator.
    pub fn negate(self) -> Op {
        match self {
            Op::Eq => Op::Ne,
            Op::Ne => Op::Eq,
            Op::Gt => Op::Lte,
            Op::Gte => Op::Lt,
            Op::Lt => Op::Gte,
            Op::Lte => Op::Gt,
            Op::In => Op::NotIn,
            Op::NotIn => Op::In,
            Op::Between => Op::NotBetween,
            Op::NotBetween => Op::Between,
            Op::Like => Op::NotLike,
            Op::NotLike => Op::Like,
        }
    }

    /// Returns the canonical key token of this operator.
    pub fn token(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => ":in",
            Op::NotIn => ":notin",
            Op::Between => ":between",
            Op::NotBetween => ":notbetween",
            Op::Like => ":like",
            Op::NotLike => ":notlike",
        }
    }

    /// Returns the SQL keyword or symbol of this operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Query options that may appear as criteria keys instead of predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOption {
    /// Maximum number of rows (`:limit`).
    Limit,
    /// Number of rows to skip (`:offset`).
    Offset,
    /// One-based page number (`:page`).
    Page,
}

/// A parsed criteria key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// A predicate on an attribute.
    Predicate { field: &'a str, op: Op },
    /// A query option.
    Option(QueryOption),
}

/// Splits a criteria key into its attribute and operator.
///
/// The operator is the token after the last space. Keys without a space
/// are equality predicates, except `:limit`, `:offset` and `:page`.
///
/// ```
/// use sieve_criteria::{split_key, Key, Op};
///
/// assert_eq!(
///     split_key("age :between").unwrap(),
///     Key::Predicate { field: "age", op: Op::Between }
/// );
/// assert_eq!(
///     split_key("name").unwrap(),
///     Key::Predicate { field: "name", op: Op::Eq }
/// );
/// ```
pub fn split_key(key: &str) -> Result<Key<'_>> {
    let unknown = |token: &str| CriteriaError::UnknownOperator {
        key: key.to_string(),
        token: token.to_string(),
    };

    if let Some((field, token)) = key.rsplit_once(' ') {
        let field = field.trim_end();
        let op = Op::parse(token).ok_or_else(|| unknown(token))?;
        return Ok(Key::Predicate { field, op });
    }

    if key.starts_with(':') {
        let option = match key {
            ":limit" => QueryOption::Limit,
            ":offset" => QueryOption::Offset,
            ":page" => QueryOption::Page,
            other => return Err(unknown(other)),
        };
        return Ok(Key::Option(option));
    }

    Ok(Key::Predicate {
        field: key,
        op: Op::Eq,
    })
}

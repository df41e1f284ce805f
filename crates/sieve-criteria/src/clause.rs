//! Clause types for query predicates.
//!
//! A [`Clause`] is one compiled criteria entry: a field name, an operator
//! and a checked value. Clauses render themselves as SQL fragments or as
//! document-filter parts.

use serde_json::json;

use crate::error::{CriteriaError, Result};
use crate::like::Like;
use crate::op::{split_key, Key, Op};
use crate::value::Value;

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use sieve_criteria::{Clause, Op, Value};
///
/// let clause = Clause::new("age", Op::Between, vec![20, 55]).unwrap();
/// assert_eq!(clause.to_sql("t0"), "t0.age BETWEEN 20 AND 55");
///
/// // Ranges need exactly two bounds
/// assert!(Clause::new("age", Op::Between, 20).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    field: String,
    op: Op,
    value: Value,
}

/// Part of a document filter produced by a clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DocumentPart {
    /// A `field => condition` entry.
    Field(String, serde_json::Value),
    /// Conditions that must all hold, appended to `$and`.
    All(Vec<serde_json::Value>),
}

impl Clause {
    /// Creates a clause, checking that the value fits the operator.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<Value>) -> Result<Self> {
        let clause = Clause {
            field: field.into(),
            op,
            value: value.into(),
        };
        clause.check()?;
        Ok(clause)
    }

    /// Parses an operator-suffixed criteria key (`"age :between"`) into a clause.
    ///
    /// Query option keys (`:limit`, ...) are not predicates and are rejected.
    pub fn parse(key: &str, value: impl Into<Value>) -> Result<Self> {
        match split_key(key)? {
            Key::Predicate { field, op } => Clause::new(field, op, value),
            Key::Option(_) => Err(CriteriaError::UnknownOperator {
                key: key.to_string(),
                token: key.to_string(),
            }),
        }
    }

    /// The field name to compare.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The value to compare against.
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn check(&self) -> Result<()> {
        let invalid = |reason: &'static str| -> Result<()> {
            Err(CriteriaError::InvalidValue {
                field: self.field.clone(),
                op: self.op.token(),
                reason,
            })
        };

        if matches!(self.value, Value::Map(_)) {
            return invalid("maps cannot be compared");
        }

        if self.op.is_range_op() {
            return match self.range_bounds() {
                Some(_) => Ok(()),
                None => invalid("expects a list of two bounds"),
            };
        }
        // Sets take a list or a single scalar
        if self.op.is_set_op() {
            return Ok(());
        }

        match self.op {
            Op::Like | Op::NotLike => match &self.value {
                Value::String(_) | Value::Like(_) => Ok(()),
                _ => invalid("expects a string pattern"),
            },
            Op::Gt | Op::Gte | Op::Lt | Op::Lte => match &self.value {
                Value::Number(_) | Value::String(_) | Value::Bool(_) => Ok(()),
                _ => invalid("expects a scalar"),
            },
            _ => Ok(()),
        }
    }

    /// The lower and upper bounds of a range clause.
    fn range_bounds(&self) -> Option<(&Value, &Value)> {
        if !self.op.is_range_op() {
            return None;
        }
        match &self.value {
            Value::List(bounds) => match bounds.as_slice() {
                [lo, hi] => Some((lo, hi)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Renders this clause as a SQL condition on `alias.field`.
    pub fn to_sql(&self, alias: &str) -> String {
        let column = format!("{}.{}", alias, self.field);

        if let Some((lo, hi)) = self.range_bounds() {
            return format!(
                "{} {} {} AND {}",
                column,
                self.op.as_sql(),
                literal(lo),
                literal(hi)
            );
        }

        match (self.op, &self.value) {
            (Op::Eq, Value::Null) => format!("{} IS NULL", column),
            (Op::Ne, Value::Null) => format!("{} IS NOT NULL", column),
            (Op::Eq, Value::List(items)) => in_sql(&column, Op::In, items),
            (Op::Ne, Value::List(items)) => in_sql(&column, Op::NotIn, items),
            (Op::Eq, Value::Like(like)) => like_sql(&column, Op::Like, like),
            (Op::Ne, Value::Like(like)) => like_sql(&column, Op::NotLike, like),
            (Op::In | Op::NotIn, Value::List(items)) => in_sql(&column, self.op, items),
            (Op::In | Op::NotIn, scalar) => {
                in_sql(&column, self.op, std::slice::from_ref(scalar))
            }
            (Op::Like | Op::NotLike, Value::Like(like)) => like_sql(&column, self.op, like),
            (op, value) => format!("{} {} {}", column, op.as_sql(), literal(value)),
        }
    }

    pub(crate) fn to_document(&self) -> DocumentPart {
        let field = self.field.clone();
        let value = &self.value;

        if let Some((lo, hi)) = self.range_bounds() {
            let part = if self.op == Op::Between {
                vec![
                    json!({ field.as_str(): { "$gte": lo.to_json() } }),
                    json!({ field.as_str(): { "$lte": hi.to_json() } }),
                ]
            } else {
                vec![json!({ "$or": [
                    { field.as_str(): { "$lt": lo.to_json() } },
                    { field.as_str(): { "$gt": hi.to_json() } },
                ] })]
            };
            return DocumentPart::All(part);
        }

        let condition = match (self.op, value) {
            (Op::Eq, Value::Like(like)) => regex_condition(like),
            (Op::Eq, Value::List(items)) => json!({ "$in": json_list(items) }),
            (Op::Eq, other) => other.to_json(),
            (Op::Ne, Value::Like(like)) => json!({ "$not": regex_condition(like) }),
            (Op::Ne, Value::List(items)) => json!({ "$nin": json_list(items) }),
            (Op::Ne, other) => json!({ "$ne": other.to_json() }),
            (Op::Gt, other) => json!({ "$gt": other.to_json() }),
            (Op::Gte, other) => json!({ "$gte": other.to_json() }),
            (Op::Lt, other) => json!({ "$lt": other.to_json() }),
            (Op::Lte, other) => json!({ "$lte": other.to_json() }),
            (Op::In, Value::List(items)) => json!({ "$in": json_list(items) }),
            (Op::In, other) => json!({ "$in": [other.to_json()] }),
            (Op::NotIn, Value::List(items)) => json!({ "$nin": json_list(items) }),
            (Op::NotIn, other) => json!({ "$nin": [other.to_json()] }),
            (Op::Like, Value::Like(like)) => regex_condition(like),
            (Op::Like, Value::String(pattern)) => regex_condition(&Like::new(pattern.as_str())),
            (Op::NotLike, Value::Like(like)) => json!({ "$not": regex_condition(like) }),
            (Op::NotLike, Value::String(pattern)) => {
                json!({ "$not": regex_condition(&Like::new(pattern.as_str())) })
            }
            // Rejected by `check`
            (_, other) => other.to_json(),
        };

        DocumentPart::Field(field, condition)
    }
}

fn in_sql(column: &str, op: Op, items: &[Value]) -> String {
    if items.is_empty() {
        // An empty set matches nothing (IN) or everything (NOT IN)
        let always = if op == Op::In { "1 = 0" } else { "1 = 1" };
        return always.to_string();
    }
    let list: Vec<String> = items.iter().map(literal).collect();
    format!("{} {} ({})", column, op.as_sql(), list.join(", "))
}

fn like_sql(column: &str, op: Op, like: &Like) -> String {
    format!("{} {} {}", column, op.as_sql(), quote(&like.sql_pattern()))
}

fn regex_condition(like: &Like) -> serde_json::Value {
    json!({ "$regex": like.regex_pattern(), "$options": "i" })
}

fn json_list(items: &[Value]) -> serde_json::Value {
    serde_json::Value::Array(items.iter().map(Value::to_json).collect())
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Renders a value as a SQL literal.
pub(crate) fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Like(like) => quote(&like.sql_pattern()),
        Value::List(items) => {
            let list: Vec<String> = items.iter().map(literal).collect();
            format!("({})", list.join(", "))
        }
        Value::Map(_) => quote(&value.to_json().to_string()),
    }
}

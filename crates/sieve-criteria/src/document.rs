//! Document-store query builder.
//!
//! [`DocumentQuery`] compiles criteria into a filter document in the
//! operator dialect of document databases (`$regex`, `$in`, `$and`, ...).
//! Compiling yields a [`ReadQuery`], ready to be handed to a driver.

use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value as Json};
use tracing::debug;

use crate::clause::{Clause, DocumentPart};
use crate::error::Result;
use crate::query::CompiledCriteria;
use crate::traits::{QueryInterface, Whereable};
use crate::value::Value;

/// A compiled read on one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadQuery {
    /// The collection name.
    pub collection: String,
    /// The filter document.
    pub filter: Json,
}

/// A query on a document collection.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve_criteria::{DocumentQuery, Like, Value, Whereable};
///
/// let mut query = DocumentQuery::new("person");
/// query.where_criteria(&[
///     ("firstName".into(), Value::from(Like::new("J").escape().starts_with())),
///     ("age :between".into(), Value::from(vec![20, 55])),
/// ]).unwrap();
///
/// assert_eq!(query.compile().filter, json!({
///     "firstName": {"$regex": "^J.*$", "$options": "i"},
///     "$and": [{"age": {"$gte": 20}}, {"age": {"$lte": 55}}],
/// }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    collection: String,
    groups: Vec<Vec<Clause>>,
}

impl DocumentQuery {
    /// Creates a query matching every document of `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        DocumentQuery {
            collection: collection.into(),
            groups: Vec::new(),
        }
    }

    /// The queried collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Compiles the condition groups into a read query.
    pub fn compile(&self) -> ReadQuery {
        let mut filters: Vec<Json> = self
            .groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(|group| group_filter(group))
            .collect();

        let filter = match filters.len() {
            0 => Json::Object(Map::new()),
            1 => filters.remove(0),
            _ => json!({ "$and": filters }),
        };

        ReadQuery {
            collection: self.collection.clone(),
            filter,
        }
    }
}

fn group_filter(clauses: &[Clause]) -> Json {
    let mut filter = Map::new();
    let mut all = Vec::new();

    for clause in clauses {
        match clause.to_document() {
            DocumentPart::Field(field, condition) => {
                if filter.contains_key(&field) {
                    // Same field twice: both conditions must hold
                    all.push(json!({ field: condition }));
                } else {
                    filter.insert(field, condition);
                }
            }
            DocumentPart::All(conditions) => all.extend(conditions),
        }
    }

    if !all.is_empty() {
        filter.insert("$and".to_string(), Json::Array(all));
    }
    Json::Object(filter)
}

impl Whereable for DocumentQuery {
    fn where_criteria(&mut self, criteria: &[(String, Value)]) -> Result<()> {
        // Options have no meaning without pagination support
        let compiled = CompiledCriteria::compile(criteria)?;
        debug!(
            collection = %self.collection,
            clauses = compiled.clauses.len(),
            "adding criteria to document query"
        );
        self.groups.push(compiled.clauses);
        Ok(())
    }
}

impl QueryInterface for DocumentQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for DocumentQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compile().filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Criteria, Like};

    #[test]
    fn empty_query_matches_all() {
        let query = DocumentQuery::new("person");
        assert_eq!(query.compile().filter, json!({}));
        assert_eq!(query.to_string(), "{}");
    }

    #[test]
    fn person_filter() {
        let mut query = DocumentQuery::new("person");
        let criteria = Criteria::from([
            ("firstName", Value::from(Like::new("J").escape().starts_with())),
            ("lastName", Value::from(Like::new("Smi").escape().starts_with())),
            ("age :between", Value::from(vec![20, 55])),
        ]);
        query.where_criteria(criteria.all()).unwrap();

        assert_eq!(
            query.compile(),
            ReadQuery {
                collection: "person".into(),
                filter: json!({
                    "firstName": {"$regex": "^J.*$", "$options": "i"},
                    "lastName": {"$regex": "^Smi.*$", "$options": "i"},
                    "$and": [{"age": {"$gte": 20}}, {"age": {"$lte": 55}}],
                }),
            }
        );
    }

    #[test]
    fn repeated_field_goes_to_and() {
        let mut query = DocumentQuery::new("person");
        query
            .where_criteria(Criteria::from([("age >", 20), ("age <", 55)]).all())
            .unwrap();

        assert_eq!(
            query.compile().filter,
            json!({
                "age": {"$gt": 20},
                "$and": [{"age": {"$lt": 55}}],
            })
        );
    }

    #[test]
    fn groups_are_combined_with_and() {
        let mut query = DocumentQuery::new("person");
        query
            .where_criteria(Criteria::from([("name", "bar")]).all())
            .unwrap();
        query
            .where_criteria(Criteria::from([("id :in", vec![1, 2])]).all())
            .unwrap();

        assert_eq!(
            query.compile().filter,
            json!({"$and": [{"name": "bar"}, {"id": {"$in": [1, 2]}}]})
        );
    }

    #[test]
    fn not_paginable() {
        let query = DocumentQuery::new("person");
        assert!(query.as_paginable().is_none());
    }

    #[test]
    fn read_query_serializes() {
        let mut query = DocumentQuery::new("person");
        query
            .where_criteria(Criteria::from([("name !=", "bar")]).all())
            .unwrap();

        let json = serde_json::to_value(query.compile()).unwrap();
        assert_eq!(
            json,
            json!({"collection": "person", "filter": {"name": {"$ne": "bar"}}})
        );
    }
}

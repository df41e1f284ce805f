//! Cross-module tests for the criteria crate.

use std::sync::Arc;

use serde_json::json;
use sieve_criteria::{
    CollectionLocator, CollectionRegistry, Criteria, CriteriaError, DocumentQuery, Like, LikeKind,
    NamedCollection, Number, Op, Paginable, Paginator, QueryInterface, RepositoryLocator,
    ServiceLocator, SqlQuery, TableRepository, Value, Whereable, DEFAULT_PAGE_SIZE,
};

fn person_criteria() -> Criteria {
    let mut criteria = Criteria::new();
    criteria
        .add("firstName", Like::new("J").escape().starts_with())
        .add("lastName", Like::new("Smi").escape().starts_with())
        .add("age :between", vec![20, 55]);
    criteria
}

// ============================================================================
// Value coverage
// ============================================================================

#[test]
fn value_conversions() {
    assert_eq!(Value::from(Some(3)), Value::Number(Number::I64(3)));
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(2.5), Value::Number(Number::F64(2.5)));
    assert_eq!(Value::from(json!({"a": 1})).type_name(), "map");
    assert_eq!(Value::from(json!([1, "x"])).as_list().map(<[Value]>::len), Some(2));
}

#[test]
fn like_value_renders_sql_pattern_in_json() {
    let value = Value::from(Like::new("Smi").escape().starts_with());
    assert_eq!(value.to_json(), json!("Smi%"));
    assert_eq!(value.as_like().map(Like::kind), Some(LikeKind::StartsWith));
}

// ============================================================================
// SQL rendering
// ============================================================================

#[test]
fn sql_person_filter() {
    let mut query = SqlQuery::new("person");
    query.where_criteria(person_criteria().all()).unwrap();

    assert_eq!(
        query.to_string(),
        "SELECT t0.* FROM person t0 WHERE t0.firstName LIKE 'J%' AND t0.lastName LIKE 'Smi%' AND t0.age BETWEEN 20 AND 55"
    );
}

#[test]
fn sql_custom_query_then_criteria_then_pagination() {
    let mut query = SqlQuery::new("person");
    query.where_clause("firstName", Op::Lt, "ZZZ").unwrap();
    query.where_criteria(person_criteria().all()).unwrap();

    let paginator = Paginator::new(Box::new(query), 15, 3).unwrap();
    assert_eq!(
        paginator.query().to_string(),
        "SELECT t0.* FROM person t0 WHERE t0.firstName < 'ZZZ' AND (t0.firstName LIKE 'J%' AND t0.lastName LIKE 'Smi%' AND t0.age BETWEEN 20 AND 55) LIMIT 15 OFFSET 30"
    );
}

#[test]
fn sql_comparison_tokens() {
    let mut query = SqlQuery::new("t");
    query
        .where_criteria(
            Criteria::from([
                ("a >", Value::from(1)),
                ("b <=", Value::from(2)),
                ("c !=", Value::from("x")),
                ("d :notin", Value::from(vec![1, 2])),
                ("e :like", Value::from("ab%")),
                ("f", Value::Null),
            ])
            .all(),
        )
        .unwrap();

    assert_eq!(
        query.to_raw_sql(),
        "SELECT t0.* FROM t t0 WHERE t0.a > 1 AND t0.b <= 2 AND t0.c != 'x' AND t0.d NOT IN (1, 2) AND t0.e LIKE 'ab%' AND t0.f IS NULL"
    );
}

#[test]
fn unknown_operator_error_message() {
    let mut query = SqlQuery::new("t");
    let err = query
        .where_criteria(Criteria::from([("age ~", 1)]).all())
        .unwrap_err();

    assert!(matches!(err, CriteriaError::UnknownOperator { .. }));
    assert_eq!(err.to_string(), "unknown operator '~' in criteria key 'age ~'");
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn paginable_capability() {
    let sql: Box<dyn QueryInterface> = Box::new(SqlQuery::new("person"));
    let doc: Box<dyn QueryInterface> = Box::new(DocumentQuery::new("person"));

    assert!(sql.as_paginable().is_some());
    assert!(doc.as_paginable().is_none());
}

#[test]
fn page_size_defaults_when_query_has_no_limit() {
    let query = SqlQuery::new("person");
    let max_rows = Paginable::limit(&query).unwrap_or(DEFAULT_PAGE_SIZE);
    let paginator = Paginator::new(Box::new(query), max_rows, 1).unwrap();

    assert_eq!(paginator.page_max_rows(), 10);
    assert_eq!(
        paginator.query().to_string(),
        "SELECT t0.* FROM person t0 LIMIT 10"
    );
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn repository_builds_whereable_queries() {
    let locator = ServiceLocator::new();
    locator.register_repository("Person", Arc::new(TableRepository::new("person")));

    let repository = locator.repository("Person").unwrap();
    let mut query = repository.builder();
    query
        .where_criteria(Criteria::from([("name", "Smith")]).all())
        .unwrap();

    assert_eq!(
        query.to_string(),
        "SELECT t0.* FROM person t0 WHERE t0.name = 'Smith'"
    );
}

#[test]
fn collection_builds_document_queries() {
    let registry = CollectionRegistry::new();
    registry.register_collection("Person", Arc::new(NamedCollection::new("person")));

    let mut query = registry.collection("Person").unwrap().query();
    query.where_criteria(person_criteria().all()).unwrap();

    let document = query.as_any().downcast_ref::<DocumentQuery>().unwrap();
    assert_eq!(
        document.compile().filter,
        json!({
            "firstName": {"$regex": "^J.*$", "$options": "i"},
            "lastName": {"$regex": "^Smi.*$", "$options": "i"},
            "$and": [{"age": {"$gte": 20}}, {"age": {"$lte": 55}}],
        })
    );
}

//! Property-based tests for criteria emission using proptest.

use proptest::prelude::*;
use serde_json::{json, Value as Json};
use sieve::{is_criterion_value_empty, BaseFilterForm, FilterFormBuilder, FilterTarget, FormBuilding};
use sieve_criteria::{Criteria, Value};

/// Submits `raw` to a form with one criterion child `foo` built by `declare`.
fn emitted<F>(declare: F, raw: Json) -> Criteria
where
    F: Fn(&mut FilterFormBuilder),
{
    let schema = move |builder: &mut FilterFormBuilder, _: &mut FilterTarget| declare(builder);
    let mut form = BaseFilterForm::new(&schema);
    form.submit(&json!({ "foo": raw }));
    assert!(form.valid(), "{:?}", form.errors());
    form.value().unwrap()
}

fn string_criterion(builder: &mut FilterFormBuilder) {
    builder.string("foo", None).criterion(None, None);
}

fn integer_criterion(builder: &mut FilterFormBuilder) {
    builder.integer("foo", None).criterion(None, None);
}

fn float_criterion(builder: &mut FilterFormBuilder) {
    builder.float("foo", None).criterion(None, None);
}

fn boolean_criterion(builder: &mut FilterFormBuilder) {
    builder.boolean("foo").operator("!=");
}

fn plain_string(builder: &mut FilterFormBuilder) {
    builder.string("foo", None);
}

proptest! {
    /// A string emits a predicate iff it has at least one character.
    #[test]
    fn strings_emit_iff_non_empty(text in ".{0,8}") {
        let criteria = emitted(string_criterion, json!(text));
        if text.is_empty() {
            prop_assert!(criteria.is_empty());
        } else {
            prop_assert_eq!(criteria, Criteria::from([("foo", text.as_str())]));
        }
    }

    /// Whitespace is content.
    #[test]
    fn whitespace_emits(text in "[ \t]{1,4}") {
        let criteria = emitted(string_criterion, json!(text));
        prop_assert_eq!(criteria.len(), 1);
    }

    /// Integers always emit, zero included.
    #[test]
    fn integers_always_emit(n in any::<i64>()) {
        let criteria = emitted(integer_criterion, json!(n));
        prop_assert_eq!(criteria, Criteria::from([("foo", n)]));
    }

    /// Floats always emit, `0.0` included.
    #[test]
    fn floats_always_emit(n in -1.0e9f64..1.0e9f64) {
        let criteria = emitted(float_criterion, json!(n));
        prop_assert_eq!(criteria.len(), 1);
        prop_assert!(criteria.contains_key("foo"));
    }

    /// Booleans always emit, `false` included.
    #[test]
    fn booleans_always_emit(b in any::<bool>()) {
        let criteria = emitted(boolean_criterion, json!(b));
        prop_assert_eq!(criteria, Criteria::from([("foo !=", b)]));
    }

    /// A child never declared as a criterion contributes nothing.
    #[test]
    fn plain_children_never_emit(text in ".{0,8}") {
        prop_assert!(emitted(plain_string, json!(text)).is_empty());
    }

    /// Scalars are never empty for the criteria.
    #[test]
    fn scalars_are_not_empty(n in any::<i64>(), b in any::<bool>()) {
        prop_assert!(!is_criterion_value_empty(&json!(n)));
        prop_assert!(!is_criterion_value_empty(&json!(b)));
    }

    /// Lists are empty iff they have no item.
    #[test]
    fn lists_are_empty_iff_no_items(items in prop::collection::vec(any::<i32>(), 0..4)) {
        prop_assert_eq!(is_criterion_value_empty(&json!(items)), items.is_empty());
    }
}

#[test]
fn zero_values_emit() {
    assert_eq!(
        emitted(integer_criterion, json!(0)),
        Criteria::from([("foo", 0)])
    );
    assert_eq!(
        emitted(float_criterion, json!(0.0)),
        Criteria::from([("foo", Value::from(0.0))])
    );
    assert_eq!(
        emitted(boolean_criterion, json!(false)),
        Criteria::from([("foo !=", false)])
    );
}

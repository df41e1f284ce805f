//! Integration tests for form submission and hydration.

use std::any::Any;

use proptest::prelude::*;
use serde_json::{json, Value as Json};
use sieve_form::{
    is_input_value_empty, Child, ChildParts, ElementKind, FormBuilder, FormError, SubmissionState,
};

#[derive(Debug, Default, PartialEq)]
struct Search {
    terms: Vec<(String, Json)>,
}

fn search_hydrator(target: &mut dyn Any, child: &Child) -> Result<(), FormError> {
    let search = target
        .downcast_mut::<Search>()
        .ok_or_else(FormError::type_mismatch::<Search>)?;
    search
        .terms
        .push((child.name().to_string(), child.value().clone()));
    Ok(())
}

#[test]
fn custom_target_through_generator() {
    let mut builder = FormBuilder::new();
    builder.generates(|| Ok(Box::new(Search::default()) as Box<dyn Any>));
    builder.string("name", None).hydrator(search_hydrator);
    builder.boolean("active").hydrator(search_hydrator);
    builder.string("ignored", None);

    let mut form = builder.build_element();
    form.submit(&json!({"name": "Smith", "active": "yes", "ignored": "x"}));

    assert!(form.valid());
    assert_eq!(
        form.value_as::<Search>().unwrap(),
        Search {
            terms: vec![
                ("name".to_string(), json!("Smith")),
                ("active".to_string(), json!(true)),
            ]
        }
    );
}

#[test]
fn hydrator_on_wrong_target_fails() {
    let mut builder = FormBuilder::new();
    builder.string("name", None).hydrator(search_hydrator);

    let mut form = builder.build_element();
    form.submit(&json!({"name": "Smith"}));

    let err = form.value().unwrap_err();
    assert!(matches!(err, FormError::TypeMismatch { expected } if expected.ends_with("Search")));
}

#[test]
fn fill_is_repeatable() {
    let mut builder = FormBuilder::new();
    builder.string("name", None).setter(None);

    let mut form = builder.build_element();
    form.submit(&json!({"name": "Smith"}));

    let first = form.value_as::<Json>().unwrap();
    let second = form.value_as::<Json>().unwrap();
    assert_eq!(first, second);
}

#[test]
fn resubmission_resets_state() {
    let mut builder = FormBuilder::new();
    builder.integer("page", None);

    let mut form = builder.build_element();
    form.submit(&json!({"page": "x"}));
    assert_eq!(form.state(), SubmissionState::Submitted { valid: false });

    form.submit(&json!({"page": "2"}));
    assert!(form.valid());
    assert_eq!(form.child("page").unwrap().value(), &json!(2));
}

#[test]
fn factory_can_replace_hydrator() {
    let mut builder = FormBuilder::new();
    builder
        .string("name", None)
        .child_factory(|mut parts: ChildParts| {
            if parts.hydrator.is_none() {
                parts.hydrator = Some(std::rc::Rc::new(search_hydrator));
            }
            parts.into_child()
        });

    let form = builder.build_element();
    assert!(form.child("name").unwrap().has_hydrator());
}

#[test]
fn array_payload_feeds_indexed_children() {
    let mut builder = FormBuilder::new();
    builder.generates_value(json!([]));
    builder.integer("0", None).setter(None);
    builder.integer("1", None).setter(None);

    let mut form = builder.build_element();
    form.submit(&json!(["20", "55"]));

    assert_eq!(form.value_as::<Json>().unwrap(), json!([20, 55]));
}

#[test]
fn array_child_with_leaf_kind() {
    let mut builder = FormBuilder::new();
    builder
        .array("ids", Some(ElementKind::Integer))
        .setter(None);

    let mut form = builder.build_element();
    form.submit(&json!({"ids": ["1", "2"]}));

    assert_eq!(form.value_as::<Json>().unwrap(), json!({"ids": [1, 2]}));
}

proptest! {
    /// Strings are empty input exactly when they have no characters.
    #[test]
    fn string_input_emptiness(s in ".*") {
        prop_assert_eq!(is_input_value_empty(&json!(s)), s.is_empty());
    }

    /// Numbers are never empty input.
    #[test]
    fn numbers_are_never_empty(n in any::<i64>(), f in -1e9f64..1e9) {
        prop_assert!(!is_input_value_empty(&json!(n)));
        prop_assert!(!is_input_value_empty(&json!(f)));
    }
}

//! Criterion declarations on a child.
//!
//! [`FilterChildBuilder`] wraps a form [`ChildBuilder`] and records how the
//! child maps to a criterion. Every other declaration call is forwarded to
//! the wrapped builder through [`ChildBuilding`].
//!
//! ```
//! use sieve::{ChildBuilding, FilterFormBuilder, FormBuilding};
//!
//! let mut builder = FilterFormBuilder::new();
//! builder.integer("minAge", None).criterion(Some("age"), None).operator(">=");
//! builder.array("status", None).in_();
//! builder.string("name", None).required().start_with();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value as Json;
use sieve_criteria::{Criteria, Like, Value};
use sieve_form::{is_input_value_empty, Child, ChildBuilder, ChildFactory, Hydrator};

use crate::building::ChildBuilding;
use crate::hydrator::{CriteriaHydrator, CriterionTransform};
use crate::spec::{CriterionFactory, CriterionSpec};

/// A child builder that can declare the child as a criterion.
pub struct FilterChildBuilder<'a> {
    inner: &'a mut ChildBuilder,
    spec: Rc<RefCell<CriterionSpec>>,
}

impl<'a> FilterChildBuilder<'a> {
    /// Wraps `inner`, installing the factory that compiles the criterion.
    pub fn wrap(inner: &'a mut ChildBuilder) -> Self {
        let spec = Rc::new(RefCell::new(CriterionSpec::new()));
        ChildBuilder::child_factory(inner, CriterionFactory::new(Rc::clone(&spec), None));
        FilterChildBuilder { inner, spec }
    }

    /// A snapshot of the criterion declared so far.
    pub fn spec(&self) -> CriterionSpec {
        self.spec.borrow().clone()
    }

    // ========================================================================
    // Criterion declaration
    // ========================================================================

    /// Declares the child as a criterion.
    ///
    /// `name` replaces the child name as criteria attribute; `transform`
    /// rewrites the value. Either is kept as is when not given.
    pub fn criterion(self, name: Option<&str>, transform: Option<CriterionTransform>) -> Self {
        self.spec.borrow_mut().mark(name, transform);
        self
    }

    /// Declares the child as a criterion whose value is rewritten by `transform`.
    pub fn transform<F>(self, transform: F) -> Self
    where
        F: Fn(Value, &Child) -> Value + 'static,
    {
        self.criterion(None, Some(Rc::new(transform)))
    }

    /// Declares the child as a criterion written by `write` instead of
    /// `add(key, value)`.
    pub fn custom_write<F>(self, write: F) -> Self
    where
        F: Fn(&mut Criteria, Value, &CriteriaHydrator) + 'static,
    {
        self.spec.borrow_mut().set_custom_write(Rc::new(write));
        self
    }

    /// Declares the child as a criterion compared with `token` (`">="`, `":in"`...).
    pub fn operator(self, token: &str) -> Self {
        self.spec.borrow_mut().set_operator(token);
        self
    }

    /// Value is one of a list (`:in`).
    pub fn in_(self) -> Self {
        self.operator(":in")
    }

    /// Value is none of a list (`:notin`).
    pub fn not_in(self) -> Self {
        self.operator(":notin")
    }

    /// Value is within a two-bound range (`:between`).
    ///
    /// Usually declared on an embedded child generating a two-item array.
    pub fn between(self) -> Self {
        self.operator(":between")
    }

    /// Value differs (`!=`).
    pub fn not_eq(self) -> Self {
        self.operator("!=")
    }

    /// Value matches a raw LIKE pattern (`:like`).
    pub fn like(self) -> Self {
        self.operator(":like")
    }

    /// Value starts with the submitted text, wildcards escaped.
    pub fn start_with(self) -> Self {
        self.transform(like_transform(true, Like::starts_with))
    }

    /// Value starts with the submitted text, wildcards honoured.
    pub fn start_with_unescaped(self) -> Self {
        self.transform(like_transform(false, Like::starts_with))
    }

    /// Value contains the submitted text, wildcards escaped.
    pub fn contains(self) -> Self {
        self.transform(like_transform(true, Like::contains))
    }

    /// Value contains the submitted text, wildcards honoured.
    pub fn contains_unescaped(self) -> Self {
        self.transform(like_transform(false, Like::contains))
    }
}

/// Builds a pattern from the submitted text.
///
/// The transform checks the raw child value itself: [`CriteriaHydrator`]
/// already skips empty values before transforming, so the `Null` branch
/// only matters when the transform is called outside a fill.
fn like_transform(escape: bool, shape: fn(Like) -> Like) -> impl Fn(Value, &Child) -> Value {
    move |value: Value, child: &Child| {
        if is_input_value_empty(child.value()) {
            return Value::Null;
        }
        match value.to_text() {
            Some(text) => Value::from(shape(Like::new(text).escaped(escape))),
            None => value,
        }
    }
}

impl<'a> ChildBuilding for FilterChildBuilder<'a> {
    fn hydrator<H: Hydrator + 'static>(self, hydrator: H) -> Self {
        ChildBuilder::hydrator(self.inner, hydrator);
        self
    }

    fn setter(self, property: Option<&str>) -> Self {
        ChildBuilder::setter(self.inner, property);
        self
    }

    fn default<V: Into<Json>>(self, value: V) -> Self {
        ChildBuilder::default(self.inner, value);
        self
    }

    fn satisfy<F>(self, constraint: F) -> Self
    where
        F: Fn(&Json) -> Result<(), String> + 'static,
    {
        ChildBuilder::satisfy(self.inner, constraint);
        self
    }

    fn required(self) -> Self {
        ChildBuilder::required(self.inner);
        self
    }

    fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        ChildBuilder::length(self.inner, min, max);
        self
    }

    /// The factory runs after the criterion hydrator is resolved.
    fn child_factory<F: ChildFactory + 'static>(self, factory: F) -> Self {
        let factory = CriterionFactory::new(Rc::clone(&self.spec), Some(Rc::new(factory)));
        ChildBuilder::child_factory(self.inner, factory);
        self
    }

    fn build_child(&self) -> Child {
        self.inner.build_child()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sieve_form::ElementKind;

    fn fill(builder: &ChildBuilder, raw: Json) -> Criteria {
        let mut child = builder.build_child();
        child.submit(Some(&raw));
        let mut criteria = Criteria::new();
        child.fill(&mut criteria).unwrap();
        criteria
    }

    fn string_child(name: &str) -> ChildBuilder {
        ChildBuilder::new(name, ElementKind::String)
    }

    #[test]
    fn plain_child_is_not_a_criterion() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner);

        assert!(fill(&inner, json!("bar")).is_empty());
    }

    #[test]
    fn criterion_defaults_to_child_name() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner).criterion(None, None);

        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("foo", "bar")]));
    }

    #[test]
    fn criterion_with_attribute() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner).criterion(Some("oof"), None);

        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("oof", "bar")]));
    }

    #[test]
    fn transform_uppercases() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner)
            .transform(|value, _| Value::from(value.as_str().unwrap_or_default().to_uppercase()));

        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("foo", "BAR")]));
    }

    #[test]
    fn operator_suffixes_key() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner).operator(">=");

        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("foo >=", "bar")]));
    }

    fn declared<F>(declare: F) -> Criteria
    where
        F: for<'x> FnOnce(FilterChildBuilder<'x>) -> FilterChildBuilder<'x>,
    {
        let mut inner = string_child("foo");
        declare(FilterChildBuilder::wrap(&mut inner));
        fill(&inner, json!("bar"))
    }

    #[test]
    fn operator_sugar() {
        assert_eq!(declared(|b| b.in_()), Criteria::from([("foo :in", "bar")]));
        assert_eq!(declared(|b| b.not_in()), Criteria::from([("foo :notin", "bar")]));
        assert_eq!(declared(|b| b.between()), Criteria::from([("foo :between", "bar")]));
        assert_eq!(declared(|b| b.not_eq()), Criteria::from([("foo !=", "bar")]));
        assert_eq!(declared(|b| b.like()), Criteria::from([("foo :like", "bar")]));
    }

    #[test]
    fn operator_keeps_attribute_and_transform() {
        let mut inner = string_child("foo");
        let builder = FilterChildBuilder::wrap(&mut inner)
            .criterion(Some("oof"), None)
            .transform(|_, _| Value::from("x"))
            .not_eq();

        let spec = builder.spec();
        assert_eq!(spec.attribute(), Some("oof"));
        assert_eq!(spec.operator(), Some(" !="));
        assert!(spec.has_transform());
        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("oof !=", "x")]));
    }

    #[test]
    fn start_with_builds_escaped_prefix() {
        let mut inner = string_child("name");
        FilterChildBuilder::wrap(&mut inner).start_with();

        assert_eq!(
            fill(&inner, json!("50%")),
            Criteria::from([("name", Like::new("50%").escape().starts_with())])
        );
    }

    #[test]
    fn unescaped_variants() {
        let mut inner = string_child("name");
        FilterChildBuilder::wrap(&mut inner).contains_unescaped();

        assert_eq!(
            fill(&inner, json!("a_b")),
            Criteria::from([("name", Like::new("a_b").contains())])
        );
    }

    #[test]
    fn like_transform_reads_the_raw_child_value() {
        let transform = like_transform(true, Like::starts_with);

        let untouched = string_child("name").build_child();
        assert_eq!(transform(Value::from("J"), &untouched), Value::Null);

        let mut submitted = string_child("name").build_child();
        submitted.import(json!("J%"));
        assert_eq!(
            transform(Value::from("J%"), &submitted),
            Value::from(Like::new("J%").escape().starts_with())
        );
    }

    #[test]
    fn explicit_hydrator_wins_over_criterion() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner)
            .criterion(Some("oof"), None)
            .hydrator(CriteriaHydrator::named("explicit"));

        assert_eq!(
            fill(&inner, json!("bar")),
            Criteria::from([("explicit", "bar")])
        );
    }

    #[test]
    fn custom_write_from_builder() {
        let mut inner = string_child("range");
        FilterChildBuilder::wrap(&mut inner).custom_write(|criteria, value, _| {
            criteria.add("low >=", value.clone()).add("high <=", value);
        });

        assert_eq!(
            fill(&inner, json!("m")),
            Criteria::from([("low >=", "m"), ("high <=", "m")])
        );
    }

    #[test]
    fn forwarded_factory_still_gets_criterion_hydrator() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner)
            .operator(">")
            .child_factory(|parts: sieve_form::ChildParts| {
                assert!(parts.hydrator.is_some());
                parts.into_child()
            });

        assert_eq!(fill(&inner, json!("bar")), Criteria::from([("foo >", "bar")]));
    }

    #[test]
    fn empty_submission_adds_nothing() {
        let mut inner = string_child("foo");
        FilterChildBuilder::wrap(&mut inner).start_with();

        assert!(fill(&inner, json!("")).is_empty());
    }
}

//! The filter form builder.

use std::any::Any;

use sieve_form::{ElementKind, Form, FormBuilder, FormError};

use crate::building::FormBuilding;
use crate::child_builder::FilterChildBuilder;

/// Form builder whose children can be declared as criteria.
///
/// Every child declaration returns a [`FilterChildBuilder`]. A few shortcuts
/// cover the common search and pagination fields.
///
/// # Example
///
/// ```
/// use sieve::{ChildBuilding, FilterFormBuilder, FormBuilding};
/// use sieve_criteria::{Criteria, Like, Value};
/// use serde_json::json;
///
/// let mut builder = FilterFormBuilder::new();
/// builder.search_begins("lastName", None);
/// builder.integer("minAge", None).criterion(Some("age"), None).operator(">=");
/// builder.generates_value(Criteria::new());
///
/// let mut form = builder.build_element();
/// form.submit(&json!({ "lastName": "Jo", "minAge": "18" }));
///
/// assert_eq!(
///     form.value_as::<Criteria>().unwrap(),
///     Criteria::from([
///         ("lastName", Value::from(Like::new("Jo").escape().starts_with())),
///         ("age >=", Value::from(18)),
///     ])
/// );
/// ```
#[derive(Debug, Default)]
pub struct FilterFormBuilder {
    inner: FormBuilder,
}

impl FilterFormBuilder {
    pub fn new() -> Self {
        FilterFormBuilder::default()
    }

    /// Wraps an existing form builder. Children already declared stay plain.
    pub fn wrap(inner: FormBuilder) -> Self {
        FilterFormBuilder { inner }
    }

    pub fn into_inner(self) -> FormBuilder {
        self.inner
    }

    /// A text field matched as a raw LIKE pattern.
    pub fn search(&mut self, name: &str, default: Option<&str>) -> FilterChildBuilder<'_> {
        self.string(name, default).like()
    }

    /// A text field matching values that start with the input.
    pub fn search_begins(&mut self, name: &str, default: Option<&str>) -> FilterChildBuilder<'_> {
        self.string(name, default).start_with()
    }

    /// A text field matching values that contain the input.
    pub fn search_contains(&mut self, name: &str, default: Option<&str>) -> FilterChildBuilder<'_> {
        self.string(name, default).contains()
    }

    /// The `page` field, starting at 1, written as the `:page` option.
    pub fn page(&mut self) -> FilterChildBuilder<'_> {
        self.integer("page", Some(1)).criterion(Some(":page"), None)
    }

    /// The `perPage` field, 10 by default, written as the `:limit` option.
    pub fn per_page(&mut self) -> FilterChildBuilder<'_> {
        self.integer("perPage", Some(10))
            .criterion(Some(":limit"), None)
    }
}

impl FormBuilding for FilterFormBuilder {
    type Child<'a> = FilterChildBuilder<'a>;

    fn add(&mut self, name: &str, kind: ElementKind) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::add(&mut self.inner, name, kind))
    }

    fn string(&mut self, name: &str, default: Option<&str>) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::string(&mut self.inner, name, default))
    }

    fn integer(&mut self, name: &str, default: Option<i64>) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::integer(&mut self.inner, name, default))
    }

    fn float(&mut self, name: &str, default: Option<f64>) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::float(&mut self.inner, name, default))
    }

    fn boolean(&mut self, name: &str) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::boolean(&mut self.inner, name))
    }

    fn array(&mut self, name: &str, leaf: Option<ElementKind>) -> Self::Child<'_> {
        FilterChildBuilder::wrap(FormBuilder::array(&mut self.inner, name, leaf))
    }

    /// The nested form is a plain form: its children hydrate its own value,
    /// which the embedded child then writes as one criterion.
    fn embedded<F>(&mut self, name: &str, configure: F) -> Self::Child<'_>
    where
        F: FnOnce(&mut FormBuilder),
    {
        FilterChildBuilder::wrap(FormBuilder::embedded(&mut self.inner, name, configure))
    }

    fn generates<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn Any>, FormError> + 'static,
    {
        FormBuilder::generates(&mut self.inner, generator);
        self
    }

    fn generates_value<T: Clone + 'static>(&mut self, value: T) -> &mut Self {
        FormBuilder::generates_value(&mut self.inner, value);
        self
    }

    fn build_element(&self) -> Form {
        FormBuilder::build_element(&self.inner)
    }
}

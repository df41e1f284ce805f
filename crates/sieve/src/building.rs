//! The declaration surface shared by plain and filter builders.
//!
//! [`FormBuilding`] and [`ChildBuilding`] list every declaration call of
//! the form framework. [`FormBuilder`] and [`ChildBuilder`] implement them
//! directly; [`FilterFormBuilder`](crate::FilterFormBuilder) and
//! [`FilterChildBuilder`](crate::FilterChildBuilder) implement them by
//! forwarding to the builder they wrap, so a filter declaration reads like a
//! plain one and code generic over the traits accepts both.
//!
//! ```
//! use sieve::{ChildBuilding, FilterFormBuilder, FormBuilding};
//! use sieve_form::FormBuilder;
//!
//! fn declare_name<B: FormBuilding>(builder: &mut B) {
//!     builder.string("name", None).required();
//! }
//!
//! declare_name(&mut FormBuilder::new());
//! declare_name(&mut FilterFormBuilder::new());
//! ```

use std::any::Any;

use serde_json::Value as Json;
use sieve_form::{
    Child, ChildBuilder, ChildFactory, ElementKind, Form, FormBuilder, FormError, Hydrator,
};

/// Declaration calls on a child builder.
///
/// Every call consumes and returns the builder so declarations chain.
pub trait ChildBuilding: Sized {
    /// Sets the hydrator used when the form is filled.
    fn hydrator<H: Hydrator + 'static>(self, hydrator: H) -> Self;

    /// Writes the value as a JSON property under the child name or `property`.
    fn setter(self, property: Option<&str>) -> Self;

    /// Sets the value used when nothing is submitted.
    fn default<V: Into<Json>>(self, value: V) -> Self;

    /// Adds a custom constraint.
    fn satisfy<F>(self, constraint: F) -> Self
    where
        F: Fn(&Json) -> Result<(), String> + 'static;

    /// Rejects empty submissions.
    fn required(self) -> Self;

    /// Bounds the length of a string or an array.
    fn length(self, min: Option<usize>, max: Option<usize>) -> Self;

    /// Sets the strategy creating the child.
    fn child_factory<F: ChildFactory + 'static>(self, factory: F) -> Self;

    /// Creates the child.
    fn build_child(&self) -> Child;
}

/// Declaration calls on a form builder.
pub trait FormBuilding {
    /// The child builder returned by child declarations.
    type Child<'a>: ChildBuilding
    where
        Self: 'a;

    /// Adds a child of any kind.
    fn add(&mut self, name: &str, kind: ElementKind) -> Self::Child<'_>;

    /// Adds a text child.
    fn string(&mut self, name: &str, default: Option<&str>) -> Self::Child<'_>;

    /// Adds an integer child.
    fn integer(&mut self, name: &str, default: Option<i64>) -> Self::Child<'_>;

    /// Adds a float child.
    fn float(&mut self, name: &str, default: Option<f64>) -> Self::Child<'_>;

    /// Adds a boolean child.
    fn boolean(&mut self, name: &str) -> Self::Child<'_>;

    /// Adds a list child.
    fn array(&mut self, name: &str, leaf: Option<ElementKind>) -> Self::Child<'_>;

    /// Adds a nested form declared by `configure`.
    fn embedded<F>(&mut self, name: &str, configure: F) -> Self::Child<'_>
    where
        F: FnOnce(&mut FormBuilder);

    /// Sets the value generator.
    fn generates<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn Any>, FormError> + 'static;

    /// Generates clones of `value`.
    fn generates_value<T: Clone + 'static>(&mut self, value: T) -> &mut Self;

    /// Builds the form.
    fn build_element(&self) -> Form;
}

impl<'b> ChildBuilding for &'b mut ChildBuilder {
    fn hydrator<H: Hydrator + 'static>(self, hydrator: H) -> Self {
        ChildBuilder::hydrator(self, hydrator)
    }

    fn setter(self, property: Option<&str>) -> Self {
        ChildBuilder::setter(self, property)
    }

    fn default<V: Into<Json>>(self, value: V) -> Self {
        ChildBuilder::default(self, value)
    }

    fn satisfy<F>(self, constraint: F) -> Self
    where
        F: Fn(&Json) -> Result<(), String> + 'static,
    {
        ChildBuilder::satisfy(self, constraint)
    }

    fn required(self) -> Self {
        ChildBuilder::required(self)
    }

    fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        ChildBuilder::length(self, min, max)
    }

    fn child_factory<F: ChildFactory + 'static>(self, factory: F) -> Self {
        ChildBuilder::child_factory(self, factory)
    }

    fn build_child(&self) -> Child {
        ChildBuilder::build_child(self)
    }
}

impl FormBuilding for FormBuilder {
    type Child<'a> = &'a mut ChildBuilder;

    fn add(&mut self, name: &str, kind: ElementKind) -> Self::Child<'_> {
        FormBuilder::add(self, name, kind)
    }

    fn string(&mut self, name: &str, default: Option<&str>) -> Self::Child<'_> {
        FormBuilder::string(self, name, default)
    }

    fn integer(&mut self, name: &str, default: Option<i64>) -> Self::Child<'_> {
        FormBuilder::integer(self, name, default)
    }

    fn float(&mut self, name: &str, default: Option<f64>) -> Self::Child<'_> {
        FormBuilder::float(self, name, default)
    }

    fn boolean(&mut self, name: &str) -> Self::Child<'_> {
        FormBuilder::boolean(self, name)
    }

    fn array(&mut self, name: &str, leaf: Option<ElementKind>) -> Self::Child<'_> {
        FormBuilder::array(self, name, leaf)
    }

    fn embedded<F>(&mut self, name: &str, configure: F) -> Self::Child<'_>
    where
        F: FnOnce(&mut FormBuilder),
    {
        FormBuilder::embedded(self, name, configure)
    }

    fn generates<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn Any>, FormError> + 'static,
    {
        FormBuilder::generates(self, generator)
    }

    fn generates_value<T: Clone + 'static>(&mut self, value: T) -> &mut Self {
        FormBuilder::generates_value(self, value)
    }

    fn build_element(&self) -> Form {
        FormBuilder::build_element(self)
    }
}

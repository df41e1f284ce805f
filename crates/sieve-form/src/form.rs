//! Forms and the form builder.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as Json;
use tracing::debug;

use crate::child::{Child, ChildBuilder};
use crate::element::ElementKind;
use crate::error::FormError;

/// Creates the value a form fills on [`Form::value`].
pub type Generator = Rc<dyn Fn() -> Result<Box<dyn Any>, FormError>>;

/// Where a form is in its submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Nothing submitted yet.
    #[default]
    Unsubmitted,
    /// A payload was submitted.
    Submitted {
        /// Whether every child accepted its value.
        valid: bool,
    },
}

/// A built form: children, a value generator and a submission state.
///
/// ```
/// use serde_json::json;
/// use sieve_form::FormBuilder;
///
/// let mut builder = FormBuilder::new();
/// builder.string("name", None).setter(None);
/// builder.integer("age", None).setter(None);
///
/// let mut form = builder.build_element();
/// form.submit(&json!({"name": "Smith", "age": "42"}));
///
/// assert!(form.valid());
/// assert_eq!(form.value_as::<serde_json::Value>().unwrap(), json!({"name": "Smith", "age": 42}));
/// ```
pub struct Form {
    children: Vec<Child>,
    generator: Generator,
    state: SubmissionState,
}

impl Form {
    /// Submits a payload to every child.
    ///
    /// Children look up their value by name in objects and by index in
    /// arrays. Anything else submits nothing.
    pub fn submit(&mut self, payload: &Json) -> &mut Self {
        for child in &mut self.children {
            let raw = lookup(payload, child.name());
            child.submit(raw);
        }

        let valid = self.children.iter().all(Child::valid);
        debug!(children = self.children.len(), valid, "form submitted");
        self.state = SubmissionState::Submitted { valid };
        self
    }

    /// The submission state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Returns `true` if a payload was submitted and accepted.
    pub fn valid(&self) -> bool {
        self.state == SubmissionState::Submitted { valid: true }
    }

    /// Validation messages by child path. Nested paths are dotted.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors = BTreeMap::new();
        for child in &self.children {
            let nested = child.form().map(Form::errors).unwrap_or_default();
            if nested.is_empty() {
                if !child.valid() {
                    errors.insert(child.name().to_string(), child.errors().to_vec());
                }
                continue;
            }
            for (path, messages) in nested {
                errors.insert(format!("{}.{}", child.name(), path), messages);
            }
        }
        errors
    }

    /// Writes every child value into `target`, in declaration order.
    pub fn fill(&self, target: &mut dyn Any) -> Result<(), FormError> {
        for child in &self.children {
            child.fill(target)?;
        }
        Ok(())
    }

    /// Generates a fresh value and fills it.
    pub fn value(&self) -> Result<Box<dyn Any>, FormError> {
        let mut value = (self.generator)()?;
        self.fill(&mut *value)?;
        Ok(value)
    }

    /// Generates and fills a value, downcast to `T`.
    pub fn value_as<T: 'static>(&self) -> Result<T, FormError> {
        self.value()?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| FormError::type_mismatch::<T>())
    }

    /// Returns the child named `name`.
    pub fn child(&self, name: &str) -> Option<&Child> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// All children, in declaration order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }
}

fn empty_object() -> Result<Box<dyn Any>, FormError> {
    Ok(Box::new(Json::Object(Default::default())))
}

fn lookup<'a>(payload: &'a Json, name: &str) -> Option<&'a Json> {
    match payload {
        Json::Object(map) => map.get(name),
        Json::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("children", &self.children)
            .field("state", &self.state)
            .finish()
    }
}

/// Declares the children and value generator of a form.
///
/// The typed shortcuts ([`string`](Self::string), [`integer`](Self::integer),
/// ...) return the [`ChildBuilder`] of the new child so it can be configured
/// in place.
#[derive(Default)]
pub struct FormBuilder {
    children: Vec<ChildBuilder>,
    generator: Option<Generator>,
}

impl FormBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        FormBuilder::default()
    }

    /// Adds a child, replacing any child with the same name.
    pub fn add(&mut self, name: &str, kind: ElementKind) -> &mut ChildBuilder {
        self.push(ChildBuilder::new(name, kind))
    }

    fn push(&mut self, builder: ChildBuilder) -> &mut ChildBuilder {
        self.children.retain(|child| child.name() != builder.name());
        self.children.push(builder);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Adds a text child.
    pub fn string(&mut self, name: &str, default: Option<&str>) -> &mut ChildBuilder {
        let child = self.add(name, ElementKind::String);
        if let Some(default) = default {
            child.default(default);
        }
        child
    }

    /// Adds an integer child.
    pub fn integer(&mut self, name: &str, default: Option<i64>) -> &mut ChildBuilder {
        let child = self.add(name, ElementKind::Integer);
        if let Some(default) = default {
            child.default(default);
        }
        child
    }

    /// Adds a float child.
    pub fn float(&mut self, name: &str, default: Option<f64>) -> &mut ChildBuilder {
        let child = self.add(name, ElementKind::Float);
        if let Some(default) = default {
            child.default(default);
        }
        child
    }

    /// Adds a boolean child.
    pub fn boolean(&mut self, name: &str) -> &mut ChildBuilder {
        self.add(name, ElementKind::Boolean)
    }

    /// Adds a list child whose items are coerced by `leaf`.
    pub fn array(&mut self, name: &str, leaf: Option<ElementKind>) -> &mut ChildBuilder {
        self.add(name, ElementKind::Array(leaf.map(Box::new)))
    }

    /// Adds a nested form, declared by `configure`.
    ///
    /// The nested form generates its own value (a JSON object unless
    /// [`generates`](Self::generates) is called on the nested builder),
    /// which becomes the child value.
    pub fn embedded<F>(&mut self, name: &str, configure: F) -> &mut ChildBuilder
    where
        F: FnOnce(&mut FormBuilder),
    {
        let mut inner = FormBuilder::new();
        configure(&mut inner);
        self.push(ChildBuilder::embedded(name, inner))
    }

    /// Sets the value generator.
    pub fn generates<F>(&mut self, generator: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn Any>, FormError> + 'static,
    {
        self.generator = Some(Rc::new(generator));
        self
    }

    /// Generates clones of `value`.
    pub fn generates_value<T: Clone + 'static>(&mut self, value: T) -> &mut Self {
        self.generates(move || Ok(Box::new(value.clone()) as Box<dyn Any>))
    }

    /// Builds the form.
    pub fn build_element(&self) -> Form {
        let generator: Generator = match &self.generator {
            Some(generator) => Rc::clone(generator),
            None => Rc::new(empty_object),
        };

        Form {
            children: self.children.iter().map(ChildBuilder::build_child).collect(),
            generator,
            state: SubmissionState::Unsubmitted,
        }
    }
}

impl fmt::Debug for FormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBuilder")
            .field("children", &self.children)
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

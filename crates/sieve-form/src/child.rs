//! Form children and their builder.
//!
//! A [`Child`] is one named field of a form: it coerces and validates its
//! submitted value and, when the form is filled, hands it to its hydrator.
//! Children are declared with a [`ChildBuilder`].

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as Json;
use tracing::debug;

use crate::element::{is_input_value_empty, ElementKind};
use crate::error::FormError;
use crate::form::{Form, FormBuilder};
use crate::hydrator::{ChildFactory, ChildParts, Hydrator, Setter};

/// A validation constraint on a child value.
///
/// Constraints run only on non-empty values; use
/// [`ChildBuilder::required`] to reject empty ones.
pub type Constraint = Rc<dyn Fn(&Json) -> Result<(), String>>;

const BLANK_MESSAGE: &str = "This value should not be blank.";

/// A field of a form.
pub struct Child {
    name: String,
    kind: ElementKind,
    default: Option<Json>,
    hydrator: Option<Rc<dyn Hydrator>>,
    constraints: Vec<Constraint>,
    required: bool,
    form: Option<Form>,
    value: Json,
    errors: Vec<String>,
}

impl Child {
    pub(crate) fn from_parts(parts: ChildParts) -> Self {
        let value = parts.default.clone().unwrap_or(Json::Null);
        Child {
            name: parts.name,
            kind: parts.kind,
            default: parts.default,
            hydrator: parts.hydrator,
            constraints: parts.constraints,
            required: parts.required,
            form: parts.form,
            value,
            errors: Vec::new(),
        }
    }

    /// The child name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element kind.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// The current value.
    ///
    /// Embedded children hold the value generated by their nested form.
    pub fn value(&self) -> &Json {
        &self.value
    }

    /// The nested form of an embedded child.
    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    /// Returns `true` if a hydrator is attached.
    pub fn has_hydrator(&self) -> bool {
        self.hydrator.is_some()
    }

    /// Validation messages of the last submission.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns `true` if the last submission raised no error.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Sets the value directly, without coercion or validation.
    pub fn import(&mut self, value: Json) -> &mut Self {
        self.value = value;
        self.errors.clear();
        self
    }

    /// Submits the raw payload value of this child.
    ///
    /// `None` means the key was absent from the payload.
    pub fn submit(&mut self, raw: Option<&Json>) {
        self.errors.clear();

        if let Some(form) = self.form.as_mut() {
            form.submit(raw.unwrap_or(&Json::Null));
            for (path, messages) in form.errors() {
                self.errors
                    .extend(messages.into_iter().map(|m| format!("{}: {}", path, m)));
            }
            self.value = match form.value_as::<Json>() {
                Ok(value) => value,
                Err(err) => {
                    self.errors.push(err.to_string());
                    Json::Null
                }
            };
            return;
        }

        let raw = raw.cloned().unwrap_or(Json::Null);
        let raw = match (&self.default, is_input_value_empty(&raw)) {
            (Some(default), true) => default.clone(),
            _ => raw,
        };

        self.value = match self.kind.coerce(&raw) {
            Ok(value) => value,
            Err(message) => {
                debug!(child = %self.name, %message, "rejected submitted value");
                self.errors.push(message);
                Json::Null
            }
        };
        if !self.errors.is_empty() {
            return;
        }

        if is_input_value_empty(&self.value) {
            if self.required {
                self.errors.push(BLANK_MESSAGE.to_string());
            }
            return;
        }

        for constraint in &self.constraints {
            if let Err(message) = constraint(&self.value) {
                self.errors.push(message);
            }
        }
    }

    /// Writes the value into `target` through the hydrator, if any.
    pub fn fill(&self, target: &mut dyn Any) -> Result<(), FormError> {
        match &self.hydrator {
            Some(hydrator) => hydrator.hydrate(target, self),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Child")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("hydrator", &self.hydrator.is_some())
            .field("required", &self.required)
            .field("value", &self.value)
            .field("errors", &self.errors)
            .finish()
    }
}

/// Declares a child of a form.
///
/// Obtained from [`FormBuilder::add`] and its typed shortcuts. All methods
/// chain.
///
/// ```
/// use serde_json::json;
/// use sieve_form::{ChildBuilder, ElementKind};
///
/// let mut builder = ChildBuilder::new("perPage", ElementKind::Integer);
/// builder.default(10).required();
///
/// let mut child = builder.build_child();
/// child.submit(None);
/// assert_eq!(child.value(), &json!(10));
/// ```
pub struct ChildBuilder {
    name: String,
    kind: ElementKind,
    embedded: Option<FormBuilder>,
    default: Option<Json>,
    hydrator: Option<Rc<dyn Hydrator>>,
    constraints: Vec<Constraint>,
    required: bool,
    factory: Option<Rc<dyn ChildFactory>>,
}

impl ChildBuilder {
    /// Creates a builder for a child of the given kind.
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        ChildBuilder {
            name: name.into(),
            kind,
            embedded: None,
            default: None,
            hydrator: None,
            constraints: Vec::new(),
            required: false,
            factory: None,
        }
    }

    pub(crate) fn embedded(name: impl Into<String>, form: FormBuilder) -> Self {
        let mut builder = ChildBuilder::new(name, ElementKind::Embedded);
        builder.embedded = Some(form);
        builder
    }

    /// The child name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the hydrator used when the form is filled.
    pub fn hydrator(&mut self, hydrator: impl Hydrator + 'static) -> &mut Self {
        self.hydrator = Some(Rc::new(hydrator));
        self
    }

    /// Writes the value as a JSON property (or array item), under the child
    /// name or `property`.
    pub fn setter(&mut self, property: Option<&str>) -> &mut Self {
        match property {
            Some(property) => self.hydrator(Setter::property(property)),
            None => self.hydrator(Setter::new()),
        }
    }

    /// Sets the value used when nothing is submitted.
    pub fn default(&mut self, value: impl Into<Json>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Adds a custom constraint.
    pub fn satisfy<F>(&mut self, constraint: F) -> &mut Self
    where
        F: Fn(&Json) -> Result<(), String> + 'static,
    {
        self.constraints.push(Rc::new(constraint));
        self
    }

    /// Rejects empty submissions.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Bounds the length of a string (in characters) or an array.
    pub fn length(&mut self, min: Option<usize>, max: Option<usize>) -> &mut Self {
        self.satisfy(move |value| {
            let len = match value {
                Json::String(s) => s.chars().count(),
                Json::Array(items) => items.len(),
                _ => return Ok(()),
            };
            match (min, max) {
                (Some(min), _) if len < min => Err(format!(
                    "This value is too short. It should have {} characters or more.",
                    min
                )),
                (_, Some(max)) if len > max => Err(format!(
                    "This value is too long. It should have {} characters or less.",
                    max
                )),
                _ => Ok(()),
            }
        })
    }

    /// Sets the strategy creating the child.
    pub fn child_factory(&mut self, factory: impl ChildFactory + 'static) -> &mut Self {
        self.factory = Some(Rc::new(factory));
        self
    }

    /// Creates the child.
    pub fn build_child(&self) -> Child {
        let parts = ChildParts {
            name: self.name.clone(),
            kind: self.kind.clone(),
            default: self.default.clone(),
            hydrator: self.hydrator.clone(),
            constraints: self.constraints.clone(),
            required: self.required,
            form: self.embedded.as_ref().map(FormBuilder::build_element),
        };

        match &self.factory {
            Some(factory) => factory.create(parts),
            None => parts.into_child(),
        }
    }
}

impl fmt::Debug for ChildBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildBuilder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("hydrator", &self.hydrator.is_some())
            .field("required", &self.required)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

//! The criteria hydrator: turns a child value into a predicate.
//!
//! A [`CriteriaHydrator`] is attached to every child declared as a
//! criterion. When the form fills a [`Criteria`] container, the hydrator:
//!
//! 1. skips the child if its value is empty ([`is_criterion_value_empty`]),
//! 2. applies the transform, if any,
//! 3. calls the custom writer if one is set, or adds `key => value`.
//!
//! The key is the attribute, suffixed with `" " + operator` when the child
//! declared one (`"age :between"`). Without an explicit key the child name
//! is used.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Value as Json;
use sieve_criteria::{Criteria, Value};
use sieve_form::{Child, FormError, Hydrator};
use tracing::debug;

/// Rewrites a criterion value before it is written.
///
/// Receives the value and the child it comes from.
pub type CriterionTransform = Rc<dyn Fn(Value, &Child) -> Value>;

/// Writes a criterion value into the criteria in place of `add(key, value)`.
pub type CustomWrite = Rc<dyn Fn(&mut Criteria, Value, &CriteriaHydrator)>;

/// Returns `true` if a child value must not produce a predicate.
///
/// - `null` is empty.
/// - A string is empty iff it has no characters (`" "` is not empty).
/// - Numbers and booleans are never empty, `0`, `0.0` and `false` included.
/// - Arrays and objects are empty iff they have no elements.
///
/// This differs from [`sieve_form::is_input_value_empty`] only in intent:
/// it decides whether a predicate is emitted, not whether input was given.
pub fn is_criterion_value_empty(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::String(s) => s.is_empty(),
        Json::Number(_) | Json::Bool(_) => false,
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
    }
}

/// Hydrator writing a child value into a [`Criteria`] container.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sieve::CriteriaHydrator;
/// use sieve_criteria::{Criteria, Value};
/// use sieve_form::{ChildBuilder, ElementKind, Hydrator};
///
/// let mut child = ChildBuilder::new("age", ElementKind::Integer).build_child();
/// child.import(json!(18));
///
/// let mut criteria = Criteria::new();
/// CriteriaHydrator::named("age >=").hydrate(&mut criteria, &child).unwrap();
///
/// assert_eq!(criteria, Criteria::from([("age >=", Value::from(18))]));
/// ```
#[derive(Clone, Default)]
pub struct CriteriaHydrator {
    key: Option<String>,
    transform: Option<CriterionTransform>,
    custom_write: Option<CustomWrite>,
}

impl CriteriaHydrator {
    /// Creates a hydrator keyed by the child name.
    pub fn new() -> Self {
        CriteriaHydrator::default()
    }

    /// Creates a hydrator with an explicit criteria key.
    pub fn named(key: impl Into<String>) -> Self {
        CriteriaHydrator {
            key: Some(key.into()),
            ..CriteriaHydrator::default()
        }
    }

    pub(crate) fn from_parts(
        key: Option<String>,
        transform: Option<CriterionTransform>,
        custom_write: Option<CustomWrite>,
    ) -> Self {
        CriteriaHydrator {
            key,
            transform,
            custom_write,
        }
    }

    /// Sets the value transform.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value, &Child) -> Value + 'static,
    {
        self.transform = Some(Rc::new(transform));
        self
    }

    /// Sets the custom writer. Key and operator are then ignored.
    pub fn with_custom_write<F>(mut self, write: F) -> Self
    where
        F: Fn(&mut Criteria, Value, &CriteriaHydrator) + 'static,
    {
        self.custom_write = Some(Rc::new(write));
        self
    }

    /// The explicit criteria key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The key written for `child`: the explicit key or the child name.
    pub fn resolve_key<'a>(&'a self, child: &'a Child) -> &'a str {
        self.key.as_deref().unwrap_or(child.name())
    }
}

impl Hydrator for CriteriaHydrator {
    fn hydrate(&self, target: &mut dyn Any, child: &Child) -> Result<(), FormError> {
        let criteria = target
            .downcast_mut::<Criteria>()
            .ok_or_else(FormError::type_mismatch::<Criteria>)?;

        let raw = child.value();
        if is_criterion_value_empty(raw) {
            debug!(child = child.name(), "empty value, no criterion");
            return Ok(());
        }

        let mut value = Value::from(raw.clone());
        if let Some(transform) = &self.transform {
            value = transform(value, child);
        }

        match &self.custom_write {
            Some(write) => write(criteria, value, self),
            None => {
                let key = self.resolve_key(child);
                debug!(child = child.name(), key, "adding criterion");
                criteria.add(key, value);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CriteriaHydrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriteriaHydrator")
            .field("key", &self.key)
            .field("transform", &self.transform.is_some())
            .field("custom_write", &self.custom_write.is_some())
            .finish()
    }
}

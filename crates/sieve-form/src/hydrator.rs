//! Hydration: writing child values into a target.
//!
//! When a form is filled, each child hands its value to its [`Hydrator`].
//! The target is type-erased (`&mut dyn Any`); a hydrator downcasts it to
//! the type it knows how to write into and fails with
//! [`FormError::TypeMismatch`] otherwise.
//!
//! Children are created through a [`ChildFactory`], which receives the
//! declared [`ChildParts`]. A factory can inspect or replace any part
//! before the child exists, for example to install a hydrator when none
//! was set explicitly.

use std::any::Any;
use std::rc::Rc;

use serde_json::Value as Json;

use crate::child::{Child, Constraint};
use crate::element::ElementKind;
use crate::error::FormError;
use crate::form::Form;

/// Writes a child value into a fill target.
pub trait Hydrator {
    /// Writes `child`'s current value into `target`.
    fn hydrate(&self, target: &mut dyn Any, child: &Child) -> Result<(), FormError>;
}

impl<F> Hydrator for F
where
    F: Fn(&mut dyn Any, &Child) -> Result<(), FormError>,
{
    fn hydrate(&self, target: &mut dyn Any, child: &Child) -> Result<(), FormError> {
        self(target, child)
    }
}

/// Writes the child value as a property of a JSON object or an item of a
/// JSON array.
///
/// The property defaults to the child name. Array targets need a numeric
/// property; missing slots are filled with `null` and a `null` value
/// leaves the array as is, so an untouched array stays empty.
///
/// ```
/// use serde_json::json;
/// use sieve_form::{ChildBuilder, ElementKind, Hydrator, Setter};
///
/// let mut child = ChildBuilder::new("name", ElementKind::String).build_child();
/// child.import(json!("Smith"));
///
/// let mut target = json!({});
/// Setter::new().hydrate(&mut target, &child).unwrap();
/// assert_eq!(target, json!({"name": "Smith"}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Setter {
    property: Option<String>,
}

impl Setter {
    /// Creates a setter writing under the child name.
    pub fn new() -> Self {
        Setter::default()
    }

    /// Creates a setter writing under `property`.
    pub fn property(property: impl Into<String>) -> Self {
        Setter {
            property: Some(property.into()),
        }
    }
}

impl Hydrator for Setter {
    fn hydrate(&self, target: &mut dyn Any, child: &Child) -> Result<(), FormError> {
        let target = target
            .downcast_mut::<Json>()
            .ok_or_else(FormError::type_mismatch::<Json>)?;
        let property = self.property.as_deref().unwrap_or(child.name());
        let value = child.value().clone();

        if target.is_null() {
            *target = Json::Object(Default::default());
        }

        match target {
            Json::Object(map) => {
                map.insert(property.to_string(), value);
                Ok(())
            }
            Json::Array(items) => {
                let index: usize = property.parse().map_err(|_| FormError::TypeMismatch {
                    expected: "JSON object",
                })?;
                if value.is_null() {
                    return Ok(());
                }
                if items.len() <= index {
                    items.resize(index + 1, Json::Null);
                }
                items[index] = value;
                Ok(())
            }
            _ => Err(FormError::TypeMismatch {
                expected: "JSON object or array",
            }),
        }
    }
}

/// The declared parts of a child, before it is created.
pub struct ChildParts {
    /// The child name, also its payload key.
    pub name: String,
    /// The element kind.
    pub kind: ElementKind,
    /// Value used when nothing is submitted.
    pub default: Option<Json>,
    /// The hydrator explicitly set on the child builder, if any.
    pub hydrator: Option<Rc<dyn Hydrator>>,
    /// Validation constraints.
    pub constraints: Vec<Constraint>,
    /// Whether a value must be submitted.
    pub required: bool,
    /// The nested form of an embedded child.
    pub form: Option<Form>,
}

impl ChildParts {
    /// Creates the child from its parts.
    pub fn into_child(self) -> Child {
        Child::from_parts(self)
    }
}

/// Strategy creating a child from its declared parts.
pub trait ChildFactory {
    /// Creates the child.
    fn create(&self, parts: ChildParts) -> Child;
}

impl<F> ChildFactory for F
where
    F: Fn(ChildParts) -> Child,
{
    fn create(&self, parts: ChildParts) -> Child {
        self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChildBuilder;
    use serde_json::json;

    fn child(name: &str, value: Json) -> Child {
        let mut child = ChildBuilder::new(name, ElementKind::Any).build_child();
        child.import(value);
        child
    }

    #[test]
    fn setter_writes_array_items() {
        let mut target = json!([]);
        Setter::new().hydrate(&mut target, &child("0", json!(20))).unwrap();
        Setter::new().hydrate(&mut target, &child("1", json!(55))).unwrap();

        assert_eq!(target, json!([20, 55]));
    }

    #[test]
    fn setter_skips_null_array_items() {
        let mut target = json!([]);
        Setter::new().hydrate(&mut target, &child("1", Json::Null)).unwrap();
        assert_eq!(target, json!([]));

        Setter::new().hydrate(&mut target, &child("1", json!(55))).unwrap();
        assert_eq!(target, json!([null, 55]));
    }

    #[test]
    fn setter_property_override() {
        let mut target = Json::Null;
        Setter::property("alias")
            .hydrate(&mut target, &child("name", json!("bar")))
            .unwrap();

        assert_eq!(target, json!({"alias": "bar"}));
    }

    #[test]
    fn setter_rejects_foreign_targets() {
        let mut target = String::new();
        let err = Setter::new()
            .hydrate(&mut target, &child("name", json!("bar")))
            .unwrap_err();

        assert!(matches!(err, FormError::TypeMismatch { .. }));
        assert!(err.to_string().contains("serde_json"));
    }

    #[test]
    fn closures_are_hydrators() {
        let hydrator = |target: &mut dyn Any, child: &Child| -> Result<(), FormError> {
            if let Some(names) = target.downcast_mut::<Vec<String>>() {
                names.push(child.name().to_string());
            }
            Ok(())
        };

        let mut names: Vec<String> = Vec::new();
        hydrator.hydrate(&mut names, &child("foo", json!(1))).unwrap();
        assert_eq!(names, ["foo"]);
    }
}

//! Declarative forms: children, submission and hydration.
//!
//! `sieve-form` binds a loosely typed payload (a decoded query string or
//! JSON body) to named children, validates it, and writes the accepted
//! values into a target object.
//!
//! # Quick Start
//!
//! ```
//! use serde_json::json;
//! use sieve_form::FormBuilder;
//!
//! let mut builder = FormBuilder::new();
//! builder.string("name", None).required().setter(None);
//! builder.integer("page", Some(1)).setter(None);
//!
//! let mut form = builder.build_element();
//! form.submit(&json!({"name": "Smith"}));
//!
//! assert!(form.valid());
//! assert_eq!(
//!     form.value_as::<serde_json::Value>().unwrap(),
//!     json!({"name": "Smith", "page": 1})
//! );
//! ```
//!
//! # Architecture
//!
//! ```text
//! FormBuilder ── build_element ──► Form
//! ├── ChildBuilder ── ChildFactory ──► Child (kind, default, constraints, hydrator)
//! └── generator                        value() = generator() + fill()
//! ```
//!
//! A [`Form`] never knows what it fills: the generator creates the target
//! (`Box<dyn Any>`) and each child's [`Hydrator`] downcasts it. Children
//! without a hydrator are validated but never written.

mod child;
mod element;
mod error;
mod form;
mod hydrator;

pub use child::{Child, ChildBuilder, Constraint};
pub use element::{is_input_value_empty, ElementKind};
pub use error::FormError;
pub use form::{Form, FormBuilder, Generator, SubmissionState};
pub use hydrator::{ChildFactory, ChildParts, Hydrator, Setter};

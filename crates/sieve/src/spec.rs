//! Criterion declarations and their compilation into hydrators.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sieve_form::{Child, ChildFactory, ChildParts};
use tracing::debug;

use crate::hydrator::{CriteriaHydrator, CriterionTransform, CustomWrite};

/// How a child contributes to the criteria.
///
/// Built by [`FilterChildBuilder`](crate::FilterChildBuilder) while the form
/// is declared, and compiled into a [`CriteriaHydrator`] when the form is
/// built. A child that is not a criterion contributes nothing.
#[derive(Clone, Default)]
pub struct CriterionSpec {
    criterion: bool,
    attribute: Option<String>,
    operator: Option<String>,
    transform: Option<CriterionTransform>,
    custom_write: Option<CustomWrite>,
}

impl CriterionSpec {
    /// Creates a spec for a child that is not (yet) a criterion.
    pub fn new() -> Self {
        CriterionSpec::default()
    }

    /// Marks the child as a criterion.
    ///
    /// `attribute` and `transform` only overwrite the current values when
    /// given.
    pub fn mark(&mut self, attribute: Option<&str>, transform: Option<CriterionTransform>) {
        self.criterion = true;
        if let Some(attribute) = attribute {
            self.attribute = Some(attribute.to_string());
        }
        if let Some(transform) = transform {
            self.transform = Some(transform);
        }
    }

    /// Marks the child as a criterion compared with `token`.
    pub fn set_operator(&mut self, token: &str) {
        self.mark(None, None);
        self.operator = Some(format!(" {}", token));
    }

    /// Marks the child as a criterion written by `write`.
    pub fn set_custom_write(&mut self, write: CustomWrite) {
        self.mark(None, None);
        self.custom_write = Some(write);
    }

    /// Returns `true` if the child contributes to the criteria.
    pub fn is_criterion(&self) -> bool {
        self.criterion
    }

    /// The attribute overriding the child name.
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// The operator suffix, leading space included (`" :in"`).
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// Returns `true` if a transform is set.
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// The criteria key for a child named `child_name`.
    ///
    /// An empty attribute counts as unset.
    pub fn key(&self, child_name: &str) -> String {
        let attribute = self
            .attribute
            .as_deref()
            .filter(|attribute| !attribute.is_empty())
            .unwrap_or(child_name);
        match &self.operator {
            Some(suffix) => format!("{}{}", attribute, suffix),
            None => attribute.to_string(),
        }
    }

    /// Compiles the hydrator of a child named `child_name`.
    ///
    /// Returns `None` when the child is not a criterion.
    pub fn compile(&self, child_name: &str) -> Option<CriteriaHydrator> {
        if !self.criterion {
            return None;
        }
        Some(CriteriaHydrator::from_parts(
            Some(self.key(child_name)),
            self.transform.clone(),
            self.custom_write.clone(),
        ))
    }
}

impl fmt::Debug for CriterionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriterionSpec")
            .field("criterion", &self.criterion)
            .field("attribute", &self.attribute)
            .field("operator", &self.operator)
            .field("transform", &self.transform.is_some())
            .field("custom_write", &self.custom_write.is_some())
            .finish()
    }
}

/// Child factory installing the compiled criteria hydrator.
///
/// A hydrator set explicitly on the child builder always wins.
pub(crate) struct CriterionFactory {
    spec: Rc<RefCell<CriterionSpec>>,
    inner: Option<Rc<dyn ChildFactory>>,
}

impl CriterionFactory {
    pub(crate) fn new(spec: Rc<RefCell<CriterionSpec>>, inner: Option<Rc<dyn ChildFactory>>) -> Self {
        CriterionFactory { spec, inner }
    }
}

impl ChildFactory for CriterionFactory {
    fn create(&self, mut parts: ChildParts) -> Child {
        let compiled = self.spec.borrow().compile(&parts.name);
        match compiled {
            Some(_) if parts.hydrator.is_some() => {
                debug!(child = %parts.name, "explicit hydrator overrides criterion");
            }
            Some(hydrator) => {
                debug!(child = %parts.name, key = ?hydrator.key(), "compiled criterion");
                parts.hydrator = Some(Rc::new(hydrator));
            }
            None => {}
        }

        match &self.inner {
            Some(factory) => factory.create(parts),
            None => parts.into_child(),
        }
    }
}

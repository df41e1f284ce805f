//! Filter forms: a declared form plus the backend its criteria target.
//!
//! A filter form is declared by a [`FilterSchema`], which adds children to
//! a [`FilterFormBuilder`] and names the backend in a [`FilterTarget`].
//! Once a payload is submitted and accepted, the form fills a [`Criteria`]
//! container and hands it to a query.
//!
//! - [`BaseFilterForm`] applies criteria to any [`Whereable`] query.
//! - [`FilterForm`] also builds and paginates queries from a repository.
//! - [`DocumentFilterForm`] builds queries from a document collection.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use sieve::{ChildBuilding, FilterForm, FilterFormBuilder, FilterSchema, FilterTarget, FormBuilding};
//! use sieve_criteria::{ServiceLocator, TableRepository};
//!
//! struct PersonFilter;
//!
//! impl FilterSchema for PersonFilter {
//!     fn configure_filters(&self, builder: &mut FilterFormBuilder, target: &mut FilterTarget) {
//!         target.set_entity("Person");
//!         builder.integer("minAge", None).criterion(Some("age"), None).operator(">=");
//!     }
//! }
//!
//! let locator = Arc::new(ServiceLocator::new());
//! locator.register_repository("Person", Arc::new(TableRepository::new("person")));
//!
//! let mut form = FilterForm::with_locator(&PersonFilter, locator);
//! form.submit(&json!({ "minAge": 18 }));
//!
//! let query = form.query().unwrap();
//! assert_eq!(query.to_string(), "SELECT t0.* FROM person t0 WHERE t0.age >= 18");
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value as Json;
use sieve_criteria::{
    CollectionLocator, Criteria, Paginator, QueryInterface, RepositoryLocator, Whereable,
    DEFAULT_PAGE_SIZE,
};
use sieve_form::{Form, FormError, SubmissionState};
use tracing::debug;

use crate::ambient;
use crate::building::FormBuilding;
use crate::error::{FilterError, Result};
use crate::form_builder::FilterFormBuilder;

/// Declares the children of a filter form and the backend it targets.
///
/// Implemented for closures taking the same arguments.
pub trait FilterSchema {
    fn configure_filters(&self, builder: &mut FilterFormBuilder, target: &mut FilterTarget);
}

impl<F> FilterSchema for F
where
    F: Fn(&mut FilterFormBuilder, &mut FilterTarget),
{
    fn configure_filters(&self, builder: &mut FilterFormBuilder, target: &mut FilterTarget) {
        self(builder, target)
    }
}

/// The backend a filter form targets, set while the form is declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterTarget {
    entity: Option<String>,
    document: Option<String>,
}

impl FilterTarget {
    /// Names the repository entity queried by [`FilterForm`].
    pub fn set_entity(&mut self, entity: impl Into<String>) -> &mut Self {
        self.entity = Some(entity.into());
        self
    }

    /// Names the collection queried by [`DocumentFilterForm`].
    pub fn set_document(&mut self, document: impl Into<String>) -> &mut Self {
        self.document = Some(document.into());
        self
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}

// ============================================================================
// BaseFilterForm
// ============================================================================

/// A built filter form, not tied to any backend.
#[derive(Debug)]
pub struct BaseFilterForm {
    form: Form,
    target: FilterTarget,
}

impl BaseFilterForm {
    /// Builds the form declared by `schema`. Its value is an empty [`Criteria`]
    /// unless the schema sets another generator.
    pub fn new<S: FilterSchema + ?Sized>(schema: &S) -> Self {
        let mut builder = FilterFormBuilder::new();
        builder.generates_value(Criteria::new());
        BaseFilterForm::configure(schema, builder)
    }

    fn configure<S: FilterSchema + ?Sized>(schema: &S, mut builder: FilterFormBuilder) -> Self {
        let mut target = FilterTarget::default();
        schema.configure_filters(&mut builder, &mut target);
        BaseFilterForm {
            form: builder.build_element(),
            target,
        }
    }

    /// Submits a payload.
    pub fn submit(&mut self, payload: &Json) -> &mut Self {
        self.form.submit(payload);
        self
    }

    pub fn state(&self) -> SubmissionState {
        self.form.state()
    }

    /// Returns `true` if a payload was submitted and accepted.
    pub fn valid(&self) -> bool {
        self.form.valid()
    }

    /// Validation messages by child path.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.form.errors()
    }

    /// The underlying form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn target(&self) -> &FilterTarget {
        &self.target
    }

    /// Generates a criteria container and fills it from the children.
    ///
    /// Every call fills a fresh container.
    pub fn value(&self) -> Result<Criteria> {
        Ok(self.form.value_as::<Criteria>()?)
    }

    /// Hands the criteria to `query`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidState`] if the form is not submitted and valid.
    /// The query is left untouched in that case.
    pub fn apply<'q, Q: Whereable + ?Sized>(&self, query: &'q mut Q) -> Result<&'q mut Q> {
        if !self.valid() {
            return Err(FilterError::not_valid());
        }

        let criteria = self.value()?;
        debug!(predicates = criteria.len(), "applying criteria");
        query.where_criteria(criteria.all())?;
        Ok(query)
    }
}

// ============================================================================
// FilterForm
// ============================================================================

/// A filter form querying a repository entity.
///
/// The repository locator is the injected one, or else the one configured
/// in [`ambient`].
pub struct FilterForm {
    base: BaseFilterForm,
    locator: Option<Arc<dyn RepositoryLocator>>,
}

impl FilterForm {
    /// Builds a form resolving repositories through the ambient locator.
    pub fn new<S: FilterSchema + ?Sized>(schema: &S) -> Self {
        FilterForm::build(schema, None)
    }

    /// Builds a form resolving repositories through `locator`.
    pub fn with_locator<S: FilterSchema + ?Sized>(
        schema: &S,
        locator: Arc<dyn RepositoryLocator>,
    ) -> Self {
        FilterForm::build(schema, Some(locator))
    }

    fn build<S: FilterSchema + ?Sized>(
        schema: &S,
        locator: Option<Arc<dyn RepositoryLocator>>,
    ) -> Self {
        // The entity is only known once the schema ran.
        let entity: Rc<RefCell<Option<String>>> = Rc::default();

        let mut builder = FilterFormBuilder::new();
        {
            let entity = Rc::clone(&entity);
            let injected = locator.clone();
            builder.generates(move || -> std::result::Result<Box<dyn Any>, FormError> {
                let entity = entity.borrow();
                Ok(Box::new(entity_criteria(entity.as_deref(), &injected)))
            });
        }

        let base = BaseFilterForm::configure(schema, builder);
        *entity.borrow_mut() = base.target.entity.clone();
        FilterForm { base, locator }
    }

    /// Submits a payload.
    pub fn submit(&mut self, payload: &Json) -> &mut Self {
        self.base.submit(payload);
        self
    }

    pub fn valid(&self) -> bool {
        self.base.valid()
    }

    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.base.errors()
    }

    pub fn value(&self) -> Result<Criteria> {
        self.base.value()
    }

    pub fn apply<'q, Q: Whereable + ?Sized>(&self, query: &'q mut Q) -> Result<&'q mut Q> {
        self.base.apply(query)
    }

    pub fn base(&self) -> &BaseFilterForm {
        &self.base
    }

    /// Builds a query from the entity repository, with the criteria applied.
    ///
    /// # Errors
    ///
    /// - [`FilterError::Configuration`] if no entity is set, no locator is
    ///   available, or the entity has no repository.
    /// - [`FilterError::InvalidState`] if the form is not valid.
    pub fn query(&self) -> Result<Box<dyn QueryInterface>> {
        let entity = self
            .base
            .target
            .entity()
            .ok_or_else(|| FilterError::configuration("the entity is not defined"))?;
        let locator = resolve_repositories(&self.locator)
            .ok_or_else(|| FilterError::configuration("no repository locator configured"))?;
        let repository = locator.repository(entity).ok_or_else(|| {
            FilterError::configuration(format!("the entity `{}` is not valid", entity))
        })?;

        let mut query = repository.builder();
        self.base.apply(query.as_mut())?;
        Ok(query)
    }

    /// Paginates `query`, or a query built by [`query`](Self::query).
    ///
    /// A given query gets the criteria applied first. The page and the page
    /// size come from the query, which reads them from the `:page` and
    /// `:limit` criteria. The page size defaults to [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidArgument`] if the query cannot be paginated,
    /// plus the errors of [`query`](Self::query).
    pub fn paginate(&self, query: Option<Box<dyn QueryInterface>>) -> Result<Paginator> {
        let query = match query {
            Some(mut query) => {
                self.base.apply(query.as_mut())?;
                query
            }
            None => self.query()?,
        };

        let (max_rows, page) = match query.as_paginable() {
            Some(paginable) => (
                paginable.limit().unwrap_or(DEFAULT_PAGE_SIZE),
                paginable.page(),
            ),
            None => return Err(not_paginable()),
        };

        debug!(max_rows, page, "paginating query");
        Paginator::new(query, max_rows, page).map_err(|_| not_paginable())
    }
}

impl fmt::Debug for FilterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterForm")
            .field("base", &self.base)
            .field("injected_locator", &self.locator.is_some())
            .finish()
    }
}

fn not_paginable() -> FilterError {
    FilterError::invalid_argument("the query must be paginable")
}

fn resolve_repositories(
    injected: &Option<Arc<dyn RepositoryLocator>>,
) -> Option<Arc<dyn RepositoryLocator>> {
    match injected {
        Some(locator) => Some(Arc::clone(locator)),
        None => {
            debug!("falling back to the ambient repository locator");
            ambient::repositories()
        }
    }
}

/// The criteria container of `entity`: backend-flavoured when its
/// repository can be resolved, empty otherwise.
fn entity_criteria(entity: Option<&str>, injected: &Option<Arc<dyn RepositoryLocator>>) -> Criteria {
    let repository = entity.and_then(|entity| {
        resolve_repositories(injected).and_then(|locator| locator.repository(entity))
    });
    match repository {
        Some(repository) => repository.criteria(),
        None => Criteria::new(),
    }
}

// ============================================================================
// DocumentFilterForm
// ============================================================================

/// A filter form querying a document collection.
pub struct DocumentFilterForm {
    base: BaseFilterForm,
    locator: Option<Arc<dyn CollectionLocator>>,
}

impl DocumentFilterForm {
    /// Builds a form resolving collections through the ambient locator.
    pub fn new<S: FilterSchema + ?Sized>(schema: &S) -> Self {
        DocumentFilterForm {
            base: BaseFilterForm::new(schema),
            locator: None,
        }
    }

    /// Builds a form resolving collections through `locator`.
    pub fn with_locator<S: FilterSchema + ?Sized>(
        schema: &S,
        locator: Arc<dyn CollectionLocator>,
    ) -> Self {
        DocumentFilterForm {
            base: BaseFilterForm::new(schema),
            locator: Some(locator),
        }
    }

    pub fn submit(&mut self, payload: &Json) -> &mut Self {
        self.base.submit(payload);
        self
    }

    pub fn valid(&self) -> bool {
        self.base.valid()
    }

    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.base.errors()
    }

    pub fn value(&self) -> Result<Criteria> {
        self.base.value()
    }

    pub fn apply<'q, Q: Whereable + ?Sized>(&self, query: &'q mut Q) -> Result<&'q mut Q> {
        self.base.apply(query)
    }

    pub fn base(&self) -> &BaseFilterForm {
        &self.base
    }

    /// Builds a query on the document collection, with the criteria applied.
    ///
    /// # Errors
    ///
    /// - [`FilterError::Configuration`] if no document is set, no locator is
    ///   available, or the document has no collection.
    /// - [`FilterError::InvalidState`] if the form is not valid.
    pub fn query(&self) -> Result<Box<dyn QueryInterface>> {
        let document = self
            .base
            .target
            .document()
            .ok_or_else(|| FilterError::configuration("the document is not defined"))?;
        let locator = match &self.locator {
            Some(locator) => Arc::clone(locator),
            None => ambient::collections()
                .ok_or_else(|| FilterError::configuration("no collection locator configured"))?,
        };
        let collection = locator.collection(document).map_err(|err| {
            debug!(error = %err, "collection lookup failed");
            FilterError::configuration(format!("the document `{}` is not valid", document))
        })?;

        let mut query = collection.query();
        self.base.apply(query.as_mut())?;
        Ok(query)
    }
}

impl fmt::Debug for DocumentFilterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFilterForm")
            .field("base", &self.base)
            .field("injected_locator", &self.locator.is_some())
            .finish()
    }
}

//! Page types.
//!
//! A [`PageType`] owns the dispatch rules that apply once a page of that
//! type has been resolved as the best match for a URL, together with the
//! schema its pages are edited with.
//!
//! # Example
//!
//! ```
//! use folio_core::{Page, PageRequest};
//! use folio_dispatch::{DispatchOutcome, FnHandler, PageType};
//!
//! # tokio_test::block_on(async {
//! let mut poets = PageType::new("poet-page").with_scene("apos");
//! poets.dispatch("/:poet", FnHandler::new(|req| {
//!     Box::pin(async move {
//!         req.template = Some("show".to_string());
//!         Ok(())
//!     })
//! }))?;
//!
//! let mut req = PageRequest::new("/chaucer")
//!     .with_best_page(Page::new("poet-page", "/poets"));
//! let outcome = poets.route(&mut req).await?;
//!
//! assert_eq!(outcome, DispatchOutcome::Handled { pattern: "/:poet".to_string() });
//! assert_eq!(req.params.get("poet"), Some("chaucer"));
//! assert_eq!(req.scene.as_deref(), Some("apos"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn, Instrument};

use folio_core::{FolioResult, Page, PageRequest};
use folio_schema::{Choice, Field, FieldType};
use folio_telemetry::metrics::{record_dispatch, record_dispatch_duration, record_short_circuit};

use crate::error::DispatchError;
use crate::middleware::{DispatchMiddleware, PageHandler, SetTemplate};
use crate::rule::{ChainOutcome, Rule};

/// Field names reserved for the page tree.
pub const FORBIDDEN_FIELDS: [&str; 3] = ["path", "rank", "level"];

/// Group holding the base page fields.
pub const UTILITY_GROUP: &str = "utility";

/// Template set by the default dispatch rule.
pub const DEFAULT_TEMPLATE: &str = "page";

/// Result of serving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The request was not for this page type; nothing changed.
    Ignored,
    /// A page type without rules accepted the exact page URL.
    Accepted,
    /// No rule matched; `not_found` was set on the request.
    NotFound,
    /// A rule matched and its handler ran.
    Handled {
        /// The matching pattern.
        pattern: String,
    },
    /// A rule matched and a middleware stopped the chain.
    ShortCircuited {
        /// The matching pattern.
        pattern: String,
        /// The middleware that returned [`Flow::Stop`](crate::Flow::Stop).
        middleware: &'static str,
    },
}

impl DispatchOutcome {
    /// Returns the outcome label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Accepted => "accepted",
            Self::NotFound => "not_found",
            Self::Handled { .. } => "handled",
            Self::ShortCircuited { .. } => "short_circuited",
        }
    }

    /// Returns true if the page type took responsibility for the request.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Handled { .. } | Self::ShortCircuited { .. }
        )
    }
}

/// A kind of page and the URL dispatch rules beneath its pages.
#[derive(Debug, Clone)]
pub struct PageType {
    name: String,
    label: String,
    scene: Option<String>,
    template: Option<String>,
    rules: Vec<Rule>,
    /// True while the `/` rule is the one `dispatch_all` registered.
    default_rule: bool,
    schema: Vec<Field>,
    groups: IndexMap<String, Vec<String>>,
}

impl PageType {
    /// Creates a page type with the base page fields and no dispatch rules.
    ///
    /// Without rules the page type only serves the exact page URL. Call
    /// [`PageType::dispatch_all`] to register the default `/` rule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let schema = base_fields();
        let mut groups = IndexMap::new();
        groups.insert(
            UTILITY_GROUP.to_string(),
            schema.iter().map(|f| f.name.clone()).collect(),
        );
        Self {
            label: name.clone(),
            name,
            scene: None,
            template: None,
            rules: Vec::new(),
            default_rule: false,
            schema,
            groups,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the scene applied when the page type accepts a request.
    #[must_use]
    pub fn with_scene(mut self, scene: impl Into<String>) -> Self {
        self.scene = Some(scene.into());
        self
    }

    /// Sets the template the default dispatch rule renders.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        if self.default_rule {
            if let Some(rule) = self.rules.iter_mut().find(|r| r.pattern() == "/") {
                rule.set_handler(Arc::new(SetTemplate::new(template.as_str())));
                debug!(page_type = %self.name, template = %template, "default dispatch template updated");
            }
        }
        self.template = Some(template);
        self
    }

    /// Adds schema fields.
    ///
    /// # Errors
    ///
    /// See [`PageType::compose_schema`].
    pub fn with_fields(mut self, fields: Vec<Field>) -> Result<Self, DispatchError> {
        self.compose_schema(fields)?;
        Ok(self)
    }

    /// Registers the default `/` rule.
    ///
    /// # Errors
    ///
    /// See [`PageType::dispatch_all`].
    pub fn with_default_dispatch(mut self) -> Result<Self, DispatchError> {
        self.dispatch_all()?;
        Ok(self)
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the configured scene.
    #[must_use]
    pub fn scene(&self) -> Option<&str> {
        self.scene.as_deref()
    }

    /// Returns the configured template.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Returns the dispatch rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the composed schema.
    #[must_use]
    pub fn schema(&self) -> &[Field] {
        &self.schema
    }

    /// Returns the schema field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.schema.iter().find(|f| f.name == name)
    }

    /// Returns field groups and the field names they hold.
    #[must_use]
    pub fn groups(&self) -> &IndexMap<String, Vec<String>> {
        &self.groups
    }

    /// Merges `fields` into the schema.
    ///
    /// A field named like an existing one replaces it. `trash` is never
    /// part of a page schema and is dropped. Nothing changes if any field
    /// is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ForbiddenField`] for `path`, `rank`, or
    /// `level`, and [`DispatchError::InvalidField`] for a field whose
    /// definition contradicts itself.
    pub fn compose_schema(&mut self, fields: Vec<Field>) -> Result<(), DispatchError> {
        for field in &fields {
            if FORBIDDEN_FIELDS.contains(&field.name.as_str()) {
                warn!(page_type = %self.name, field = %field.name, "forbidden page type field");
                return Err(DispatchError::forbidden_field(&self.name, &field.name));
            }
            field.check()?;
        }
        for field in fields {
            if field.name == "trash" {
                debug!(page_type = %self.name, "trash field dropped from page schema");
                continue;
            }
            match self.schema.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field,
                None => self.schema.push(field),
            }
        }
        Ok(())
    }

    /// Replaces the choices of the `type` field.
    pub fn set_type_choices(&mut self, choices: Vec<Choice>) {
        if let Some(field) = self.schema.iter_mut().find(|f| f.name == "type") {
            field.choices = choices;
        }
    }

    /// Registers a rule. Middleware runs in the given order before the
    /// handler.
    ///
    /// Rules are matched in registration order. Registering a pattern
    /// again replaces the earlier rule and keeps its position.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidPattern`] if the pattern is malformed.
    pub fn register_route(
        &mut self,
        pattern: &str,
        middleware: Vec<Arc<dyn DispatchMiddleware>>,
        handler: impl PageHandler,
    ) -> Result<&mut Self, DispatchError> {
        let rule = Rule::new(pattern, middleware, Arc::new(handler)).map_err(|err| {
            warn!(page_type = %self.name, pattern, error = %err, "invalid dispatch pattern");
            err
        })?;
        if pattern == "/" {
            self.default_rule = false;
        }
        match self.rules.iter_mut().find(|r| r.pattern() == pattern) {
            Some(existing) => {
                debug!(page_type = %self.name, pattern, "dispatch rule replaced");
                *existing = rule;
            }
            None => {
                debug!(page_type = %self.name, pattern, "dispatch rule registered");
                self.rules.push(rule);
            }
        }
        Ok(self)
    }

    /// Registers a rule without middleware.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidPattern`] if the pattern is malformed.
    pub fn dispatch(
        &mut self,
        pattern: &str,
        handler: impl PageHandler,
    ) -> Result<&mut Self, DispatchError> {
        self.register_route(pattern, Vec::new(), handler)
    }

    /// Registers the default `/` rule, which renders the configured
    /// template or `page`.
    ///
    /// A template set later with [`PageType::with_template`] is picked up
    /// by this rule until another `/` rule replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidPattern`] if `/` fails to compile.
    pub fn dispatch_all(&mut self) -> Result<(), DispatchError> {
        let template = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let handler = SetTemplate::new(template);
        self.dispatch("/", handler)?;
        self.default_rule = true;
        Ok(())
    }

    /// Makes the best page the current page and applies the scene.
    pub fn accept_responsibility(&self, req: &mut PageRequest) {
        req.data.page = req.data.best_page.clone();
        if let Some(scene) = &self.scene {
            req.scene = Some(scene.clone());
        }
    }

    /// Routes a request already bound to a page of this type.
    ///
    /// Unmatched URLs set [`PageRequest::not_found`] and return
    /// [`DispatchOutcome::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns errors from middleware and handlers unchanged.
    pub async fn route(&self, req: &mut PageRequest) -> FolioResult<DispatchOutcome> {
        let span = tracing::debug_span!(
            "dispatch",
            page_type = %self.name,
            request_id = %req.request_id(),
            remainder = %req.remainder,
        );
        let outcome = self.route_inner(req).instrument(span).await?;
        record_dispatch(&self.name, outcome.as_str());
        Ok(outcome)
    }

    async fn route_inner(&self, req: &mut PageRequest) -> FolioResult<DispatchOutcome> {
        if self.rules.is_empty() {
            if req.has_empty_remainder() {
                self.accept_responsibility(req);
                debug!("page type without rules accepted exact URL");
                return Ok(DispatchOutcome::Accepted);
            }
            req.not_found = true;
            debug!("page type without rules rejected remainder");
            return Ok(DispatchOutcome::NotFound);
        }

        let matched = self.rules.iter().find_map(|rule| {
            trace!(pattern = rule.pattern(), "trying dispatch rule");
            rule.matches(&req.remainder).map(|params| (rule, params))
        });
        let Some((rule, params)) = matched else {
            req.not_found = true;
            debug!("no dispatch rule matched");
            return Ok(DispatchOutcome::NotFound);
        };

        req.params = params;
        self.accept_responsibility(req);
        debug!(pattern = rule.pattern(), params = req.params.len(), "dispatch rule matched");

        let started = Instant::now();
        let chain = rule.run(req).await;
        record_dispatch_duration(&self.name, started.elapsed());

        let pattern = rule.pattern().to_string();
        match chain? {
            ChainOutcome::Handled => Ok(DispatchOutcome::Handled { pattern }),
            ChainOutcome::Stopped(middleware) => {
                record_short_circuit(&self.name);
                debug!(middleware, "dispatch chain stopped by middleware");
                Ok(DispatchOutcome::ShortCircuited {
                    pattern,
                    middleware,
                })
            }
        }
    }

    /// Returns the text representing a page in autocomplete menus.
    #[must_use]
    pub fn autocomplete_title(&self, page: &Page) -> String {
        format!("{} ({})", page.title, page.slug)
    }

    /// Adds `slug` to an autocomplete projection.
    #[must_use]
    pub fn autocomplete_projection(&self, mut projection: Map<String, Value>) -> Map<String, Value> {
        projection.insert("slug".to_string(), Value::from(1));
        projection
    }
}

fn base_fields() -> Vec<Field> {
    vec![
        Field::new("slug", FieldType::Slug)
            .with_label("Slug")
            .required()
            .following("title"),
        Field::new("type", FieldType::Select)
            .with_label("Type")
            .required(),
        Field::new("orphan", FieldType::Boolean)
            .with_label("Hide in Navigation")
            .with_def(Value::Bool(false)),
    ]
}

//! Auto-discovery bootstrapper.
//!
//! Scans a DOM subtree for elements declaring widget types, resolves each
//! declared name through the module resolver, and instantiates one widget
//! per (element, type) pair. Resolution failures are reported per pair
//! and never abort processing of siblings.

use std::rc::Rc;
use std::sync::Arc;

use trellis_core::alloc::HashMap;
use trellis_dom::{Dom, NodeId, Selector};

use crate::definition::WidgetDefinition;
use crate::error::{WidgetError, WidgetResult};
use crate::instance::Widget;
use crate::resolver::ModuleResolver;
use crate::task_pool::TaskPool;

/// Declaration attribute: whitespace-separated widget type names.
pub const TYPE_ATTR: &str = "data-widget-type";

/// Instantiation marker: names already bound on an element. This is the
/// idempotence guard - re-running discovery skips marked pairs. Clearing
/// the attribute re-arms discovery for that element.
pub const BOUND_ATTR: &str = "data-widget-bound";

/// Parse a whitespace-separated type-name list: order preserved,
/// duplicates dropped.
pub fn parse_type_list(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in raw.split_whitespace() {
        if !names.iter().any(|n| n == token) {
            names.push(token.to_string());
        }
    }
    names
}

/// A per-(element, type) discovery failure.
#[derive(Debug)]
pub struct DiscoveryError {
    pub element: NodeId,
    pub widget: String,
    pub error: WidgetError,
}

/// Outcome of one discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Widgets constructed by this pass, in declaration order.
    pub widgets: Vec<Widget>,
    /// Failures, one per (element, type) pair that did not resolve or
    /// construct.
    pub errors: Vec<DiscoveryError>,
}

impl DiscoveryReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Discovers declared widgets and instantiates them.
pub struct Bootstrapper {
    resolver: Arc<ModuleResolver>,
    pool: Option<Arc<TaskPool>>,
}

impl Bootstrapper {
    /// Bootstrapper resolving inline on the calling task.
    pub fn new(resolver: Arc<ModuleResolver>) -> Self {
        Self {
            resolver,
            pool: None,
        }
    }

    /// Bootstrapper spawning resolutions on a task pool, so independent
    /// names resolve concurrently and complete in any order.
    pub fn with_pool(resolver: Arc<ModuleResolver>, pool: Arc<TaskPool>) -> Self {
        Self {
            resolver,
            pool: Some(pool),
        }
    }

    /// Discover and instantiate widgets under `scope` (whole document
    /// when `None`; the scope element itself participates if it
    /// declares).
    ///
    /// Each unique name is resolved once per pass (and cached across
    /// passes by the resolver). Cancellation: this is an ordinary future;
    /// dropping it - or the task driving it - abandons pending
    /// resolutions and constructs nothing further.
    pub async fn discover(&self, dom: &Rc<dyn Dom>, scope: Option<NodeId>) -> DiscoveryReport {
        let pairs = self.collect_pairs(dom.as_ref(), scope);
        let mut names: Vec<String> = Vec::new();
        for (_, name) in &pairs {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }

        let resolved = self.resolve_all(names).await;

        let mut report = DiscoveryReport::default();
        for (element, name) in pairs {
            let outcome = match resolved.get(&name) {
                Some(Ok(definition)) => Widget::new(definition, dom.clone(), element),
                Some(Err(error)) => Err(error.clone()),
                // Unreachable: every pair's name was resolved above.
                None => Err(WidgetError::ModuleResolution {
                    name: name.clone(),
                    message: "resolution missing".to_string(),
                }),
            };
            match outcome {
                Ok(widget) => {
                    dom.append_attr_token(element, BOUND_ATTR, &name);
                    report.widgets.push(widget);
                }
                Err(error) => {
                    tracing::warn!(widget = %name, ?element, %error, "discovery failed for pair");
                    report.errors.push(DiscoveryError {
                        element,
                        widget: name,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Blocking convenience wrapper around [`discover`](Self::discover).
    pub fn discover_blocking(&self, dom: &Rc<dyn Dom>, scope: Option<NodeId>) -> DiscoveryReport {
        futures_lite::future::block_on(self.discover(dom, scope))
    }

    fn collect_pairs(&self, dom: &dyn Dom, scope: Option<NodeId>) -> Vec<(NodeId, String)> {
        let mut elements = Vec::new();
        if let Some(scope_el) = scope
            && dom.attr(scope_el, TYPE_ATTR).is_some()
        {
            elements.push(scope_el);
        }
        elements.extend(dom.query(&Selector::attr(TYPE_ATTR), scope));

        let mut pairs = Vec::new();
        for element in elements {
            let raw = dom.attr(element, TYPE_ATTR).unwrap_or_default();
            for name in parse_type_list(&raw) {
                if dom.has_attr_token(element, BOUND_ATTR, &name) {
                    continue;
                }
                pairs.push((element, name));
            }
        }
        pairs
    }

    async fn resolve_all(
        &self,
        names: Vec<String>,
    ) -> HashMap<String, WidgetResult<Arc<WidgetDefinition>>> {
        let mut resolved = HashMap::new();
        match &self.pool {
            Some(pool) => {
                let tasks: Vec<_> = names
                    .iter()
                    .map(|name| {
                        let resolver = self.resolver.clone();
                        let name = name.clone();
                        pool.spawn(async move { resolver.resolve(&name).await })
                    })
                    .collect();
                for (name, task) in names.into_iter().zip(tasks) {
                    resolved.insert(name, task.await);
                }
            }
            None => {
                for name in names {
                    let result = self.resolver.resolve(&name).await;
                    resolved.insert(name, result);
                }
            }
        }
        resolved
    }
}

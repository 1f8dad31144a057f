//! Addon attachment engine.
//!
//! An addon augments an existing definition without touching its method
//! table: it contributes an initializer that runs on each new instance
//! strictly after the base constructor. Attachment is non-destructive -
//! it produces a new definition value, so instances constructed from the
//! un-augmented definition are never retroactively changed.

use std::fmt;
use std::sync::Arc;

use crate::definition::WidgetDefinition;
use crate::error::WidgetResult;
use crate::instance::WidgetInstance;

/// An addon initializer, invoked with the freshly constructed instance.
pub type AddonFn = Arc<dyn Fn(&mut WidgetInstance) -> WidgetResult<()> + Send + Sync>;

/// An independently loadable unit of behavior attached to a definition.
#[derive(Clone)]
pub struct Addon {
    name: String,
    init: AddonFn,
}

impl Addon {
    pub fn new(
        name: impl Into<String>,
        init: impl Fn(&mut WidgetInstance) -> WidgetResult<()> + Send + Sync + 'static,
    ) -> Addon {
        Addon {
            name: name.into(),
            init: Arc::new(init),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the initializer. Errors propagate to whoever triggered
    /// construction; a failed addon likely left the instance inconsistent.
    pub(crate) fn run(&self, widget: &mut WidgetInstance) -> WidgetResult<()> {
        (self.init)(widget)
    }
}

impl fmt::Debug for Addon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Addon").field("name", &self.name).finish()
    }
}

/// Produce an augmented definition whose constructor runs the base
/// constructor, the already-attached addons, then `addon`, in that order.
pub fn attach(definition: &Arc<WidgetDefinition>, addon: Addon) -> Arc<WidgetDefinition> {
    tracing::debug!(
        widget = definition.name(),
        addon = addon.name(),
        "addon attached"
    );
    Arc::new(definition.with_addon(addon))
}

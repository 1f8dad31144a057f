//! Trellis - a declarative widget runtime
//!
//! Trellis builds interactive widgets over an abstract document facade.
//! Its pieces:
//!
//! - **Definitions**: named, immutable method tables with extension by
//!   merge and explicit super handles
//! - **Addons**: non-destructive augmentation of sealed definitions
//! - **Instances**: per-element lifecycle, parts, options and events
//! - **Discovery**: scan markup for `data-widget-type` declarations and
//!   auto-instantiate, resolving definitions asynchronously by name
//! - **Widgets**: a stock set (tab, accordion, dropdown, dialog,
//!   carousel) built entirely through the extension engine
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use trellis::prelude::*;
//!
//! # fn main() -> trellis::runtime::WidgetResult<()> {
//! let mut registry = DefinitionRegistry::new();
//! CorePack.register(&mut registry)?;
//! registry.attach("tab", trellis::widgets::addons::keyboard())?;
//!
//! let mem = Rc::new(MemoryDom::new());
//! let root = mem.add_element(mem.document(), "div", [("data-widget-type", "tab")]);
//! let dom: Rc<dyn Dom> = mem.clone();
//!
//! let resolver = Arc::new(ModuleResolver::new(RegistrySource::new(Arc::new(registry))));
//! let report = Bootstrapper::new(resolver).discover_blocking(&dom, None);
//! assert!(report.is_clean());
//! for widget in &report.widgets {
//!     widget.invoke("select", &[Value::from(0usize)])?;
//! }
//! # Ok(())
//! # }
//! ```

// Re-export sub-crates under stable names
pub use trellis_core as core;
pub use trellis_dom as dom;
pub use trellis_runtime as runtime;

#[cfg(feature = "widgets")]
pub use trellis_widgets as widgets;

pub use trellis_core::Value;
pub use trellis_dom::{Dom, DomEvent, MemoryDom, NodeId, Selector};
pub use trellis_runtime::{
    Addon, Bootstrapper, DefinitionBuilder, DefinitionRegistry, DiscoveryReport, Lifecycle,
    ModuleResolver, ModuleSource, RegistrySource, TaskPool, Widget, WidgetDefinition, WidgetError,
    WidgetInstance, WidgetResult,
};

#[cfg(feature = "widgets")]
pub use trellis_widgets::{CorePack, WidgetPack};

/// Prelude module for convenient imports
pub mod prelude {
    pub use trellis_core::Value;
    pub use trellis_dom::{Dom, DomEvent, MemoryDom, NodeId, Selector};
    pub use trellis_runtime::{
        Addon, Bootstrapper, DefinitionRegistry, Lifecycle, ModuleResolver, RegistrySource,
        SETUP_OP, Widget, WidgetDefinition, WidgetError, WidgetResult,
    };

    #[cfg(feature = "widgets")]
    pub use trellis_widgets::{CorePack, WidgetPack};
}

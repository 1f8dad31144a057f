//! Trellis runtime - widget definition, extension and discovery.
//!
//! The engineering core of Trellis:
//! - [`definition`]: named, immutable widget definitions; extension by
//!   method-table merge with explicit super handles
//! - [`addon`]: non-destructive augmentation via post-construction
//!   initializers, run in attachment order
//! - [`registry`]: process-wide name -> definition lookup
//! - [`instance`]: widget construction, lifecycle, parts, dispatch
//! - [`resolver`]: async named-module resolution with a per-name cache
//! - [`discover`]: markup scanning and auto-instantiation
//! - [`task_pool`]: worker threads driving concurrent resolution
//!
//! ```ignore
//! let mut registry = DefinitionRegistry::new();
//! registry.register(tab_definition)?;
//! registry.attach("tab", keyboard_addon)?;
//!
//! let resolver = Arc::new(ModuleResolver::new(RegistrySource::new(Arc::new(registry))));
//! let report = Bootstrapper::new(resolver).discover_blocking(&dom, None);
//! for widget in &report.widgets {
//!     widget.invoke("select", &[Value::from(0usize)])?;
//! }
//! ```

pub mod addon;
pub mod definition;
pub mod discover;
pub mod error;
pub mod instance;
pub mod registry;
pub mod resolver;
pub mod task_pool;

pub use addon::{Addon, AddonFn, attach};
pub use definition::{DefinitionBuilder, Method, OpCall, OpFn, SETUP_OP, WidgetDefinition};
pub use discover::{
    BOUND_ATTR, Bootstrapper, DiscoveryError, DiscoveryReport, TYPE_ATTR, parse_type_list,
};
pub use error::{WidgetError, WidgetResult};
pub use instance::{Lifecycle, Widget, WidgetInstance};
pub use registry::{DefinitionRegistry, DuplicatePolicy};
pub use resolver::{FetchFuture, ModuleResolver, ModuleSource, RegistrySource};
pub use task_pool::TaskPool;

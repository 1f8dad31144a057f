//! Definition registry.
//!
//! Process-wide lookup of sealed definitions by name. The registry is
//! populated at startup and read-only afterwards; it is passed by
//! reference (or behind `Arc`) into the bootstrapper and module sources
//! rather than living in a global.

use std::sync::Arc;

use trellis_core::alloc::IndexMap;

use crate::addon::{self, Addon};
use crate::definition::{DefinitionBuilder, WidgetDefinition};
use crate::error::{WidgetError, WidgetResult};

/// What to do when a name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`WidgetError::DuplicateDefinition`]. Catches accidental
    /// double-loads; the default.
    #[default]
    Reject,
    /// Treat re-registration as redefinition.
    Replace,
}

/// Named widget definitions.
pub struct DefinitionRegistry {
    policy: DuplicatePolicy,
    defs: IndexMap<String, Arc<WidgetDefinition>>,
}

impl DefinitionRegistry {
    /// Create an empty registry with the rejecting duplicate policy.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Reject)
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            defs: IndexMap::new(),
        }
    }

    /// Register a sealed definition under its own name.
    pub fn register(&mut self, definition: Arc<WidgetDefinition>) -> WidgetResult<()> {
        let name = definition.name().to_string();
        if self.defs.contains_key(&name) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(WidgetError::DuplicateDefinition { name });
                }
                DuplicatePolicy::Replace => {
                    tracing::debug!(%name, "widget definition replaced");
                }
            }
        } else {
            tracing::debug!(%name, "widget definition registered");
        }
        self.defs.insert(name, definition);
        Ok(())
    }

    /// Look up a definition by name.
    pub fn resolve(&self, name: &str) -> WidgetResult<Arc<WidgetDefinition>> {
        self.defs
            .get(name)
            .cloned()
            .ok_or_else(|| WidgetError::UnknownWidget {
                name: name.to_string(),
            })
    }

    /// Attach an addon to the registered definition for `target`,
    /// replacing the entry with the augmented definition. Instances
    /// already constructed from the previous entry are unaffected.
    pub fn attach(&mut self, target: &str, addon: Addon) -> WidgetResult<()> {
        let definition = self.resolve(target)?;
        let augmented = addon::attach(&definition, addon);
        self.defs.insert(target.to_string(), augmented);
        Ok(())
    }

    /// Start an extension of the registered definition for `parent`.
    ///
    /// Extending an unknown name is a structural error
    /// ([`WidgetError::Definition`]), not a resolution failure.
    pub fn extend(&self, parent: &str) -> WidgetResult<DefinitionBuilder> {
        let definition = self.defs.get(parent).ok_or_else(|| WidgetError::Definition {
            message: format!("cannot extend unknown definition '{parent}'"),
        })?;
        Ok(WidgetDefinition::extend(definition))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

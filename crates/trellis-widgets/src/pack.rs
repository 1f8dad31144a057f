//! Widget packs: batch registration of definition sets.

use trellis_runtime::{DefinitionRegistry, WidgetResult};

use crate::{accordion, carousel, dialog, dropdown, tab};

/// A named set of widget definitions registered as a unit.
pub trait WidgetPack {
    fn name(&self) -> &str;

    /// Register every definition of the pack. Fails on the first error;
    /// under the rejecting duplicate policy a partial registration is
    /// visible in the registry.
    fn register(&self, registry: &mut DefinitionRegistry) -> WidgetResult<()>;
}

/// The stock widget set.
pub struct CorePack;

impl WidgetPack for CorePack {
    fn name(&self) -> &str {
        "core"
    }

    fn register(&self, registry: &mut DefinitionRegistry) -> WidgetResult<()> {
        registry.register(tab::definition()?)?;
        registry.register(accordion::definition()?)?;
        registry.register(dropdown::definition()?)?;
        registry.register(dialog::definition()?)?;
        registry.register(carousel::definition()?)?;
        tracing::debug!(pack = self.name(), "widget pack registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_pack_registers_all() {
        let mut registry = DefinitionRegistry::new();
        CorePack.register(&mut registry).unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["tab", "accordion", "dropdown", "dialog", "carousel"]
        );
    }

    #[test]
    fn test_core_pack_rejects_double_registration() {
        let mut registry = DefinitionRegistry::new();
        CorePack.register(&mut registry).unwrap();
        assert!(CorePack.register(&mut registry).is_err());
    }
}

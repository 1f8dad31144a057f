//! Widget definitions and the extension engine.
//!
//! A [`WidgetDefinition`] is a named, immutable method table plus merged
//! default options. Extension is a table merge, not a live prototype
//! chain: sealing a child copies the parent's entries and overlays the
//! child's own, and each overriding method captures an explicit handle to
//! the implementation it shadows. Nothing is resolved dynamically at call
//! time, so re-registering or augmenting a parent later never changes an
//! already-sealed child.

use std::fmt;
use std::sync::Arc;

use trellis_core::Value;
use trellis_core::alloc::IndexMap;

use crate::addon::Addon;
use crate::error::{WidgetError, WidgetResult};
use crate::instance::WidgetInstance;

/// Name of the structural-setup operation run at construction time.
pub const SETUP_OP: &str = "setup";

/// An operation implementation.
///
/// The second argument carries the call's arguments and, for overriding
/// methods, the handle to the shadowed parent implementation.
pub type OpFn = Arc<dyn Fn(&mut WidgetInstance, &OpCall<'_>) -> WidgetResult<Value> + Send + Sync>;

/// A sealed method table entry: the implementation plus the captured
/// parent handle (the "super" reference).
pub struct Method {
    run: OpFn,
    parent: Option<Arc<Method>>,
}

impl Method {
    /// Invoke this method against a widget instance.
    pub fn invoke(&self, widget: &mut WidgetInstance, args: &[Value]) -> WidgetResult<Value> {
        (self.run)(
            widget,
            &OpCall {
                args,
                parent: self.parent.as_deref(),
            },
        )
    }

    /// Whether this method shadows a parent implementation.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Context handed to an operation implementation.
pub struct OpCall<'a> {
    /// Positional call arguments.
    pub args: &'a [Value],
    parent: Option<&'a Method>,
}

impl OpCall<'_> {
    /// The argument at `index`, if provided.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// The argument at `index` interpreted as a non-negative index.
    pub fn index_arg(&self, index: usize) -> Option<usize> {
        self.arg(index).and_then(Value::as_index)
    }

    /// Whether a shadowed parent implementation exists.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Invoke the shadowed parent implementation with the same arguments.
    ///
    /// The handle was captured when the child definition was sealed, so
    /// this always reaches the implementation that was shadowed - never a
    /// grandchild's override, regardless of further extension.
    pub fn call_parent(&self, widget: &mut WidgetInstance) -> WidgetResult<Value> {
        match self.parent {
            Some(parent) => parent.invoke(widget, self.args),
            None => Err(WidgetError::Definition {
                message: "call_parent on a method with no shadowed implementation".to_string(),
            }),
        }
    }
}

/// A named, immutable widget specification: method table, merged default
/// options and the ordered addon chain.
pub struct WidgetDefinition {
    name: String,
    parent_name: Option<String>,
    methods: IndexMap<String, Arc<Method>>,
    defaults: IndexMap<String, Value>,
    addons: Vec<Addon>,
}

impl WidgetDefinition {
    /// Start building a root definition.
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder {
            name: Some(name.into()),
            parent: None,
            methods: IndexMap::new(),
            defaults: IndexMap::new(),
        }
    }

    /// Start building a definition extending `parent`.
    ///
    /// The builder inherits the parent's methods, default options and
    /// addon chain; set a new name with
    /// [`name`](DefinitionBuilder::name) before sealing.
    pub fn extend(parent: &Arc<WidgetDefinition>) -> DefinitionBuilder {
        DefinitionBuilder {
            name: None,
            parent: Some(parent.clone()),
            methods: IndexMap::new(),
            defaults: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the definition this one extends, if any.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Look up a sealed method.
    pub fn method(&self, name: &str) -> Option<&Arc<Method>> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Names in the sealed method table, in definition order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// The effective default options, frozen at seal time.
    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    /// Attached addons, in attachment order.
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    /// A copy of this definition with one more addon appended.
    pub(crate) fn with_addon(&self, addon: Addon) -> WidgetDefinition {
        let mut addons = self.addons.clone();
        addons.push(addon);
        WidgetDefinition {
            name: self.name.clone(),
            parent_name: self.parent_name.clone(),
            methods: self.methods.clone(),
            defaults: self.defaults.clone(),
            addons,
        }
    }
}

impl fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("name", &self.name)
            .field("parent", &self.parent_name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .field(
                "addons",
                &self.addons.iter().map(Addon::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for a widget definition (the extension engine).
pub struct DefinitionBuilder {
    name: Option<String>,
    parent: Option<Arc<WidgetDefinition>>,
    methods: IndexMap<String, OpFn>,
    defaults: IndexMap<String, Value>,
}

impl DefinitionBuilder {
    /// Set the definition's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set (or override) a default option.
    pub fn default_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Set (or override) a method. When the parent defines the same name,
    /// the sealed method receives a handle to the shadowed implementation
    /// via [`OpCall::call_parent`].
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&mut WidgetInstance, &OpCall<'_>) -> WidgetResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Finalize into an immutable definition.
    ///
    /// Merges the parent's method table (copy, then overlay own entries)
    /// and default options (shallow override, own keys win), and captures
    /// parent handles for every overriding method.
    pub fn seal(self) -> WidgetResult<Arc<WidgetDefinition>> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(WidgetError::Definition {
                    message: "definition has no name".to_string(),
                });
            }
        };

        let (mut methods, mut defaults, addons, parent_name) = match &self.parent {
            Some(parent) => (
                parent.methods.clone(),
                parent.defaults.clone(),
                parent.addons.clone(),
                Some(parent.name.clone()),
            ),
            None => (IndexMap::new(), IndexMap::new(), Vec::new(), None),
        };

        for (op, run) in self.methods {
            let shadowed = self
                .parent
                .as_ref()
                .and_then(|parent| parent.methods.get(&op).cloned());
            methods.insert(
                op,
                Arc::new(Method {
                    run,
                    parent: shadowed,
                }),
            );
        }

        for (key, value) in self.defaults {
            defaults.insert(key, value);
        }

        tracing::debug!(
            %name,
            parent = parent_name.as_deref(),
            "widget definition sealed"
        );

        Ok(Arc::new(WidgetDefinition {
            name,
            parent_name,
            methods,
            defaults,
            addons,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use trellis_dom::{Dom, MemoryDom, NodeId};

    use super::*;
    use crate::instance::Widget;

    fn dom_with_root() -> (Rc<dyn Dom>, NodeId) {
        let dom = Rc::new(MemoryDom::new());
        let root = dom.add_element(dom.document(), "div", []);
        (dom, root)
    }

    fn base() -> Arc<WidgetDefinition> {
        WidgetDefinition::builder("base")
            .default_option("a", 1i64)
            .default_option("b", 1i64)
            .default_option("c", 1i64)
            .method("greet", |_, _| Ok(Value::from("root")))
            .method("shared", |_, _| Ok(Value::from("shared")))
            .seal()
            .unwrap()
    }

    #[test]
    fn test_inherited_method_reachable_on_child() {
        let parent = base();
        let child = WidgetDefinition::extend(&parent)
            .name("child")
            .method("greet", |_, _| Ok(Value::from("child")))
            .seal()
            .unwrap();

        let (dom, root) = dom_with_root();
        let widget = Widget::new(&child, dom, root).unwrap();
        // Not overridden: parent's implementation, identical behavior.
        assert_eq!(widget.invoke("shared", &[]).unwrap(), Value::from("shared"));
        // Overridden: child shadows.
        assert_eq!(widget.invoke("greet", &[]).unwrap(), Value::from("child"));
    }

    #[test]
    fn test_super_call_reaches_shadowed_impl() {
        let parent = base();
        let child = WidgetDefinition::extend(&parent)
            .name("child")
            .method("greet", |w, call| {
                let inherited = call.call_parent(w)?;
                Ok(Value::Str(format!("{}+child", inherited.to_attr())))
            })
            .seal()
            .unwrap();
        let grandchild = WidgetDefinition::extend(&child)
            .name("grandchild")
            .method("greet", |w, call| {
                let inherited = call.call_parent(w)?;
                Ok(Value::Str(format!("{}+grand", inherited.to_attr())))
            })
            .seal()
            .unwrap();

        let (dom, root) = dom_with_root();
        let widget = Widget::new(&grandchild, dom, root).unwrap();
        // Each super handle is fixed at seal time: grandchild reaches the
        // child's implementation, which reaches the root's. No recursion.
        assert_eq!(
            widget.invoke("greet", &[]).unwrap(),
            Value::from("root+child+grand")
        );
    }

    #[test]
    fn test_call_parent_without_parent_fails() {
        let def = WidgetDefinition::builder("lone")
            .method("op", |w, call| call.call_parent(w))
            .seal()
            .unwrap();
        let (dom, root) = dom_with_root();
        let widget = Widget::new(&def, dom, root).unwrap();
        assert!(matches!(
            widget.invoke("op", &[]),
            Err(WidgetError::Definition { .. })
        ));
    }

    #[test]
    fn test_three_level_options_merge_deepest_wins() {
        let parent = base();
        let c1 = WidgetDefinition::extend(&parent)
            .name("c1")
            .default_option("b", 2i64)
            .default_option("d", 2i64)
            .seal()
            .unwrap();
        let c2 = WidgetDefinition::extend(&c1)
            .name("c2")
            .default_option("b", 3i64)
            .default_option("c", 3i64)
            .seal()
            .unwrap();

        let defaults = c2.defaults();
        assert_eq!(defaults.get("a"), Some(&Value::Int(1)));
        assert_eq!(defaults.get("b"), Some(&Value::Int(3)));
        assert_eq!(defaults.get("c"), Some(&Value::Int(3)));
        assert_eq!(defaults.get("d"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_options_merge_associative_when_disjoint() {
        let parent = base();
        let left = WidgetDefinition::extend(&parent)
            .name("left")
            .default_option("x", 10i64)
            .seal()
            .unwrap();
        let left_then_right = WidgetDefinition::extend(&left)
            .name("lr")
            .default_option("y", 20i64)
            .seal()
            .unwrap();

        // Disjoint keys: merging in either grouping yields the same map.
        let mut expected = parent.defaults().clone();
        expected.insert("x".to_string(), Value::Int(10));
        expected.insert("y".to_string(), Value::Int(20));
        assert_eq!(left_then_right.defaults(), &expected);
    }

    #[test]
    fn test_seal_requires_name() {
        let parent = base();
        let err = WidgetDefinition::extend(&parent).seal().unwrap_err();
        assert!(matches!(err, WidgetError::Definition { .. }));
    }

    #[test]
    fn test_sealed_parent_unaffected_by_child() {
        let parent = base();
        let _child = WidgetDefinition::extend(&parent)
            .name("child")
            .default_option("a", 99i64)
            .method("greet", |_, _| Ok(Value::from("child")))
            .seal()
            .unwrap();

        let (dom, root) = dom_with_root();
        let widget = Widget::new(&parent, dom, root).unwrap();
        assert_eq!(widget.invoke("greet", &[]).unwrap(), Value::from("root"));
        assert_eq!(parent.defaults().get("a"), Some(&Value::Int(1)));
    }
}

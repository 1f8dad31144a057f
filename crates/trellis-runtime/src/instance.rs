//! Widget instances and their lifecycle.
//!
//! Construction runs the definition's `setup` method (annotation, part
//! declarations, handler binding), moves the instance to `Ready`, then
//! runs addon initializers in attachment order. Instances are
//! single-threaded: the public [`Widget`] handle wraps
//! `Rc<RefCell<WidgetInstance>>`, and DOM handlers re-enter operations
//! through a `Weak` reference - once the instance is dropped (orphaned
//! element, page teardown) those handlers become inert.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use trellis_core::Value;
use trellis_core::alloc::IndexMap;
use trellis_dom::{Dom, DomEvent, Handler, HandlerId, NodeId, Selector};

use crate::definition::{SETUP_OP, WidgetDefinition};
use crate::error::{WidgetError, WidgetResult};

/// Lifecycle states of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Root bound and options resolved; setup not yet run.
    Constructed,
    /// Setup complete; the public API is safe to call. Terminal for
    /// normal operation.
    Ready,
    /// Handlers unbound via [`Widget::detach`]. Mutating operations fail
    /// with [`WidgetError::DetachedWidget`].
    Detached,
}

struct PartSlot {
    selector: Selector,
    cached: Option<Vec<NodeId>>,
}

/// Runtime state of one widget bound to one element.
///
/// Operations and addon initializers receive `&mut WidgetInstance`; page
/// scripts go through the [`Widget`] handle instead.
pub struct WidgetInstance {
    root: NodeId,
    dom: Rc<dyn Dom>,
    definition: Arc<WidgetDefinition>,
    options: IndexMap<String, Value>,
    parts: IndexMap<String, PartSlot>,
    state: IndexMap<String, Value>,
    lifecycle: Lifecycle,
    handlers: Vec<HandlerId>,
    pending_events: Vec<(String, Value)>,
    self_ref: Weak<RefCell<WidgetInstance>>,
}

impl WidgetInstance {
    /// The element this widget is bound to.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The DOM capability facade.
    pub fn dom(&self) -> &Rc<dyn Dom> {
        &self.dom
    }

    pub fn definition(&self) -> &Arc<WidgetDefinition> {
        &self.definition
    }

    /// The definition's name.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Effective option value, resolved once at construction.
    pub fn option(&self, key: &str) -> Value {
        self.options.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    /// Read a state entry.
    pub fn state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Write a state entry.
    pub fn set_state(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.insert(key.into(), value.into());
    }

    /// Declare a named part as a selector over the widget's subtree.
    /// Redeclaring resets the cache for that part.
    pub fn define_part(&mut self, name: impl Into<String>, selector: Selector) {
        self.parts.insert(
            name.into(),
            PartSlot {
                selector,
                cached: None,
            },
        );
    }

    /// Elements of a declared part, computed lazily and cached until
    /// [`rescan_parts`](Self::rescan_parts).
    pub fn part(&mut self, name: &str) -> WidgetResult<Vec<NodeId>> {
        let root = self.root;
        let slot = self
            .parts
            .get_mut(name)
            .ok_or_else(|| WidgetError::Definition {
                message: format!("part '{}' not declared by widget '{}'", name, self.definition.name()),
            })?;
        if slot.cached.is_none() {
            slot.cached = Some(self.dom.query(&slot.selector, Some(root)));
        }
        Ok(slot.cached.clone().unwrap_or_default())
    }

    /// Drop all cached part computations; the next [`part`](Self::part)
    /// call re-queries the subtree.
    pub fn rescan_parts(&mut self) {
        for slot in self.parts.values_mut() {
            slot.cached = None;
        }
    }

    /// Declared part names, in declaration order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Write an attribute through the facade.
    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.dom.set_attr(node, name, value);
    }

    /// Write an attribute on the root element.
    pub fn set_root_attr(&self, name: &str, value: &str) {
        self.dom.set_attr(self.root, name, value);
    }

    /// Queue an internal event on the root element. Events are flushed
    /// once the current operation's mutable borrow ends, so listeners run
    /// synchronously within the invoking call without re-entering the
    /// instance while it is borrowed.
    pub fn emit(&mut self, event: impl Into<String>, payload: impl Into<Value>) {
        self.pending_events.push((event.into(), payload.into()));
    }

    /// Subscribe a DOM event on `node` to an operation, with fixed
    /// arguments. The subscription is removed by [`Widget::detach`].
    pub fn bind(&mut self, node: NodeId, event: &str, op: impl Into<String>, args: Vec<Value>) {
        let handler = self.op_handler(op.into(), move |_| args.clone());
        let id = self.dom.on(node, event, handler);
        self.handlers.push(id);
    }

    /// Subscribe a DOM event on `node` to an operation, forwarding the
    /// event payload as the operation's single argument.
    pub fn bind_payload(&mut self, node: NodeId, event: &str, op: impl Into<String>) {
        let handler = self.op_handler(op.into(), |ev| vec![ev.payload.clone()]);
        let id = self.dom.on(node, event, handler);
        self.handlers.push(id);
    }

    /// Subscribe a DOM event on `node` to a closure over the instance.
    /// Addons use this to contribute behavior without touching the
    /// definition's method table. Queued internal events flush after the
    /// closure returns; errors are logged, not propagated (there is no
    /// caller to propagate to inside event dispatch).
    pub fn bind_with(
        &mut self,
        node: NodeId,
        event: &str,
        f: impl Fn(&mut WidgetInstance, &DomEvent) -> WidgetResult<Value> + 'static,
    ) {
        let weak = self.self_ref.clone();
        let handler: Handler = Rc::new(move |ev| {
            // Inert once the instance is gone.
            let Some(cell) = weak.upgrade() else {
                return;
            };
            let result = {
                let mut instance = cell.borrow_mut();
                if instance.lifecycle == Lifecycle::Detached {
                    return;
                }
                f(&mut instance, ev)
            };
            flush_events(&cell);
            if let Err(error) = result {
                tracing::warn!(%error, "widget event handler failed");
            }
        });
        let id = self.dom.on(node, event, handler);
        self.handlers.push(id);
    }

    fn op_handler(&self, op: String, args: impl Fn(&DomEvent) -> Vec<Value> + 'static) -> Handler {
        let weak = self.self_ref.clone();
        Rc::new(move |ev| {
            // Inert once the instance is gone.
            let Some(cell) = weak.upgrade() else {
                return;
            };
            if let Err(error) = dispatch(&cell, &op, &args(ev)) {
                tracing::warn!(%op, %error, "widget event handler failed");
            }
        })
    }
}

/// Run an operation from the definition's sealed method table, then flush
/// queued internal events.
pub(crate) fn dispatch(
    cell: &Rc<RefCell<WidgetInstance>>,
    op: &str,
    args: &[Value],
) -> WidgetResult<Value> {
    let result = {
        let mut instance = cell.borrow_mut();
        if instance.lifecycle == Lifecycle::Detached {
            return Err(WidgetError::DetachedWidget {
                widget: instance.name().to_string(),
                op: op.to_string(),
            });
        }
        let method = instance.definition.method(op).cloned().ok_or_else(|| {
            WidgetError::UnknownOperation {
                widget: instance.name().to_string(),
                op: op.to_string(),
            }
        })?;
        method.invoke(&mut instance, args)
    };
    flush_events(cell);
    result
}

fn flush_events(cell: &Rc<RefCell<WidgetInstance>>) {
    loop {
        let (events, dom, root) = {
            let mut instance = cell.borrow_mut();
            if instance.pending_events.is_empty() {
                return;
            }
            (
                std::mem::take(&mut instance.pending_events),
                instance.dom.clone(),
                instance.root,
            )
        };
        for (event, payload) in events {
            dom.emit(root, &event, &payload);
        }
    }
}

/// Public handle to a constructed widget instance.
///
/// Cheap to clone; all clones refer to the same instance.
#[derive(Clone)]
pub struct Widget {
    cell: Rc<RefCell<WidgetInstance>>,
    dom: Rc<dyn Dom>,
    root: NodeId,
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("definition", &self.definition_name())
            .field("root", &self.root)
            .finish()
    }
}

impl Widget {
    /// Construct a widget from a sealed definition against an element.
    pub fn new(
        definition: &Arc<WidgetDefinition>,
        dom: Rc<dyn Dom>,
        root: NodeId,
    ) -> WidgetResult<Widget> {
        Self::with_overrides(definition, dom, root, [])
    }

    /// Construct with explicit option overrides. Resolution order, once,
    /// at construction: defaults, then per-element declaration attributes
    /// (`data-{widget}-{key}`), then these overrides.
    pub fn with_overrides(
        definition: &Arc<WidgetDefinition>,
        dom: Rc<dyn Dom>,
        root: NodeId,
        overrides: impl IntoIterator<Item = (String, Value)>,
    ) -> WidgetResult<Widget> {
        let mut options = definition.defaults().clone();
        for key in definition.defaults().keys() {
            let attr_name = format!("data-{}-{}", definition.name(), key);
            if let Some(raw) = dom.attr(root, &attr_name) {
                options.insert(key.clone(), Value::parse_attr(&raw));
            }
        }
        for (key, value) in overrides {
            options.insert(key, value);
        }

        let cell = Rc::new_cyclic(|weak| {
            RefCell::new(WidgetInstance {
                root,
                dom: dom.clone(),
                definition: definition.clone(),
                options,
                parts: IndexMap::new(),
                state: IndexMap::new(),
                lifecycle: Lifecycle::Constructed,
                handlers: Vec::new(),
                pending_events: Vec::new(),
                self_ref: weak.clone(),
            })
        });

        // Base constructor.
        if definition.has_method(SETUP_OP) {
            dispatch(&cell, SETUP_OP, &[])?;
        }
        cell.borrow_mut().lifecycle = Lifecycle::Ready;

        // Addon initializers, strictly after the base constructor, in
        // attachment order. Failures propagate.
        for addon in definition.addons() {
            let result = {
                let mut instance = cell.borrow_mut();
                addon.run(&mut instance)
            };
            flush_events(&cell);
            result?;
        }

        tracing::debug!(widget = definition.name(), ?root, "widget constructed");
        Ok(Widget { cell, dom, root })
    }

    /// Invoke an operation from the widget's method table.
    pub fn invoke(&self, op: &str, args: &[Value]) -> WidgetResult<Value> {
        dispatch(&self.cell, op, args)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn definition_name(&self) -> String {
        self.cell.borrow().name().to_string()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.cell.borrow().lifecycle
    }

    /// Effective option value.
    pub fn option(&self, key: &str) -> Value {
        self.cell.borrow().option(key)
    }

    /// Snapshot of a state entry.
    pub fn state(&self, key: &str) -> Option<Value> {
        self.cell.borrow().state(key).cloned()
    }

    /// Elements of a declared part (lazily computed, cached).
    pub fn part(&self, name: &str) -> WidgetResult<Vec<NodeId>> {
        self.cell.borrow_mut().part(name)
    }

    /// Invalidate all cached parts.
    pub fn rescan_parts(&self) {
        self.cell.borrow_mut().rescan_parts();
    }

    /// Whether the root element has been removed from the document.
    pub fn is_orphaned(&self) -> bool {
        !self.dom.contains(self.root)
    }

    /// Unbind all DOM handlers registered by this widget and enter
    /// [`Lifecycle::Detached`]. Idempotent. Subsequent
    /// [`invoke`](Self::invoke) calls fail with
    /// [`WidgetError::DetachedWidget`]; read accessors stay usable.
    pub fn detach(&self) {
        let handlers = {
            let mut instance = self.cell.borrow_mut();
            if instance.lifecycle == Lifecycle::Detached {
                return;
            }
            instance.lifecycle = Lifecycle::Detached;
            std::mem::take(&mut instance.handlers)
        };
        for id in handlers {
            self.dom.off(id);
        }
        tracing::debug!(widget = %self.definition_name(), "widget detached");
    }
}

#[cfg(test)]
mod tests {
    use trellis_dom::{MemoryDom, Selector};

    use super::*;

    fn counter_def() -> Arc<WidgetDefinition> {
        WidgetDefinition::builder("counter")
            .default_option("step", 1i64)
            .method(SETUP_OP, |w, _| {
                w.set_state("count", 0i64);
                w.define_part("items", Selector::attr_eq("data-part", "item"));
                let root = w.root();
                w.bind(root, "click", "bump", vec![]);
                Ok(Value::Null)
            })
            .method("bump", |w, _| {
                let step = w.option("step").as_int().unwrap_or(1);
                let count = w.state("count").and_then(Value::as_int).unwrap_or(0) + step;
                w.set_state("count", count);
                w.emit("bumped", count);
                Ok(Value::Int(count))
            })
            .seal()
            .unwrap()
    }

    fn setup() -> (Rc<MemoryDom>, Rc<dyn Dom>, NodeId) {
        let mem = Rc::new(MemoryDom::new());
        let root = mem.add_element(mem.document(), "div", []);
        let dom: Rc<dyn Dom> = mem.clone();
        (mem, dom, root)
    }

    #[test]
    fn test_lifecycle_reaches_ready() {
        let (_mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        assert_eq!(widget.lifecycle(), Lifecycle::Ready);
        assert_eq!(widget.state("count"), Some(Value::Int(0)));
    }

    #[test]
    fn test_option_resolution_order() {
        let (mem, dom, root) = setup();
        // Attribute override beats the default...
        mem.set_attr(root, "data-counter-step", "5");
        let widget = Widget::new(&counter_def(), dom.clone(), root).unwrap();
        assert_eq!(widget.option("step"), Value::Int(5));

        // ...and an explicit override beats the attribute.
        let widget = Widget::with_overrides(
            &counter_def(),
            dom,
            root,
            [("step".to_string(), Value::Int(9))],
        )
        .unwrap();
        assert_eq!(widget.option("step"), Value::Int(9));
        assert_eq!(widget.invoke("bump", &[]).unwrap(), Value::Int(9));
    }

    #[test]
    fn test_parts_cached_until_rescan() {
        let (mem, dom, root) = setup();
        let first = mem.add_element(root, "span", [("data-part", "item")]);
        let widget = Widget::new(&counter_def(), dom, root).unwrap();

        assert_eq!(widget.part("items").unwrap(), vec![first]);
        let second = mem.add_element(root, "span", [("data-part", "item")]);
        // Cached: the new element is invisible until an explicit re-scan.
        assert_eq!(widget.part("items").unwrap(), vec![first]);
        widget.rescan_parts();
        assert_eq!(widget.part("items").unwrap(), vec![first, second]);
    }

    #[test]
    fn test_undeclared_part_fails() {
        let (_mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        assert!(matches!(
            widget.part("ghost"),
            Err(WidgetError::Definition { .. })
        ));
    }

    #[test]
    fn test_dom_event_dispatches_bound_op() {
        let (mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        mem.emit(root, "click", &Value::Null);
        mem.emit(root, "click", &Value::Null);
        assert_eq!(widget.state("count"), Some(Value::Int(2)));
    }

    #[test]
    fn test_internal_events_flush_within_invoke() {
        let (mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            mem.on(
                root,
                "bumped",
                Rc::new(move |ev| seen.borrow_mut().push(ev.payload.clone())),
            );
        }
        widget.invoke("bump", &[]).unwrap();
        widget.invoke("bump", &[]).unwrap();
        assert_eq!(*seen.borrow(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_unknown_operation() {
        let (_mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        assert!(matches!(
            widget.invoke("vanish", &[]),
            Err(WidgetError::UnknownOperation { op, .. }) if op == "vanish"
        ));
    }

    #[test]
    fn test_detach_unbinds_and_blocks_mutation() {
        let (mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        assert_eq!(mem.handler_count(), 1);

        widget.detach();
        assert_eq!(widget.lifecycle(), Lifecycle::Detached);
        assert_eq!(mem.handler_count(), 0);
        assert!(matches!(
            widget.invoke("bump", &[]),
            Err(WidgetError::DetachedWidget { .. })
        ));
        // Read accessors stay usable after detach.
        assert_eq!(widget.state("count"), Some(Value::Int(0)));
        // Idempotent.
        widget.detach();
    }

    #[test]
    fn test_orphaned_widget_and_inert_handlers() {
        let (mem, dom, root) = setup();
        let widget = Widget::new(&counter_def(), dom, root).unwrap();
        assert!(!widget.is_orphaned());

        mem.detach_subtree(root);
        assert!(widget.is_orphaned());

        // Drop the last strong reference; the bound click handler's weak
        // upgrade now fails and the emit is a no-op.
        drop(widget);
        mem.emit(root, "click", &Value::Null);
    }
}

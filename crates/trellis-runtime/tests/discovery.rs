//! Integration tests for markup discovery and auto-instantiation.

use std::rc::Rc;
use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::{Dom, MemoryDom, NodeId};
use trellis_runtime::{
    BOUND_ATTR, Bootstrapper, DefinitionRegistry, ModuleResolver, RegistrySource, SETUP_OP,
    TYPE_ATTR, TaskPool, WidgetDefinition, WidgetError,
};

fn simple(name: &str) -> Arc<WidgetDefinition> {
    WidgetDefinition::builder(name)
        .method(SETUP_OP, |w, _| {
            w.set_state("ready", true);
            Ok(Value::Null)
        })
        .method("mark", |w, call| {
            let tag = call.arg(0).cloned().unwrap_or(Value::Null);
            w.set_state("mark", tag);
            Ok(Value::Null)
        })
        .seal()
        .unwrap()
}

fn resolver_for(names: &[&str]) -> Arc<ModuleResolver> {
    let mut registry = DefinitionRegistry::new();
    for name in names {
        registry.register(simple(name)).unwrap();
    }
    Arc::new(ModuleResolver::new(RegistrySource::new(Arc::new(registry))))
}

fn page() -> (Rc<MemoryDom>, Rc<dyn Dom>) {
    let mem = Rc::new(MemoryDom::new());
    let dom: Rc<dyn Dom> = mem.clone();
    (mem, dom)
}

#[test]
fn test_discover_instantiates_per_element_type_pair() {
    let (mem, dom) = page();
    let multi = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "tab accordion")]);
    let single = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "dialog")]);

    let bootstrapper = Bootstrapper::new(resolver_for(&["tab", "accordion", "dialog"]));
    let report = bootstrapper.discover_blocking(&dom, None);

    assert!(report.is_clean());
    assert_eq!(report.widgets.len(), 3);
    let names: Vec<_> = report.widgets.iter().map(|w| w.definition_name()).collect();
    assert_eq!(names, vec!["tab", "accordion", "dialog"]);
    assert_eq!(mem.attr(multi, BOUND_ATTR).as_deref(), Some("tab accordion"));
    assert_eq!(mem.attr(single, BOUND_ATTR).as_deref(), Some("dialog"));
}

#[test]
fn test_multi_type_element_instances_are_independent() {
    let (mem, dom) = page();
    let element = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "tab accordion")]);

    let bootstrapper = Bootstrapper::new(resolver_for(&["tab", "accordion"]));
    let report = bootstrapper.discover_blocking(&dom, None);

    assert_eq!(report.widgets.len(), 2);
    let tab = &report.widgets[0];
    let accordion = &report.widgets[1];
    assert_eq!(tab.root(), element);
    assert_eq!(accordion.root(), element);

    tab.invoke("mark", &[Value::from("only-tab")]).unwrap();
    assert_eq!(tab.state("mark"), Some(Value::from("only-tab")));
    assert_eq!(accordion.state("mark"), None);
}

#[test]
fn test_discovery_is_idempotent_until_marker_cleared() {
    let (mem, dom) = page();
    let element = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "tab")]);

    let bootstrapper = Bootstrapper::new(resolver_for(&["tab"]));
    let first = bootstrapper.discover_blocking(&dom, None);
    assert_eq!(first.widgets.len(), 1);

    // Unchanged scope: the bound marker suppresses re-instantiation.
    let second = bootstrapper.discover_blocking(&dom, None);
    assert!(second.widgets.is_empty());
    assert!(second.is_clean());

    // Clearing the marker re-arms discovery for the element.
    mem.remove_attr(element, BOUND_ATTR);
    let third = bootstrapper.discover_blocking(&dom, None);
    assert_eq!(third.widgets.len(), 1);
}

#[test]
fn test_unknown_name_fails_pair_not_siblings() {
    let (mem, dom) = page();
    let broken = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "ghost")]);
    let _ok = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "tab")]);

    let bootstrapper = Bootstrapper::new(resolver_for(&["tab"]));
    let report = bootstrapper.discover_blocking(&dom, None);

    assert_eq!(report.widgets.len(), 1);
    assert_eq!(report.widgets[0].definition_name(), "tab");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].element, broken);
    assert_eq!(report.errors[0].widget, "ghost");
    assert!(matches!(
        report.errors[0].error,
        WidgetError::ModuleResolution { .. }
    ));
    // The failed pair carries no bound marker and may be retried.
    assert_eq!(mem.attr(broken, BOUND_ATTR), None);
}

#[test]
fn test_scope_element_itself_participates() {
    let (mem, dom) = page();
    let scope = mem.add_element(mem.document(), "section", [(TYPE_ATTR, "tab")]);
    let _child = mem.add_element(scope, "div", [(TYPE_ATTR, "dialog")]);
    let _outside = mem.add_element(mem.document(), "div", [(TYPE_ATTR, "accordion")]);

    let bootstrapper = Bootstrapper::new(resolver_for(&["tab", "accordion", "dialog"]));
    let report = bootstrapper.discover_blocking(&dom, Some(scope));

    let names: Vec<_> = report.widgets.iter().map(|w| w.definition_name()).collect();
    assert_eq!(names, vec!["tab", "dialog"]);
}

#[test]
fn test_discovery_with_task_pool() {
    let (mem, dom) = page();
    for _ in 0..4 {
        mem.add_element(mem.document(), "div", [(TYPE_ATTR, "tab dialog")]);
    }

    let pool = Arc::new(TaskPool::new(2));
    let bootstrapper = Bootstrapper::with_pool(resolver_for(&["tab", "dialog"]), pool);
    let report = bootstrapper.discover_blocking(&dom, None);

    assert!(report.is_clean());
    assert_eq!(report.widgets.len(), 8);
}

#[test]
fn test_option_overrides_consumed_at_discovery() {
    let (mem, dom) = page();
    let element: NodeId = mem.add_element(
        mem.document(),
        "div",
        [(TYPE_ATTR, "stepper"), ("data-stepper-step", "3")],
    );

    let mut registry = DefinitionRegistry::new();
    registry
        .register(
            WidgetDefinition::builder("stepper")
                .default_option("step", 1i64)
                .seal()
                .unwrap(),
        )
        .unwrap();
    let resolver = Arc::new(ModuleResolver::new(RegistrySource::new(Arc::new(registry))));

    let report = Bootstrapper::new(resolver).discover_blocking(&dom, None);
    assert_eq!(report.widgets.len(), 1);
    assert_eq!(report.widgets[0].root(), element);
    assert_eq!(report.widgets[0].option("step"), Value::Int(3));
}

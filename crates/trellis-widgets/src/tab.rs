//! Tabbed interface: one active panel at a time.
//!
//! Parts: `handles` (`[data-part=handle]`) and `panels`
//! (`[data-part=panel]`), matched pairwise by index. The active set lives
//! in instance state under `"active"` as an index list; for tab it is
//! always a singleton.

use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::Selector;
use trellis_runtime::{
    SETUP_OP, WidgetDefinition, WidgetError, WidgetInstance, WidgetResult,
};

use crate::base;

pub const NAME: &str = "tab";

/// State key holding the active index set.
pub const ACTIVE_STATE: &str = "active";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    let parent = base::definition()?;
    WidgetDefinition::extend(&parent)
        .name(NAME)
        .default_option("active", 0i64)
        .default_option("orientation", "horizontal")
        .method(SETUP_OP, |w, call| {
            call.call_parent(w)?;
            setup_structure(w)?;
            let initial = w.option("active").as_index().unwrap_or(0);
            apply_active(w, &[initial])?;
            Ok(Value::Null)
        })
        .method("select", |w, call| {
            let index = require_index(call.index_arg(0))?;
            if index >= w.part("handles")?.len() {
                // Out-of-range selection leaves the widget untouched.
                return Ok(active_value(w));
            }
            apply_active(w, &[index])?;
            w.emit("select", Value::from(index));
            Ok(active_value(w))
        })
        .seal()
}

fn require_index(arg: Option<usize>) -> WidgetResult<usize> {
    arg.ok_or_else(|| WidgetError::Definition {
        message: "select requires a non-negative index argument".to_string(),
    })
}

/// Shared structural setup: roles, parts and per-handle click bindings.
/// Also used unchanged by the accordion extension.
pub(crate) fn setup_structure(w: &mut WidgetInstance) -> WidgetResult<()> {
    w.set_root_attr("role", "tablist");
    let orientation = w.option("orientation").to_attr();
    w.set_root_attr("aria-orientation", &orientation);

    w.define_part("handles", Selector::attr_eq("data-part", "handle"));
    w.define_part("panels", Selector::attr_eq("data-part", "panel"));

    for (i, handle) in w.part("handles")?.into_iter().enumerate() {
        w.set_attr(handle, "role", "tab");
        w.bind(handle, "click", "select", vec![Value::from(i)]);
    }
    for panel in w.part("panels")? {
        w.set_attr(panel, "role", "tabpanel");
    }
    Ok(())
}

/// Store the active set and annotate handles and panels accordingly.
pub(crate) fn apply_active(w: &mut WidgetInstance, active: &[usize]) -> WidgetResult<()> {
    w.set_state(ACTIVE_STATE, Value::from_indices(active.iter().copied()));
    for (i, handle) in w.part("handles")?.into_iter().enumerate() {
        let selected = active.contains(&i);
        w.set_attr(handle, "aria-selected", bool_attr(selected));
    }
    for (i, panel) in w.part("panels")?.into_iter().enumerate() {
        let selected = active.contains(&i);
        w.set_attr(panel, "data-active", bool_attr(selected));
    }
    Ok(())
}

/// The current active set, empty when state is missing or malformed.
pub(crate) fn active_set(w: &WidgetInstance) -> Vec<usize> {
    w.state(ACTIVE_STATE)
        .and_then(Value::indices)
        .unwrap_or_default()
}

fn active_value(w: &WidgetInstance) -> Value {
    w.state(ACTIVE_STATE).cloned().unwrap_or(Value::Null)
}

fn bool_attr(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

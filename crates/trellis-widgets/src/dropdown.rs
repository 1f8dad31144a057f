//! Dropdown: a trigger toggling a menu of selectable items.
//!
//! Parts: `trigger` (`[data-part=trigger]`), `menu` (`[data-part=menu]`)
//! and `items` (`[data-part=item]`). Selecting an item stores its
//! `data-value` attribute (falling back to the item index), closes the
//! menu and emits `"change"`.

use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::{Dom, Selector};
use trellis_runtime::{
    SETUP_OP, WidgetDefinition, WidgetError, WidgetInstance, WidgetResult,
};

use crate::base;

pub const NAME: &str = "dropdown";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    let parent = base::definition()?;
    WidgetDefinition::extend(&parent)
        .name(NAME)
        .default_option("close-on-select", true)
        .method(SETUP_OP, |w, call| {
            call.call_parent(w)?;
            w.define_part("trigger", Selector::attr_eq("data-part", "trigger"));
            w.define_part("menu", Selector::attr_eq("data-part", "menu"));
            w.define_part("items", Selector::attr_eq("data-part", "item"));

            for trigger in w.part("trigger")? {
                w.set_attr(trigger, "aria-haspopup", "true");
                w.bind(trigger, "click", "toggle", vec![]);
            }
            for (i, item) in w.part("items")?.into_iter().enumerate() {
                w.bind(item, "click", "select", vec![Value::from(i)]);
            }
            w.set_state("open", false);
            w.set_state("value", Value::Null);
            annotate_open(w, false)?;
            Ok(Value::Null)
        })
        .method("open", |w, _| {
            if !is_open(w) {
                w.set_state("open", true);
                annotate_open(w, true)?;
                w.emit("open", Value::Null);
            }
            Ok(Value::Bool(true))
        })
        .method("close", |w, _| {
            if is_open(w) {
                w.set_state("open", false);
                annotate_open(w, false)?;
                w.emit("close", Value::Null);
            }
            Ok(Value::Bool(false))
        })
        .method("toggle", |w, _| {
            let target = if is_open(w) { "close" } else { "open" };
            base::call_op(w, target, &[])
        })
        .method("select", |w, call| {
            let index = call
                .index_arg(0)
                .ok_or_else(|| WidgetError::Definition {
                    message: "select requires a non-negative index argument".to_string(),
                })?;
            let items = w.part("items")?;
            let Some(&item) = items.get(index) else {
                return Ok(w.state("value").cloned().unwrap_or(Value::Null));
            };
            let value = match w.dom().attr(item, "data-value") {
                Some(raw) => Value::parse_attr(&raw),
                None => Value::from(index),
            };
            w.set_state("value", value.clone());
            w.set_root_attr("data-value", &value.to_attr());
            if w.option("close-on-select").as_bool().unwrap_or(true) {
                base::call_op(w, "close", &[])?;
            }
            w.emit("change", value.clone());
            Ok(value)
        })
        .seal()
}

fn is_open(w: &WidgetInstance) -> bool {
    w.state("open").and_then(Value::as_bool).unwrap_or(false)
}

fn annotate_open(w: &mut WidgetInstance, open: bool) -> WidgetResult<()> {
    let flag = if open { "true" } else { "false" };
    for trigger in w.part("trigger")? {
        w.set_attr(trigger, "aria-expanded", flag);
    }
    for menu in w.part("menu")? {
        w.set_attr(menu, "data-open", flag);
    }
    Ok(())
}

//! Modal dialog: explicit open/close with ARIA annotation.
//!
//! Part `dismiss` (`[data-part=dismiss]`) is bound to `close`. The dialog
//! starts closed unless the `open` option says otherwise
//! (`data-dialog-open="true"` on the element).

use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::Selector;
use trellis_runtime::{SETUP_OP, WidgetDefinition, WidgetInstance, WidgetResult};

use crate::base;

pub const NAME: &str = "dialog";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    let parent = base::definition()?;
    WidgetDefinition::extend(&parent)
        .name(NAME)
        .default_option("open", false)
        .method(SETUP_OP, |w, call| {
            call.call_parent(w)?;
            w.set_root_attr("role", "dialog");
            w.set_root_attr("aria-modal", "true");
            w.define_part("dismiss", Selector::attr_eq("data-part", "dismiss"));
            for dismiss in w.part("dismiss")? {
                w.bind(dismiss, "click", "close", vec![]);
            }
            let open = w.option("open").as_bool().unwrap_or(false);
            w.set_state("open", open);
            annotate(w, open);
            Ok(Value::Null)
        })
        .method("open", |w, _| {
            if !is_open(w) {
                w.set_state("open", true);
                annotate(w, true);
                w.emit("open", Value::Null);
            }
            Ok(Value::Bool(true))
        })
        .method("close", |w, _| {
            if is_open(w) {
                w.set_state("open", false);
                annotate(w, false);
                w.emit("close", Value::Null);
            }
            Ok(Value::Bool(false))
        })
        .seal()
}

fn is_open(w: &WidgetInstance) -> bool {
    w.state("open").and_then(Value::as_bool).unwrap_or(false)
}

fn annotate(w: &WidgetInstance, open: bool) {
    w.set_root_attr("aria-hidden", if open { "false" } else { "true" });
}

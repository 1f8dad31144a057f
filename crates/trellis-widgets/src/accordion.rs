//! Accordion: a tab extension whose panels toggle independently.
//!
//! `setup` super-calls tab's setup and only adds the multiselect marker;
//! `select` is a full override with no super call, since toggle-membership
//! and replace-with-singleton are mutually exclusive behaviors.

use std::sync::Arc;

use trellis_core::Value;
use trellis_runtime::{SETUP_OP, WidgetDefinition, WidgetError, WidgetResult};

use crate::tab;

pub const NAME: &str = "accordion";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    let parent = tab::definition()?;
    WidgetDefinition::extend(&parent)
        .name(NAME)
        .method(SETUP_OP, |w, call| {
            call.call_parent(w)?;
            w.set_root_attr("data-multiselect", "true");
            Ok(Value::Null)
        })
        .method("select", |w, call| {
            let index = call
                .index_arg(0)
                .ok_or_else(|| WidgetError::Definition {
                    message: "select requires a non-negative index argument".to_string(),
                })?;
            let count = w.part("handles")?.len();
            let mut active = tab::active_set(w);
            if index >= count {
                return Ok(Value::from_indices(active));
            }
            match active.iter().position(|&i| i == index) {
                Some(pos) => {
                    active.remove(pos);
                }
                None => {
                    active.push(index);
                    active.sort_unstable();
                }
            }
            tab::apply_active(w, &active)?;
            w.emit("select", Value::from_indices(active.iter().copied()));
            Ok(Value::from_indices(active))
        })
        .seal()
}

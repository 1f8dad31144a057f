//! Carousel: ordered slides with a single current position.
//!
//! Part `slides` (`[data-part=slide]`); optional `next`/`prev` parts are
//! bound to the corresponding operations. The `wrap` option picks between
//! modular and clamped navigation at the ends.

use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::Selector;
use trellis_runtime::{
    SETUP_OP, WidgetDefinition, WidgetError, WidgetInstance, WidgetResult,
};

use crate::base;

pub const NAME: &str = "carousel";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    let parent = base::definition()?;
    WidgetDefinition::extend(&parent)
        .name(NAME)
        .default_option("wrap", true)
        .default_option("start", 0i64)
        .method(SETUP_OP, |w, call| {
            call.call_parent(w)?;
            w.define_part("slides", Selector::attr_eq("data-part", "slide"));
            w.define_part("next", Selector::attr_eq("data-part", "next"));
            w.define_part("prev", Selector::attr_eq("data-part", "prev"));
            for node in w.part("next")? {
                w.bind(node, "click", "next", vec![]);
            }
            for node in w.part("prev")? {
                w.bind(node, "click", "prev", vec![]);
            }
            let count = w.part("slides")?.len();
            let start = w.option("start").as_index().unwrap_or(0);
            let start = if count == 0 { 0 } else { start.min(count - 1) };
            go_to(w, start)?;
            Ok(Value::Null)
        })
        .method("navigate", |w, call| {
            let target = call
                .arg(0)
                .and_then(Value::as_int)
                .ok_or_else(|| WidgetError::Definition {
                    message: "navigate requires an integer argument".to_string(),
                })?;
            let index = resolve_target(w, target)?;
            go_to(w, index)?;
            w.emit("navigate", Value::from(index));
            Ok(Value::from(index))
        })
        .method("next", |w, _| {
            let target = current(w) as i64 + 1;
            base::call_op(w, "navigate", &[Value::Int(target)])
        })
        .method("prev", |w, _| {
            let target = current(w) as i64 - 1;
            base::call_op(w, "navigate", &[Value::Int(target)])
        })
        .seal()
}

fn current(w: &WidgetInstance) -> usize {
    w.state("index").and_then(Value::as_index).unwrap_or(0)
}

/// Map a possibly out-of-range target onto a slide index, wrapping or
/// clamping per the `wrap` option. Fails on an empty carousel.
fn resolve_target(w: &mut WidgetInstance, target: i64) -> WidgetResult<usize> {
    let count = w.part("slides")?.len() as i64;
    if count == 0 {
        return Err(WidgetError::Definition {
            message: "carousel has no slides".to_string(),
        });
    }
    let index = if w.option("wrap").as_bool().unwrap_or(true) {
        target.rem_euclid(count)
    } else {
        target.clamp(0, count - 1)
    };
    Ok(index as usize)
}

fn go_to(w: &mut WidgetInstance, index: usize) -> WidgetResult<()> {
    w.set_state("index", index);
    for (i, slide) in w.part("slides")?.into_iter().enumerate() {
        w.set_attr(slide, "data-current", if i == index { "true" } else { "false" });
    }
    w.set_root_attr("data-index", &index.to_string());
    Ok(())
}

//! The root widget definition.
//!
//! Every stock widget extends `"widget"` and super-calls its `setup`, so
//! shared structural bookkeeping (the `data-widget` marker) happens exactly
//! once per instance regardless of chain depth.

use std::sync::Arc;

use trellis_core::Value;
use trellis_dom::Dom;
use trellis_runtime::{
    SETUP_OP, WidgetDefinition, WidgetError, WidgetInstance, WidgetResult,
};

pub const NAME: &str = "widget";

/// Attribute listing the widget names constructed on an element.
pub const WIDGET_ATTR: &str = "data-widget";

pub fn definition() -> WidgetResult<Arc<WidgetDefinition>> {
    WidgetDefinition::builder(NAME)
        .method(SETUP_OP, |w, _| {
            let name = w.name().to_string();
            let root = w.root();
            w.dom().append_attr_token(root, WIDGET_ATTR, &name);
            Ok(Value::Null)
        })
        .seal()
}

/// Invoke a sibling operation from inside another operation or an addon
/// initializer, going through the instance's own sealed method table.
pub(crate) fn call_op(
    widget: &mut WidgetInstance,
    op: &str,
    args: &[Value],
) -> WidgetResult<Value> {
    let method = widget
        .definition()
        .method(op)
        .cloned()
        .ok_or_else(|| WidgetError::UnknownOperation {
            widget: widget.name().to_string(),
            op: op.to_string(),
        })?;
    method.invoke(widget, args)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use trellis_dom::{Dom, MemoryDom};
    use trellis_runtime::Widget;

    use super::*;

    #[test]
    fn test_setup_marks_root() {
        let mem = Rc::new(MemoryDom::new());
        let root = mem.add_element(mem.document(), "div", []);
        let dom: Rc<dyn Dom> = mem.clone();
        let _widget = Widget::new(&definition().unwrap(), dom, root).unwrap();
        assert_eq!(mem.attr(root, WIDGET_ATTR).as_deref(), Some("widget"));
    }
}

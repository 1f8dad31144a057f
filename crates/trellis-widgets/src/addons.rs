//! Stock addons.
//!
//! Addons contribute behavior to already-sealed definitions without
//! touching their method tables; each binds handlers on the freshly
//! constructed instance.

use trellis_core::Value;
use trellis_runtime::Addon;

use crate::{base, tab};

/// Keyboard navigation for tab-like widgets.
///
/// Binds `keydown` on the root; `"next"` and `"prev"` payloads move the
/// selection relative to the first active index, wrapping around the
/// handle count. Other payloads are ignored.
pub fn keyboard() -> Addon {
    Addon::new("keyboard", |w| {
        w.set_root_attr("tabindex", "0");
        let root = w.root();
        w.bind_with(root, "keydown", |w, ev| {
            let delta: i64 = match ev.payload.as_str() {
                Some("next") => 1,
                Some("prev") => -1,
                _ => return Ok(Value::Null),
            };
            let count = w.part("handles")?.len() as i64;
            if count == 0 {
                return Ok(Value::Null);
            }
            let current = tab::active_set(w).first().copied().unwrap_or(0) as i64;
            let target = (current + delta).rem_euclid(count) as usize;
            base::call_op(w, "select", &[Value::from(target)])
        });
        Ok(())
    })
}

/// Clock-driven advancement for the carousel.
///
/// Binds a `tick` DOM event on the root to `next`, so an external timer
/// (or a test) drives the rotation by emitting ticks. The tick payload is
/// forwarded to `next`, which ignores it.
pub fn autoplay() -> Addon {
    Addon::new("autoplay", |w| {
        w.set_root_attr("data-autoplay", "true");
        let root = w.root();
        w.bind_payload(root, "tick", "next");
        Ok(())
    })
}

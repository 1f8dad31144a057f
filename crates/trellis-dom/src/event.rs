//! DOM event types.

use std::rc::Rc;

use trellis_core::Value;

use crate::dom::NodeId;

/// An event delivered to subscribed handlers.
#[derive(Debug, Clone)]
pub struct DomEvent {
    /// The element the event was emitted on.
    pub target: NodeId,
    /// Event name (`"click"`, `"keydown"`, widget-internal names, ...).
    pub name: String,
    /// Event payload.
    pub payload: Value,
}

/// A subscribed event handler.
///
/// Handlers are plain `Rc` closures: the event model is single-threaded
/// and listeners run synchronously, in attachment order, on the thread
/// that emitted.
pub type Handler = Rc<dyn Fn(&DomEvent)>;

/// Identifier of a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

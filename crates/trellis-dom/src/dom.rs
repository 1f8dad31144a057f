//! The DOM capability trait.

use trellis_core::Value;

use crate::event::{Handler, HandlerId};
use crate::selector::Selector;

/// Node identifier in a DOM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Capability interface over a document.
///
/// All methods take `&self`; backends use interior mutability. This keeps
/// the trait object-safe behind `Rc<dyn Dom>`, which widget instances and
/// their event handlers share.
///
/// Handlers subscribed via [`on`](Dom::on) run synchronously inside
/// [`emit`](Dom::emit), in attachment order. Backends must release any
/// internal borrows before invoking handlers, since a handler may re-enter
/// the DOM.
pub trait Dom {
    /// All descendants of `scope` (the whole document when `None`) that
    /// match the selector, in document order. The scope element itself is
    /// not included.
    fn query(&self, selector: &Selector, scope: Option<NodeId>) -> Vec<NodeId>;

    /// Whether a single element matches the selector.
    fn matches(&self, node: NodeId, selector: &Selector) -> bool;

    /// Read an attribute.
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    /// Write an attribute.
    fn set_attr(&self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attr(&self, node: NodeId, name: &str);

    /// Child elements, in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether the element is still attached to the document.
    fn contains(&self, node: NodeId) -> bool;

    /// Subscribe a handler to an event on an element.
    fn on(&self, node: NodeId, event: &str, handler: Handler) -> HandlerId;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn off(&self, handler: HandlerId) -> bool;

    /// Emit an event on an element, invoking its handlers synchronously
    /// in attachment order.
    fn emit(&self, node: NodeId, event: &str, payload: &Value);

    /// Tokens of a whitespace-separated list attribute.
    fn attr_tokens(&self, node: NodeId, name: &str) -> Vec<String> {
        self.attr(node, name)
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether a list attribute contains the given token.
    fn has_attr_token(&self, node: NodeId, name: &str, token: &str) -> bool {
        self.attr(node, name)
            .is_some_and(|v| v.split_whitespace().any(|t| t == token))
    }

    /// Append a token to a whitespace-separated list attribute, if absent.
    fn append_attr_token(&self, node: NodeId, name: &str, token: &str) {
        match self.attr(node, name) {
            Some(existing) if existing.split_whitespace().any(|t| t == token) => {}
            Some(existing) if !existing.trim().is_empty() => {
                self.set_attr(node, name, &format!("{existing} {token}"));
            }
            _ => self.set_attr(node, name, token),
        }
    }
}

//! In-memory DOM backend.
//!
//! An arena of elements with parent/child links and an implicit document
//! root. Detached subtrees stay in the arena (live `NodeId`s held by
//! widget instances remain readable) but drop out of queries and
//! [`Dom::contains`].

use std::cell::{Cell, RefCell};

use trellis_core::Value;
use trellis_core::alloc::IndexMap;

use crate::dom::{Dom, NodeId};
use crate::event::{DomEvent, Handler, HandlerId};
use crate::selector::Selector;

struct ElementNode {
    tag: String,
    attrs: IndexMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Tree {
    nodes: IndexMap<NodeId, ElementNode>,
    document: NodeId,
    next_id: usize,
}

struct HandlerEntry {
    id: HandlerId,
    node: NodeId,
    event: String,
    handler: Handler,
}

/// Arena-backed in-memory DOM.
pub struct MemoryDom {
    tree: RefCell<Tree>,
    handlers: RefCell<Vec<HandlerEntry>>,
    next_handler: Cell<u64>,
}

impl MemoryDom {
    /// Create an empty document.
    pub fn new() -> Self {
        let document = NodeId(0);
        let mut nodes = IndexMap::new();
        nodes.insert(
            document,
            ElementNode {
                tag: "#document".to_string(),
                attrs: IndexMap::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            tree: RefCell::new(Tree {
                nodes,
                document,
                next_id: 1,
            }),
            handlers: RefCell::new(Vec::new()),
            next_handler: Cell::new(0),
        }
    }

    /// The implicit document root.
    pub fn document(&self) -> NodeId {
        self.tree.borrow().document
    }

    /// Create an unattached element.
    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.next_id);
        tree.next_id += 1;
        tree.nodes.insert(
            id,
            ElementNode {
                tag: tag.into(),
                attrs: IndexMap::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    /// Create an element with attributes and attach it to a parent.
    pub fn add_element<'a>(
        &self,
        parent: NodeId,
        tag: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> NodeId {
        let id = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        self.append_child(parent, id);
        id
    }

    /// Attach `child` as the last child of `parent`. Re-attaching moves
    /// the child.
    ///
    /// # Panics
    ///
    /// Panics if either id is unknown.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut tree = self.tree.borrow_mut();
        assert!(tree.nodes.contains_key(&parent), "unknown parent node");
        assert!(tree.nodes.contains_key(&child), "unknown child node");
        if let Some(old) = tree.nodes[&child].parent
            && let Some(old_node) = tree.nodes.get_mut(&old)
        {
            old_node.children.retain(|c| *c != child);
        }
        tree.nodes.get_mut(&child).unwrap().parent = Some(parent);
        tree.nodes.get_mut(&parent).unwrap().children.push(child);
    }

    /// Detach an element (and its subtree) from the document.
    ///
    /// The subtree is not deleted; queries simply stop seeing it. The
    /// document root cannot be detached.
    pub fn detach_subtree(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if node == tree.document {
            return;
        }
        let Some(parent) = tree.nodes.get(&node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = tree.nodes.get_mut(&parent) {
            parent_node.children.retain(|c| *c != node);
        }
        if let Some(n) = tree.nodes.get_mut(&node) {
            n.parent = None;
        }
    }

    /// Tag name of an element.
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().nodes.get(&node).map(|n| n.tag.clone())
    }

    /// Number of subscribed handlers (all elements).
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn query(&self, selector: &Selector, scope: Option<NodeId>) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let start = scope.unwrap_or(tree.document);
        let Some(start_node) = tree.nodes.get(&start) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = start_node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = tree.nodes.get(&id) else {
                continue;
            };
            if selector.matches(&node.tag, |name| node.attrs.get(name).cloned()) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let tree = self.tree.borrow();
        tree.nodes
            .get(&node)
            .is_some_and(|n| selector.matches(&n.tag, |name| n.attrs.get(name).cloned()))
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .nodes
            .get(&node)
            .and_then(|n| n.attrs.get(name).cloned())
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        let mut tree = self.tree.borrow_mut();
        match tree.nodes.get_mut(&node) {
            Some(n) => {
                n.attrs.insert(name.to_string(), value.to_string());
            }
            None => tracing::warn!(?node, name, "set_attr on unknown node"),
        }
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        if let Some(n) = self.tree.borrow_mut().nodes.get_mut(&node) {
            n.attrs.shift_remove(name);
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn contains(&self, node: NodeId) -> bool {
        let tree = self.tree.borrow();
        let mut current = node;
        loop {
            if current == tree.document {
                return true;
            }
            match tree.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn on(&self, node: NodeId, event: &str, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_handler.get());
        self.next_handler.set(id.0 + 1);
        self.handlers.borrow_mut().push(HandlerEntry {
            id,
            node,
            event: event.to_string(),
            handler,
        });
        id
    }

    fn off(&self, handler: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|entry| entry.id != handler);
        handlers.len() != before
    }

    fn emit(&self, node: NodeId, event: &str, payload: &Value) {
        // Snapshot matching handlers so listeners can re-enter the DOM
        // (subscribe, unsubscribe, mutate attributes) while we dispatch.
        let to_run: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|entry| entry.node == node && entry.event == event)
            .map(|entry| entry.handler.clone())
            .collect();
        let dom_event = DomEvent {
            target: node,
            name: event.to_string(),
            payload: payload.clone(),
        };
        for handler in to_run {
            handler(&dom_event);
        }
    }
}

//! Trellis DOM - the capability facade the widget runtime talks to.
//!
//! The runtime never depends on a concrete DOM library. Everything it
//! needs from the document (element queries, attribute reads and writes,
//! event subscription, event emission) goes through the [`Dom`] trait.
//! [`MemoryDom`] is an arena-backed in-memory implementation used by
//! tests and headless embeddings; browser or server backends implement
//! the same trait.

pub mod dom;
pub mod event;
pub mod memory;
pub mod selector;

pub use dom::{Dom, NodeId};
pub use event::{DomEvent, Handler, HandlerId};
pub use memory::MemoryDom;
pub use selector::Selector;

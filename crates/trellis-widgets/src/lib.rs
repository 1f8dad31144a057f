//! Stock Trellis widgets.
//!
//! Five widgets built through the extension engine, all extending the
//! root `"widget"` definition: [`tab`], [`accordion`] (extends tab),
//! [`dropdown`], [`dialog`] and [`carousel`]. Each module exposes
//! `definition() -> WidgetResult<Arc<WidgetDefinition>>`; [`CorePack`]
//! registers the whole set at once, and [`addons`] holds the stock
//! keyboard and autoplay addons.

pub mod accordion;
pub mod addons;
pub mod base;
pub mod carousel;
pub mod dialog;
pub mod dropdown;
pub mod pack;
pub mod tab;

pub use pack::{CorePack, WidgetPack};

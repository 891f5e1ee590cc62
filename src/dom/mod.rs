//! Minimal page model the form components operate on.

pub mod document;
pub mod render;

pub use document::{Document, NodeId};
pub use render::{inner_html, to_html};

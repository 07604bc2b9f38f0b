//! Sequencing, repeating and applying layers.
//!
//! - [`construct_batch`] / [`repeat_layers`] build several layers of one kind
//!   from parallel argument lists.
//! - [`apply_sequence`] folds a value through layers in order.
//! - [`LayerStack`] wraps a list of layers or a composite model into one
//!   callable.

pub mod layers;
pub mod repeat;
pub mod sequential;
pub mod stack;

pub use layers::*;
pub use repeat::*;
pub use sequential::*;
pub use stack::*;

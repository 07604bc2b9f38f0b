//! Declarative layer stacks: JSON descriptions built through a
//! [`LayerRegistry`] of layer constructors.

pub mod loader;
pub mod registry;
pub mod spec;

pub use loader::{load_spec, load_stack, save_spec, spec_from_value, stack_from_value};
pub use registry::LayerRegistry;
pub use spec::{LayerEntry, LayerSpec, RepeatSpec, StackSpec};

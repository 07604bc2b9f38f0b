//! # layerstack
//!
//! Helpers for sequencing, repeating and applying neural network layers.
//! Layers themselves come from the modeling framework through the
//! [`nn::Layer`] and [`nn::Constructor`] traits.
//!
//! ## Modules
//!
//! - **core**: `LayerError`, `LayerConfig` keyword configuration, `BatchOptions`
//! - **nn**: `construct_batch` / `repeat_layers`, `apply_sequence`, `Sequential`, `LayerStack`
//! - **io**: JSON stack descriptions and the `LayerRegistry`
//!
//! ## Example
//!
//! ```
//! use layerstack::prelude::*;
//! use serde_json::json;
//!
//! let dense = |args: &[Value], config: &LayerConfig| -> LayerResult<SharedLayer<f64>> {
//!     let units = args[0].as_f64().unwrap_or(1.0);
//!     let name = config.name().unwrap_or("dense").to_string();
//!     Ok(FnLayer::shared(name, move |x: f64| Ok(x * units)))
//! };
//!
//! let layers = repeat_layers(
//!     &dense,
//!     &[vec![json!(16), json!(32), json!(64)]],
//!     &LayerConfig::new(),
//!     Some("hidden"),
//!     1,
//! )?;
//! let stack = LayerStack::new(&layers)?;
//! assert_eq!(stack.names(), vec!["hidden_1", "hidden_2", "hidden_3"]);
//! assert_eq!(stack.call(1.0)?, 16.0 * 32.0 * 64.0);
//! # Ok::<(), LayerError>(())
//! ```

/// Errors, configuration and batch options.
pub use layerstack_core as core;

/// Layers, stacks and repeated construction.
pub use layerstack_nn as nn;

/// JSON stack descriptions.
pub use layerstack_io as io;

pub use layerstack_core::{LayerError, LayerResult};

pub mod prelude {
    pub use layerstack_core::{
        BatchOptions, LayerConfig, LayerError, LayerResult, Value, INPUT_SHAPE_KEY, NAME_KEY,
    };
    pub use layerstack_io::{LayerEntry, LayerRegistry, LayerSpec, RepeatSpec, StackSpec};
    pub use layerstack_nn::{
        apply_sequence, construct_batch, repeat_layers, Constructor, FnLayer, Layer, LayerSource,
        LayerStack, Sequential, SharedLayer,
    };
}

/// Install a `tracing` subscriber printing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling it again
/// after a subscriber is installed has no effect.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn dense(args: &[Value], config: &LayerConfig) -> LayerResult<SharedLayer<f64>> {
        let units = args
            .first()
            .and_then(Value::as_f64)
            .ok_or_else(|| LayerError::InvalidConfig("units must be a number".into()))?;
        let bias = config.get_f64("bias").unwrap_or(0.0);
        let name = config.name().unwrap_or("dense").to_string();
        Ok(FnLayer::shared(name, move |x: f64| Ok(x * units + bias)))
    }

    #[test]
    fn test_repeat_then_stack() {
        super::init_logging();

        let shared = LayerConfig::new().with("bias", 1.0).with(INPUT_SHAPE_KEY, json!([10]));
        let layers = construct_batch(
            &dense,
            &[vec![json!(2.0), json!(3.0), json!(0.5)]],
            &shared,
            &BatchOptions::new().named("hidden"),
        )
        .unwrap();

        let stack = LayerStack::new(&layers).unwrap();
        // ((1 * 2 + 1) * 3 + 1) * 0.5 + 1
        assert_abs_diff_eq!(stack.call(1.0).unwrap(), 6.0, epsilon = 1e-12);
        assert_eq!(
            stack.call(1.0).unwrap(),
            apply_sequence(&layers, 1.0).unwrap()
        );
    }

    #[test]
    fn test_encoder_reused_and_expanded() {
        let encoder: SharedLayer<f64> = Arc::new(
            Sequential::new("encoder").extend(
                repeat_layers(
                    &dense,
                    &[vec![json!(1.0), json!(2.0)]],
                    &LayerConfig::new(),
                    Some("hidden"),
                    1,
                )
                .unwrap(),
            ),
        );

        let model = Sequential::new("model")
            .add_shared(Arc::clone(&encoder))
            .add(FnLayer::new("out", |x: f64| Ok(x - 1.0)));
        let stack = LayerStack::new(&model).unwrap();
        let expanded = stack.expand();

        assert_eq!(stack.names(), vec!["encoder", "out"]);
        assert_eq!(expanded.names(), vec!["hidden_1", "hidden_2", "out"]);
        assert_eq!(stack.call(3.0).unwrap(), expanded.call(3.0).unwrap());
        assert!(expanded.summary().contains("Total layers: 3"));
    }

    #[test]
    fn test_json_stack_with_registry() {
        let registry = LayerRegistry::new().with("Dense", dense);
        let stack = crate::io::stack_from_value(
            &json!({
                "name": "mlp",
                "layers": [
                    {"repeat": {"class_name": "Dense", "args": [[2.0, 2.0]], "name": "fc", "name_start_index": 0}},
                    {"class_name": "Dense", "args": [0.25], "config": {"name": "head"}}
                ]
            }),
            &registry,
        )
        .unwrap();

        assert_eq!(stack.name(), "mlp");
        assert_eq!(stack.names(), vec!["fc_0", "fc_1", "head"]);
        assert_abs_diff_eq!(stack.call(3.0).unwrap(), 3.0, epsilon = 1e-12);

        let err = crate::io::stack_from_value(&json!(42), &registry).err().unwrap();
        assert!(matches!(err, LayerError::InvalidInputKind { .. }));
    }
}

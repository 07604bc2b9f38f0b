use crate::layers::{Layer, SharedLayer};
use layerstack_core::LayerResult;
use std::sync::Arc;

/// Pass `input` through each layer in order and return the last output.
///
/// An empty sequence returns `input` unchanged. The first failing layer stops
/// the fold and its error is returned as is.
pub fn apply_sequence<T, I>(layers: I, input: T) -> LayerResult<T>
where
    I: IntoIterator,
    I::Item: Layer<T>,
{
    layers.into_iter().try_fold(input, |x, layer| {
        tracing::trace!(layer = layer.name(), "applying layer");
        layer.forward(x)
    })
}

/// Sequential model: chains layers in order.
///
/// Exposes its members through [`Sequential::layers`], so it can be handed to
/// a [`crate::LayerStack`] or expanded by one.
pub struct Sequential<T> {
    name: String,
    layers: Vec<SharedLayer<T>>,
}

impl<T> Sequential<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Sequential {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Add a layer to the model.
    pub fn add<L>(self, layer: L) -> Self
    where
        L: Layer<T> + 'static,
    {
        self.add_shared(Arc::new(layer))
    }

    /// Add an already shared layer, e.g. one that also lives in another model.
    pub fn add_shared(mut self, layer: SharedLayer<T>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Append every layer, typically the output of [`crate::repeat_layers`].
    pub fn extend<I>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = SharedLayer<T>>,
    {
        self.layers.extend(layers);
        self
    }

    pub fn layers(&self) -> &[SharedLayer<T>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<T> Layer<T> for Sequential<T> {
    /// Forward pass through all layers.
    fn forward(&self, input: T) -> LayerResult<T> {
        apply_sequence(&self.layers, input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        Some(&self.layers)
    }
}

impl<T> Default for Sequential<T> {
    fn default() -> Self {
        Self::new("sequential")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::FnLayer;
    use approx::assert_abs_diff_eq;
    use layerstack_core::LayerError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_apply_sequence_composes_in_order() {
        let f = FnLayer::shared("f", |x: f64| Ok(x + 1.0));
        let g = FnLayer::shared("g", |x: f64| Ok(x * 3.0));
        let h = FnLayer::shared("h", |x: f64| Ok(x - 0.5));

        let out = apply_sequence(&[f, g, h], 2.0).unwrap();
        // h(g(f(2))) = (2 + 1) * 3 - 0.5
        assert_abs_diff_eq!(out, 8.5, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_sequence_empty_is_identity() {
        let layers: Vec<SharedLayer<i32>> = Vec::new();
        assert_eq!(apply_sequence(&layers, 7).unwrap(), 7);
    }

    #[test]
    fn test_apply_sequence_stops_at_first_error() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let layers: Vec<Box<dyn Layer<i32>>> = vec![
            Box::new(FnLayer::new("fail", |_: i32| -> LayerResult<i32> {
                Err(LayerError::Layer("shape mismatch".into()))
            })),
            Box::new(FnLayer::new("count", move |x: i32| {
                counter.set(counter.get() + 1);
                Ok(x)
            })),
        ];

        let err = apply_sequence(&layers, 1).unwrap_err();
        assert_eq!(err, LayerError::Layer("shape mismatch".into()));
        assert_eq!(calls.get(), 0);
    }

    fn append(tag: &'static str) -> FnLayer<impl Fn(String) -> LayerResult<String>> {
        FnLayer::new(tag, move |s: String| Ok(s + tag))
    }

    #[test]
    fn test_apply_sequence_owned_layers() {
        let layers = vec![append("a"), append("b")];
        assert_eq!(apply_sequence(layers, String::from(">")).unwrap(), ">ab");
    }

    #[test]
    fn test_sequential_forward() {
        let model = Sequential::new("encoder")
            .add(FnLayer::new("scale", |x: f64| Ok(x * 0.5)))
            .add(FnLayer::new("shift", |x: f64| Ok(x + 4.0)));

        assert_eq!(model.name(), "encoder");
        assert_eq!(model.len(), 2);
        assert_abs_diff_eq!(model.forward(6.0).unwrap(), 7.0, epsilon = 1e-12);
        assert_eq!(model.sublayers().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_sequential_shares_layers() {
        let shared = FnLayer::shared("double", |x: i64| Ok(x * 2));
        let a = Sequential::new("a").add_shared(Arc::clone(&shared));
        let b = Sequential::new("b").extend(vec![Arc::clone(&shared), shared]);

        assert_eq!(a.forward(3).unwrap(), 6);
        assert_eq!(b.forward(3).unwrap(), 12);
        assert!(Sequential::<i64>::default().is_empty());
    }
}

use crate::layers::{Layer, SharedLayer};
use crate::sequential::{apply_sequence, Sequential};
use layerstack_core::{LayerError, LayerResult};
use std::fmt::Write;
use std::sync::Arc;

/// Something a [`LayerStack`] can be built from.
///
/// Both capabilities default to "absent"; a source that offers neither is
/// rejected with [`LayerError::InvalidInputKind`].
pub trait LayerSource<T> {
    /// Ordered layers exposed as a member, as composite models do.
    fn layer_member(&self) -> Option<&[SharedLayer<T>]> {
        None
    }

    /// The value itself viewed as an ordered sequence of layers.
    fn as_layer_sequence(&self) -> Option<&[SharedLayer<T>]> {
        None
    }

    /// Human readable kind, used in error messages.
    fn kind(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<T> LayerSource<T> for [SharedLayer<T>] {
    fn as_layer_sequence(&self) -> Option<&[SharedLayer<T>]> {
        Some(self)
    }
}

impl<T> LayerSource<T> for Vec<SharedLayer<T>> {
    fn as_layer_sequence(&self) -> Option<&[SharedLayer<T>]> {
        Some(self)
    }
}

impl<T> LayerSource<T> for Sequential<T> {
    fn layer_member(&self) -> Option<&[SharedLayer<T>]> {
        Some(self.layers())
    }
}

impl<T> LayerSource<T> for LayerStack<T> {
    fn layer_member(&self) -> Option<&[SharedLayer<T>]> {
        Some(self.layers())
    }
}

/// A single layer is accepted only when it is a composite.
impl<T> LayerSource<T> for dyn Layer<T> {
    fn layer_member(&self) -> Option<&[SharedLayer<T>]> {
        self.sublayers()
    }

    fn kind(&self) -> String {
        format!("layer `{}`", self.name())
    }
}

impl<T, L: LayerSource<T> + ?Sized> LayerSource<T> for Arc<L> {
    fn layer_member(&self) -> Option<&[SharedLayer<T>]> {
        (**self).layer_member()
    }

    fn as_layer_sequence(&self) -> Option<&[SharedLayer<T>]> {
        (**self).as_layer_sequence()
    }

    fn kind(&self) -> String {
        (**self).kind()
    }
}

/// A callable stack of layers.
///
/// ```
/// use layerstack_nn::{FnLayer, LayerStack, SharedLayer};
///
/// let layers: Vec<SharedLayer<f64>> = vec![
///     FnLayer::shared("double", |x: f64| Ok(x * 2.0)),
///     FnLayer::shared("inc", |x: f64| Ok(x + 1.0)),
/// ];
/// let stack = LayerStack::new(&layers).unwrap();
/// assert_eq!(stack.call(3.0).unwrap(), 7.0);
/// ```
pub struct LayerStack<T> {
    name: String,
    layers: Vec<SharedLayer<T>>,
}

impl<T> LayerStack<T> {
    /// Build a stack from a composite exposing `layers`, or from an ordered
    /// sequence of layers, checked in that order.
    pub fn new<S>(source: &S) -> LayerResult<Self>
    where
        S: LayerSource<T> + ?Sized,
    {
        let layers = source
            .layer_member()
            .or_else(|| source.as_layer_sequence())
            .ok_or_else(|| LayerError::InvalidInputKind {
                found: source.kind(),
            })?;
        Ok(Self::from_layers(layers.to_vec()))
    }

    pub fn from_layers(layers: Vec<SharedLayer<T>>) -> Self {
        LayerStack {
            name: "layer_stack".to_string(),
            layers,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run `input` through the stack.
    pub fn call(&self, input: T) -> LayerResult<T> {
        apply_sequence(&self.layers, input)
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

    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Leaf layers, with nested composites replaced by their members.
    ///
    /// Applying the expanded sequence gives the same result as applying the
    /// stack itself.
    pub fn expanded(&self) -> Vec<SharedLayer<T>> {
        let mut out = Vec::new();
        expand_into(&self.layers, &mut out);
        out
    }

    /// A stack over [`LayerStack::expanded`] keeping this stack's name.
    pub fn expand(&self) -> Self {
        LayerStack {
            name: self.name.clone(),
            layers: self.expanded(),
        }
    }

    /// Table of every leaf layer with its position.
    pub fn summary(&self) -> String {
        let leaves = self.expanded();
        let mut s = String::new();
        let _ = writeln!(s, "Stack: {}", self.name);
        s.push_str("_________________________________________________________________\n");
        s.push_str("#     Layer\n");
        s.push_str("=================================================================\n");
        for (idx, layer) in leaves.iter().enumerate() {
            let _ = writeln!(s, "{:<5} {}", idx, layer.name());
        }
        s.push_str("=================================================================\n");
        let _ = writeln!(s, "Total layers: {}", leaves.len());
        s
    }
}

fn expand_into<T>(layers: &[SharedLayer<T>], out: &mut Vec<SharedLayer<T>>) {
    for layer in layers {
        match layer.sublayers() {
            Some(children) => expand_into(children, out),
            None => out.push(Arc::clone(layer)),
        }
    }
}

impl<T> Layer<T> for LayerStack<T> {
    fn forward(&self, input: T) -> LayerResult<T> {
        self.call(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        Some(&self.layers)
    }
}

impl<T> Clone for LayerStack<T> {
    fn clone(&self) -> Self {
        LayerStack {
            name: self.name.clone(),
            layers: self.layers.clone(),
        }
    }
}

use layerstack_core::LayerResult;
use std::fmt;
use std::sync::Arc;

/// A layer shared between stacks.
pub type SharedLayer<T> = Arc<dyn Layer<T>>;

/// Trait for a neural network layer: a named, callable processing unit.
///
/// The value type `T` belongs to the modeling framework.
pub trait Layer<T> {
    /// Forward pass.
    fn forward(&self, input: T) -> LayerResult<T>;

    fn name(&self) -> &str;

    /// Ordered member layers when this layer is a composite.
    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        None
    }
}

impl<T, L: Layer<T> + ?Sized> Layer<T> for &L {
    fn forward(&self, input: T) -> LayerResult<T> {
        (**self).forward(input)
    }
    fn name(&self) -> &str {
        (**self).name()
    }
    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        (**self).sublayers()
    }
}

impl<T, L: Layer<T> + ?Sized> Layer<T> for Box<L> {
    fn forward(&self, input: T) -> LayerResult<T> {
        (**self).forward(input)
    }
    fn name(&self) -> &str {
        (**self).name()
    }
    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        (**self).sublayers()
    }
}

impl<T, L: Layer<T> + ?Sized> Layer<T> for Arc<L> {
    fn forward(&self, input: T) -> LayerResult<T> {
        (**self).forward(input)
    }
    fn name(&self) -> &str {
        (**self).name()
    }
    fn sublayers(&self) -> Option<&[SharedLayer<T>]> {
        (**self).sublayers()
    }
}

/// Named closure acting as a layer.
pub struct FnLayer<F> {
    name: String,
    f: F,
}

impl<F> FnLayer<F> {
    pub fn new<T>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(T) -> LayerResult<T>,
    {
        FnLayer {
            name: name.into(),
            f,
        }
    }

    /// Wrap the closure straight into a [`SharedLayer`].
    pub fn shared<T>(name: impl Into<String>, f: F) -> SharedLayer<T>
    where
        F: Fn(T) -> LayerResult<T> + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F: Fn(T) -> LayerResult<T>> Layer<T> for FnLayer<F> {
    fn forward(&self, input: T) -> LayerResult<T> {
        (self.f)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnLayer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLayer").field("name", &self.name).finish()
    }
}

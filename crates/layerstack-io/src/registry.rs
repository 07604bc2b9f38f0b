use crate::spec::{LayerEntry, LayerSpec, RepeatSpec, StackSpec};
use layerstack_core::{LayerError, LayerResult};
use layerstack_nn::{construct_batch, Constructor, LayerStack, SharedLayer};
use std::collections::HashMap;

type BoxedConstructor<T> = Box<dyn Constructor<SharedLayer<T>>>;

/// Layer constructors looked up by class name.
pub struct LayerRegistry<T> {
    constructors: HashMap<String, BoxedConstructor<T>>,
}

impl<T> LayerRegistry<T> {
    pub fn new() -> Self {
        LayerRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Register `constructor` under `class_name`, replacing any previous one.
    pub fn register<C>(&mut self, class_name: impl Into<String>, constructor: C) -> &mut Self
    where
        C: Constructor<SharedLayer<T>> + 'static,
    {
        let class_name = class_name.into();
        tracing::debug!(class_name = %class_name, "registering layer class");
        self.constructors.insert(class_name, Box::new(constructor));
        self
    }

    /// Builder form of [`LayerRegistry::register`].
    pub fn with<C>(mut self, class_name: impl Into<String>, constructor: C) -> Self
    where
        C: Constructor<SharedLayer<T>> + 'static,
    {
        self.register(class_name, constructor);
        self
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn constructor(&self, class_name: &str) -> LayerResult<&dyn Constructor<SharedLayer<T>>> {
        self.constructors
            .get(class_name)
            .map(|c| c.as_ref())
            .ok_or_else(|| LayerError::UnknownLayer(class_name.to_string()))
    }

    pub fn build(&self, spec: &LayerSpec) -> LayerResult<SharedLayer<T>> {
        let constructor = self.constructor(&spec.class_name)?;
        tracing::debug!(class_name = %spec.class_name, "building layer");
        constructor.construct(&spec.args, &spec.config)
    }

    pub fn build_repeat(&self, spec: &RepeatSpec) -> LayerResult<Vec<SharedLayer<T>>> {
        let constructor = self.constructor(&spec.class_name)?;
        tracing::debug!(
            class_name = %spec.class_name,
            count = spec.args.first().map_or(1, Vec::len),
            "building repeated layers"
        );
        construct_batch(constructor, &spec.args, &spec.config, &spec.options)
    }

    /// Build every entry in order, expanding repeats in place.
    pub fn build_entries(&self, entries: &[LayerEntry]) -> LayerResult<Vec<SharedLayer<T>>> {
        let mut layers = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                LayerEntry::Single(spec) => layers.push(self.build(spec)?),
                LayerEntry::Repeat { repeat } => layers.extend(self.build_repeat(repeat)?),
            }
        }
        Ok(layers)
    }

    pub fn build_stack(&self, spec: &StackSpec) -> LayerResult<LayerStack<T>> {
        let stack = LayerStack::from_layers(self.build_entries(&spec.layers)?);
        Ok(match &spec.name {
            Some(name) => stack.with_name(name.clone()),
            None => stack,
        })
    }
}

impl<T> Default for LayerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

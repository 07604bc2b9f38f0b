use layerstack_core::{BatchOptions, LayerConfig, LayerError, LayerResult, Value, NAME_KEY};

/// Builds one layer from positional arguments and keyword configuration.
///
/// Any `Fn(&[Value], &LayerConfig) -> LayerResult<L>` is a constructor.
pub trait Constructor<L> {
    fn construct(&self, args: &[Value], config: &LayerConfig) -> LayerResult<L>;
}

impl<L, F> Constructor<L> for F
where
    F: Fn(&[Value], &LayerConfig) -> LayerResult<L>,
{
    fn construct(&self, args: &[Value], config: &LayerConfig) -> LayerResult<L> {
        self(args, config)
    }
}

/// Instantiate one layer per element of the first argument list.
///
/// Layer `i` receives element `i` of every list in `arg_lists`, in order, and
/// a copy of `shared` where:
///
/// - `name` is `{options.name}_{options.name_start_index + i}` when a base name
///   is set, replacing any `name` already present,
/// - the `options.initial_only_key` option (`input_shape` by default) is kept
///   for the first layer only.
///
/// With no argument lists, exactly one layer is built from `shared` (plus the
/// base name, unsuffixed). `shared` itself is never modified.
///
/// # Errors
/// - [`LayerError::IndexOutOfRange`] if a list is shorter than the first one;
///   nothing is constructed in that case.
/// - [`LayerError::LengthMismatch`] if a list is longer than the first one and
///   `options.strict_lengths` is set.
/// - [`LayerError::InvalidConfig`] if a name suffix overflows `usize`.
/// - Any error returned by `constructor`, unchanged.
pub fn construct_batch<L, C>(
    constructor: &C,
    arg_lists: &[Vec<Value>],
    shared: &LayerConfig,
    options: &BatchOptions,
) -> LayerResult<Vec<L>>
where
    C: Constructor<L> + ?Sized,
{
    let Some(first) = arg_lists.first() else {
        let mut config = shared.clone();
        if let Some(name) = options.base_name() {
            config.set(NAME_KEY, name);
        }
        tracing::debug!(name = config.name(), "constructing single layer");
        return Ok(vec![constructor.construct(&[], &config)?]);
    };

    let count = first.len();
    check_lengths(arg_lists, count, options.strict_lengths)?;

    let mut layers = Vec::with_capacity(count);
    for index in 0..count {
        let args = positional_args(arg_lists, index)?;

        let mut config = shared.clone();
        if index > 0 {
            config.remove(&options.initial_only_key);
        }
        if let Some(name) = options.name_for(index)? {
            config.set(NAME_KEY, name);
        }

        tracing::debug!(index, name = config.name(), "constructing layer");
        layers.push(constructor.construct(&args, &config)?);
    }
    Ok(layers)
}

/// [`construct_batch`] with the naming options given positionally.
pub fn repeat_layers<L, C>(
    constructor: &C,
    arg_lists: &[Vec<Value>],
    shared: &LayerConfig,
    name: Option<&str>,
    name_start_index: usize,
) -> LayerResult<Vec<L>>
where
    C: Constructor<L> + ?Sized,
{
    let mut options = BatchOptions::new().start_index(name_start_index);
    options.name = name.map(str::to_string);
    construct_batch(constructor, arg_lists, shared, &options)
}

fn check_lengths(arg_lists: &[Vec<Value>], count: usize, strict: bool) -> LayerResult<()> {
    for (list, values) in arg_lists.iter().enumerate().skip(1) {
        let len = values.len();
        if len < count {
            return Err(LayerError::IndexOutOfRange {
                list,
                index: len,
                len,
            });
        }
        if len > count {
            if strict {
                return Err(LayerError::LengthMismatch {
                    list,
                    expected: count,
                    found: len,
                });
            }
            tracing::warn!(
                list,
                expected = count,
                found = len,
                "ignoring trailing positional arguments"
            );
        }
    }
    Ok(())
}

fn positional_args(arg_lists: &[Vec<Value>], index: usize) -> LayerResult<Vec<Value>> {
    arg_lists
        .iter()
        .enumerate()
        .map(|(list, values)| {
            values
                .get(index)
                .cloned()
                .ok_or(LayerError::IndexOutOfRange {
                    list,
                    index,
                    len: values.len(),
                })
        })
        .collect()
}

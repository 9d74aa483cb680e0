use rankflow_common::error::RankFlowResult;

pub trait Function: Send + Sync + 'static {}

impl<F> Function for F where F: Send + Sync + 'static {}

/// Sink for the `(key, value)` pairs a transform task emits.
pub trait TransformContext<K, V> {
    fn emit(&mut self, key: K, value: V);
}

/// A single "transform then aggregate by key" pass.
///
/// `transform` is called once per input record and may emit any number of
/// keyed values. Every value emitted under the same key is handed to exactly
/// one `aggregate` call, which produces at most one output record. Both
/// halves run on worker threads and must not share mutable state; any
/// per-run parameter belongs in the function value itself.
pub trait StageFunction<T, K, V, R>: Function {
    fn name(&self) -> &str;

    fn transform(&self, record: T, context: &mut dyn TransformContext<K, V>)
        -> RankFlowResult<()>;

    fn aggregate(&self, key: &K, values: &mut dyn Iterator<Item = V>)
        -> RankFlowResult<Option<R>>;
}

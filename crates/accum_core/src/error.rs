//! Error types surfaced by the accumulation engine.

/// Error type returned by caller-supplied closures (key extractors, builders, sinks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised while folding a row stream into entities.
///
/// Every variant aborts the pass. The engine never retries a row and never
/// repairs a partially built entity.
#[derive(Debug, thiserror::Error)]
pub enum AccumulateError {
    /// The row key extractor failed (for example a missing key column).
    #[error("failed to extract group key from row: {0}")]
    RowKey(#[source] BoxError),

    /// The entity builder failed on the row that starts a group.
    #[error("failed to build entity from row: {0}")]
    Build(#[source] BoxError),

    /// The post-build hook failed while attaching a new entity to its parent.
    #[error("post-build hook failed: {0}")]
    PostBuild(#[source] BoxError),

    /// The emitter rejected a completed entity.
    #[error("emitter rejected completed entity: {0}")]
    Emit(#[source] BoxError),

    /// Moving a completed entity into its parent failed.
    #[error("failed to hand completed entity to parent: {0}")]
    IntoParent(#[source] BoxError),

    /// A key group started again after it had been completed in the same scope.
    #[error("group `{key}` reappeared after it was completed; rows must be grouped by key")]
    GroupReopened { key: String },
}

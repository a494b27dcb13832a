/// Reasons a whole import payload was rejected before touching the graph.
///
/// Individual malformed node records are skipped rather than reported here.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("import payload is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("no node map found in import payload")]
    NodeMapNotFound,
}

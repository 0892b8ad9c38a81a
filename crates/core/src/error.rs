use thiserror::Error;

use crate::model::CategoryCode;

/// Errors emitted by the bounded progress aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AggregationError {
    #[error("category tree below `{code}` is deeper than {max_depth} levels")]
    DepthExceeded { code: CategoryCode, max_depth: usize },
}

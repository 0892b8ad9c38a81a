#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;

pub use error::AggregationError;
pub use progress::{aggregate, aggregate_bounded, aggregate_tree, build_lookup, ProgressLookup};

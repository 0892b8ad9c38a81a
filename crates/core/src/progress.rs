//! Roll-up of study progress over the category tree.
//!
//! Every node's card counters are its own record plus the aggregated counters
//! of all its children, computed depth-first in post-order. The mastery rate
//! stays local to each node.

use std::collections::HashMap;

use crate::error::AggregationError;
use crate::model::{AggregatedNode, AggregatedProgress, CategoryCode, CategoryNode, ProgressRecord};

/// Progress records keyed by category code.
pub type ProgressLookup = HashMap<CategoryCode, ProgressRecord>;

/// Index records by category code. A later record replaces an earlier one with
/// the same code.
#[must_use]
pub fn build_lookup<I>(records: I) -> ProgressLookup
where
    I: IntoIterator<Item = ProgressRecord>,
{
    records
        .into_iter()
        .map(|record| (record.category_code.clone(), record))
        .collect()
}

/// Aggregate `node` and all of its descendants.
///
/// A node without a record contributes zero cards and a mastery rate of `0`.
/// The tree must be acyclic; use [`aggregate_bounded`] for untrusted input.
#[must_use]
pub fn aggregate(node: &CategoryNode, lookup: &ProgressLookup) -> AggregatedProgress {
    let (total, studied) = node
        .children
        .iter()
        .map(|child| aggregate(child, lookup))
        .fold((0_u64, 0_u64), |(total, studied), child| {
            (
                total.saturating_add(child.total_cards),
                studied.saturating_add(child.studied_cards),
            )
        });
    finish(&node.code, lookup, total, studied)
}

/// Aggregate every node of the tree, keeping the tree shape.
#[must_use]
pub fn aggregate_tree(node: &CategoryNode, lookup: &ProgressLookup) -> AggregatedNode {
    let children: Vec<AggregatedNode> = node
        .children
        .iter()
        .map(|child| aggregate_tree(child, lookup))
        .collect();
    let (total, studied) = sum_children(&children);
    AggregatedNode {
        progress: finish(&node.code, lookup, total, studied),
        children,
    }
}

/// Same as [`aggregate_tree`], but rejects trees nested deeper than `max_depth`.
///
/// The root sits at depth `0`.
///
/// # Errors
///
/// Returns `AggregationError::DepthExceeded` naming the first node found past
/// the limit.
pub fn aggregate_bounded(
    node: &CategoryNode,
    lookup: &ProgressLookup,
    max_depth: usize,
) -> Result<AggregatedNode, AggregationError> {
    fn go(
        node: &CategoryNode,
        lookup: &ProgressLookup,
        depth: usize,
        max_depth: usize,
    ) -> Result<AggregatedNode, AggregationError> {
        if depth > max_depth {
            return Err(AggregationError::DepthExceeded {
                code: node.code.clone(),
                max_depth,
            });
        }
        let children = node
            .children
            .iter()
            .map(|child| go(child, lookup, depth + 1, max_depth))
            .collect::<Result<Vec<_>, _>>()?;
        let (total, studied) = sum_children(&children);
        Ok(AggregatedNode {
            progress: finish(&node.code, lookup, total, studied),
            children,
        })
    }

    go(node, lookup, 0, max_depth)
}

fn sum_children(children: &[AggregatedNode]) -> (u64, u64) {
    children.iter().fold((0_u64, 0_u64), |(total, studied), child| {
        (
            total.saturating_add(child.progress.total_cards),
            studied.saturating_add(child.progress.studied_cards),
        )
    })
}

fn finish(
    code: &CategoryCode,
    lookup: &ProgressLookup,
    child_total: u64,
    child_studied: u64,
) -> AggregatedProgress {
    let own = lookup.get(code);
    let total_cards = own.map_or(0, |r| r.total_cards).saturating_add(child_total);
    let studied_cards = own.map_or(0, |r| r.studied_cards).saturating_add(child_studied);

    #[allow(clippy::cast_precision_loss)]
    let progress_rate = if total_cards > 0 {
        studied_cards as f64 / total_cards as f64
    } else {
        0.0
    };

    AggregatedProgress {
        category_code: code.clone(),
        total_cards,
        studied_cards,
        progress_rate,
        mastery_rate: own.map_or(0.0, |r| r.mastery_rate),
    }
}

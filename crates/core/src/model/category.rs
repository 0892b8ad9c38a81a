use serde::{Deserialize, Serialize};

use crate::model::ids::CategoryCode;

//
// ─── CATEGORY TREE ────────────────────────────────────────────────────────────
//

/// One node of the externally supplied category tree.
///
/// The tree is assumed acyclic and finite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub code: CategoryCode,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    #[must_use]
    pub fn leaf(code: impl Into<String>) -> Self {
        Self {
            code: CategoryCode::new(code),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(code: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            code: CategoryCode::new(code),
            children,
        }
    }
}

//
// ─── PROGRESS ─────────────────────────────────────────────────────────────────
//

/// Study counters reported for a single category, excluding its descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub category_code: CategoryCode,
    pub total_cards: u64,
    pub studied_cards: u64,
    pub mastery_rate: f64,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(
        category_code: impl Into<String>,
        total_cards: u64,
        studied_cards: u64,
        mastery_rate: f64,
    ) -> Self {
        Self {
            category_code: CategoryCode::new(category_code),
            total_cards,
            studied_cards,
            mastery_rate,
        }
    }
}

/// Progress for a category including everything beneath it.
///
/// `mastery_rate` is the category's own value and is never rolled up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedProgress {
    pub category_code: CategoryCode,
    pub total_cards: u64,
    pub studied_cards: u64,
    pub progress_rate: f64,
    pub mastery_rate: f64,
}

impl AggregatedProgress {
    /// `progress_rate` as a whole percentage, for dashboard labels.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let pct = (self.progress_rate * 100.0).round().clamp(0.0, 100.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = pct as u8;
        pct
    }
}

/// A category tree annotated with the roll-up for every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNode {
    pub progress: AggregatedProgress,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AggregatedNode>,
}

impl AggregatedNode {
    /// Visits this node and its descendants in pre-order with their depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(usize, &'a AggregatedProgress)) {
        fn go<'a>(
            node: &'a AggregatedNode,
            depth: usize,
            visit: &mut impl FnMut(usize, &'a AggregatedProgress),
        ) {
            visit(depth, &node.progress);
            for child in &node.children {
                go(child, depth + 1, visit);
            }
        }
        go(self, 0, visit);
    }
}

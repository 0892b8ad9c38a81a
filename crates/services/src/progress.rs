use std::sync::Arc;

use async_trait::async_trait;
use learn_core::model::{AggregatedNode, AggregatedProgress, CategoryNode, ProgressRecord};
use learn_core::{aggregate_bounded, build_lookup};
use reqwest::Method;

use crate::error::ProgressServiceError;
use crate::http::ApiClient;

/// Deepest category nesting the dashboard accepts.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Read-only supplier of the category tree and per-category progress.
#[async_trait]
pub trait CategoryProgressSource: Send + Sync {
    /// Fetch the root of the category tree.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the tree cannot be fetched.
    async fn fetch_category_tree(&self) -> Result<CategoryNode, ProgressServiceError>;

    /// Fetch one progress record per category, in server order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the records cannot be fetched.
    async fn fetch_progress_records(&self) -> Result<Vec<ProgressRecord>, ProgressServiceError>;
}

/// Source serving a fixed tree and record list.
#[derive(Debug, Clone)]
pub struct StaticProgressSource {
    tree: CategoryNode,
    records: Vec<ProgressRecord>,
}

impl StaticProgressSource {
    #[must_use]
    pub fn new(tree: CategoryNode, records: Vec<ProgressRecord>) -> Self {
        Self { tree, records }
    }
}

#[async_trait]
impl CategoryProgressSource for StaticProgressSource {
    async fn fetch_category_tree(&self) -> Result<CategoryNode, ProgressServiceError> {
        Ok(self.tree.clone())
    }

    async fn fetch_progress_records(&self) -> Result<Vec<ProgressRecord>, ProgressServiceError> {
        Ok(self.records.clone())
    }
}

/// Source backed by the study API.
#[derive(Clone)]
pub struct HttpProgressSource {
    api: ApiClient,
}

impl HttpProgressSource {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ProgressServiceError> {
        let response = self.api.request(Method::GET, path).send().await?;
        if !response.status().is_success() {
            return Err(ProgressServiceError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CategoryProgressSource for HttpProgressSource {
    async fn fetch_category_tree(&self) -> Result<CategoryNode, ProgressServiceError> {
        self.get_json("categories/tree").await
    }

    async fn fetch_progress_records(&self) -> Result<Vec<ProgressRecord>, ProgressServiceError> {
        self.get_json("progress").await
    }
}

/// Loads category progress for the study dashboard.
///
/// Every call fetches fresh data and recomputes the roll-up.
#[derive(Clone)]
pub struct ProgressDashboardService {
    source: Arc<dyn CategoryProgressSource>,
    max_depth: usize,
}

impl ProgressDashboardService {
    #[must_use]
    pub fn new(source: Arc<dyn CategoryProgressSource>) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fetch tree and records, then aggregate every category.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if either fetch fails or the tree is
    /// nested deeper than the configured limit.
    pub async fn load(&self) -> Result<AggregatedNode, ProgressServiceError> {
        let (tree, records) = tokio::try_join!(
            self.source.fetch_category_tree(),
            self.source.fetch_progress_records()
        )?;
        let lookup = build_lookup(records);
        let annotated = aggregate_bounded(&tree, &lookup, self.max_depth)?;
        tracing::debug!(
            root = %annotated.progress.category_code,
            total = annotated.progress.total_cards,
            "category progress aggregated"
        );
        Ok(annotated)
    }

    /// Only the root's roll-up.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub async fn load_summary(&self) -> Result<AggregatedProgress, ProgressServiceError> {
        Ok(self.load().await?.progress)
    }
}

use async_trait::async_trait;
use learn_core::model::{BookmarkableEntity, EntityKind};
use reqwest::Method;
use serde::Deserialize;

use crate::error::BookmarkServiceError;
use crate::http::ApiClient;

/// Remote bookmark endpoints. Implementations route each call to the endpoint
/// family matching `entity.kind`.
#[async_trait]
pub trait BookmarkService: Send + Sync {
    /// Bookmark the entity.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkServiceError` if the remote call fails.
    async fn add(&self, entity: &BookmarkableEntity) -> Result<(), BookmarkServiceError>;

    /// Remove the entity's bookmark.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkServiceError` if the remote call fails.
    async fn remove(&self, entity: &BookmarkableEntity) -> Result<(), BookmarkServiceError>;

    /// Whether the entity is currently bookmarked.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkServiceError` if the remote call fails.
    async fn status(&self, entity: &BookmarkableEntity) -> Result<bool, BookmarkServiceError>;
}

/// `BookmarkService` over the study API.
#[derive(Clone)]
pub struct HttpBookmarkService {
    api: ApiClient,
}

impl HttpBookmarkService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn path(entity: &BookmarkableEntity) -> String {
        let family = match entity.kind {
            EntityKind::Public => "cards",
            EntityKind::UserOwned => "user-cards",
        };
        format!("{family}/{}/bookmark", entity.id)
    }

    async fn send(
        &self,
        method: Method,
        entity: &BookmarkableEntity,
    ) -> Result<reqwest::Response, BookmarkServiceError> {
        let response = self
            .api
            .request(method, &Self::path(entity))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(BookmarkServiceError::HttpStatus(response.status()));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    bookmarked: bool,
}

#[async_trait]
impl BookmarkService for HttpBookmarkService {
    async fn add(&self, entity: &BookmarkableEntity) -> Result<(), BookmarkServiceError> {
        self.send(Method::POST, entity).await?;
        Ok(())
    }

    async fn remove(&self, entity: &BookmarkableEntity) -> Result<(), BookmarkServiceError> {
        self.send(Method::DELETE, entity).await?;
        Ok(())
    }

    async fn status(&self, entity: &BookmarkableEntity) -> Result<bool, BookmarkServiceError> {
        let body: StatusResponse = self.send(Method::GET, entity).await?.json().await?;
        Ok(body.bookmarked)
    }
}

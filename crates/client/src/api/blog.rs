//! Blog entry endpoints.

use tracing::instrument;

use tandem_core::{BlogEntry, NewBlogEntry};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// The couple's journal entries, newest first.
    #[instrument(skip(self))]
    pub async fn list_blog_entries(&self) -> Result<Fetched<Vec<BlogEntry>>, ApiError> {
        self.get_scoped("blog-entries/").await
    }

    /// Write a new entry.
    #[instrument(skip(self, entry))]
    pub async fn create_blog_entry(&self, entry: &NewBlogEntry) -> Result<BlogEntry, ApiError> {
        self.post_scoped("blog-entries/", entry).await
    }
}

//! Photo endpoints.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use tandem_core::{ActivityId, BlogEntryId, Photo};

use super::{ApiClient, ApiError, Fetched};

impl ApiClient {
    /// The couple's uploaded photos.
    #[instrument(skip(self))]
    pub async fn list_photos(&self) -> Result<Fetched<Vec<Photo>>, ApiError> {
        self.get_scoped("photos/").await
    }

    /// Upload a photo, optionally linking it to an activity or blog entry.
    ///
    /// Uploads are multipart and cannot be retried or replayed from cache;
    /// a failure must be resolved by the user trying again.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_photo(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        activity_id: Option<ActivityId>,
        blog_entry_id: Option<BlogEntryId>,
    ) -> Result<Photo, ApiError> {
        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_owned()));
        if let Some(id) = activity_id {
            form = form.text("activity_id", id.to_string());
        }
        if let Some(id) = blog_entry_id {
            form = form.text("blog_entry_id", id.to_string());
        }
        let builder = self.scoped(Method::POST, "photos/").await?.multipart(form);
        self.send_parsed(builder).await
    }
}

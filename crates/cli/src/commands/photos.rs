//! Photo gallery commands.

use std::path::Path;

use tandem_core::{ActivityId, BlogEntryId};

use super::{connect, note_cached, require_paired};

/// List uploaded photos.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "photos list").await?;

    let fetched = client.list_photos().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No photos yet. Upload one with `tandem photos upload <PATH>`.");
        return Ok(());
    }
    for photo in &fetched.value {
        let attached = match (photo.activity_id, photo.blog_entry_id) {
            (Some(id), _) => format!("  (activity {id})"),
            (None, Some(id)) => format!("  (journal {id})"),
            (None, None) => String::new(),
        };
        println!(
            "{:>4}  {}  {}{attached}",
            photo.id,
            photo.uploaded_at.format("%Y-%m-%d"),
            photo.file_path,
        );
    }
    Ok(())
}

/// Upload a photo, optionally attaching it to an activity or journal entry.
#[allow(clippy::print_stdout)]
pub async fn upload(
    path: &str,
    activity: Option<i32>,
    journal: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "photos upload").await?;

    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("not a file path: {path}"))?;
    let bytes = tokio::fs::read(path).await?;

    let photo = client
        .upload_photo(
            &file_name,
            bytes,
            activity.map(ActivityId::new),
            journal.map(BlogEntryId::new),
        )
        .await?;
    println!("Uploaded {} as photo {}.", file_name, photo.id);
    println!("Run `tandem badges sync` to refresh achievements.");
    Ok(())
}

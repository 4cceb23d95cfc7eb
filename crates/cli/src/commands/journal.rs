//! Journal commands.

use tandem_core::NewBlogEntry;

use super::{connect, note_cached, require_paired};

/// List journal entries.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "journal list").await?;

    let fetched = client.list_blog_entries().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("The journal is empty. Write with `tandem journal write`.");
        return Ok(());
    }
    for entry in &fetched.value {
        let mood = entry
            .mood
            .as_deref()
            .map(|m| format!("  [{m}]"))
            .unwrap_or_default();
        println!(
            "{:>4}  {}  {}{mood}",
            entry.id,
            entry.created_at.format("%Y-%m-%d"),
            entry.title,
        );
    }
    Ok(())
}

/// Write a journal entry.
#[allow(clippy::print_stdout)]
pub async fn write(
    title: &str,
    content: &str,
    mood: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "journal write").await?;

    let new_entry = NewBlogEntry {
        title: title.to_owned(),
        content: content.to_owned(),
        mood,
    };
    let entry = client.create_blog_entry(&new_entry).await?;
    println!("Wrote entry {}: {}", entry.id, entry.title);
    Ok(())
}

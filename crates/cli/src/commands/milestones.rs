//! Milestone commands.
//!
//! Milestones never touch the backend; everything here works offline.

use uuid::Uuid;

use tandem_client::MilestoneJournal;
use tandem_core::Milestone;

use super::{open_store, require_paired};
use crate::MilestoneAddArgs;

/// List the timeline for the active couple.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let code = require_paired(&store, "milestones list").await?;

    let journal = MilestoneJournal::new(store);
    let milestones = journal.list(&code).await?;

    if milestones.is_empty() {
        println!("No milestones remembered yet. Add one with `tandem milestones add`.");
        return Ok(());
    }
    for milestone in &milestones {
        let note = if milestone.description.is_empty() {
            String::new()
        } else {
            format!("  {}", milestone.description)
        };
        println!(
            "{}  {}  [{}] {}{note}",
            milestone.id, milestone.date, milestone.kind, milestone.title,
        );
    }
    Ok(())
}

/// Remember a moment on the timeline.
#[allow(clippy::print_stdout)]
pub async fn add(args: MilestoneAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let code = require_paired(&store, "milestones add").await?;

    let journal = MilestoneJournal::new(store);
    let milestone = journal
        .add(
            &code,
            Milestone::new(args.title, args.date, args.description, args.kind),
        )
        .await?;
    println!("Remembered {} ({}).", milestone.title, milestone.date);
    Ok(())
}

/// Remove a moment from the timeline.
#[allow(clippy::print_stdout)]
pub async fn remove(id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    let (_, store) = open_store()?;
    let code = require_paired(&store, "milestones remove").await?;

    let journal = MilestoneJournal::new(store);
    if journal.remove(&code, id).await? {
        println!("Removed.");
    } else {
        println!("No milestone with id {id}.");
    }
    Ok(())
}

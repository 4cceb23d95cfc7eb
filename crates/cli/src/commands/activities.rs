//! Activity commands.

use tandem_core::{
    ActivityFilter, ActivityId, ActivityStatus, ActivityUpdate, Category, Cost, Difficulty,
    NewActivity, Season,
};

use super::{connect, note_cached, require_paired};
use crate::ActivityAddArgs;

/// List activities, optionally filtered.
#[allow(clippy::print_stdout)]
pub async fn list(
    category: Option<Category>,
    difficulty: Option<Difficulty>,
    cost: Option<Cost>,
    season: Option<Season>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "activities list").await?;

    let filter = ActivityFilter {
        category,
        difficulty,
        cost,
        season,
    };
    let fetched = client.list_activities(&filter).await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No activities yet. Add one with `tandem activities add`.");
        return Ok(());
    }
    for activity in &fetched.value {
        println!(
            "{:>4}  {:<9}  {:<32}  {}/{}, {}, {} min",
            activity.id,
            activity.status,
            activity.title,
            activity.category,
            activity.difficulty,
            activity.cost,
            activity.duration,
        );
    }
    Ok(())
}

/// Add an activity idea.
#[allow(clippy::print_stdout)]
pub async fn add(args: ActivityAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "activities add").await?;

    let new_activity = NewActivity {
        title: args.title,
        description: args.description,
        status: ActivityStatus::Planned,
        category: args.category,
        difficulty: args.difficulty,
        duration: args.duration,
        cost: args.cost,
        season: args.season,
        mood: args.mood,
    };
    let activity = client.create_activity(&new_activity).await?;
    println!("Added activity {}: {}", activity.id, activity.title);
    Ok(())
}

/// Mark an activity completed.
#[allow(clippy::print_stdout)]
pub async fn complete(
    id: i32,
    rating: Option<i32>,
    notes: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "activities complete").await?;

    let update = ActivityUpdate {
        rating,
        notes,
        ..ActivityUpdate::completed()
    };
    let activity = client.update_activity(ActivityId::new(id), &update).await?;

    println!("Completed: {} ({})", activity.title, activity.id);
    println!("Run `tandem badges sync` to refresh achievements.");
    Ok(())
}

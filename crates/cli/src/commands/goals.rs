//! Goal commands.

use tandem_core::{GoalId, GoalUpdate, NewGoal};

use super::{connect, note_cached, require_paired};
use crate::GoalAddArgs;

/// List goals.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "goals list").await?;

    let fetched = client.list_goals().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No goals yet. Add one with `tandem goals add`.");
        return Ok(());
    }
    for goal in &fetched.value {
        let check = if goal.completed { "x" } else { " " };
        let due = goal
            .target_date
            .map(|d| format!("  (due {})", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("[{check}] {:>4}  {}{due}", goal.id, goal.title);
    }
    Ok(())
}

/// Add a goal.
#[allow(clippy::print_stdout)]
pub async fn add(args: GoalAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "goals add").await?;

    let new_goal = NewGoal {
        title: args.title,
        description: args.description,
        target_date: args.target_date,
        priority: args.priority,
        category: args.category,
    };
    let goal = client.create_goal(&new_goal).await?;
    println!("Added goal {}: {}", goal.id, goal.title);
    Ok(())
}

/// Mark a goal completed.
#[allow(clippy::print_stdout)]
pub async fn complete(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "goals complete").await?;

    let goal = client
        .update_goal(GoalId::new(id), &GoalUpdate::mark_completed())
        .await?;
    println!("Goal reached: {}", goal.title);
    println!("Run `tandem badges sync` to refresh achievements.");
    Ok(())
}

/// Delete a goal.
#[allow(clippy::print_stdout)]
pub async fn delete(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "goals delete").await?;

    client.delete_goal(GoalId::new(id)).await?;
    println!("Deleted goal {id}.");
    Ok(())
}

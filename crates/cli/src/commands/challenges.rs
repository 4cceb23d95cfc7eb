//! Challenge commands.

use tandem_core::{ChallengeCompletion, ChallengeId};

use super::{connect, note_cached, require_paired};

/// List challenges with the couple's progress.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "challenges list").await?;

    let fetched = client.list_challenges().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No challenges on offer right now.");
        return Ok(());
    }
    for row in &fetched.value {
        // x = completed, > = started, blank = untouched
        let marker = if row.completed {
            "x"
        } else if row.started {
            ">"
        } else {
            " "
        };
        println!(
            "[{marker}] {:>4}  {} ({} pts)",
            row.challenge.id, row.challenge.title, row.challenge.points,
        );
    }
    Ok(())
}

/// Start a challenge.
#[allow(clippy::print_stdout)]
pub async fn start(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "challenges start").await?;

    let progress = client.start_challenge(ChallengeId::new(id)).await?;
    println!(
        "Challenge {} started at {}.",
        progress.challenge_id,
        progress.started_at.format("%Y-%m-%d %H:%M"),
    );
    Ok(())
}

/// Complete a started challenge.
#[allow(clippy::print_stdout)]
pub async fn complete(id: i32, data: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "challenges complete").await?;

    let completion = ChallengeCompletion { data };
    let progress = client
        .complete_challenge(ChallengeId::new(id), &completion)
        .await?;
    println!("Challenge {} completed.", progress.challenge_id);
    println!("Run `tandem badges sync` to refresh achievements.");
    Ok(())
}

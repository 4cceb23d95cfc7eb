//! Badge commands.

use tandem_client::BadgeReconciler;
use tandem_core::BADGE_KEYS;

use super::{connect, note_cached, require_paired};

/// Show earned and unearned badges in catalog order.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "badges show").await?;

    let reconciler = BadgeReconciler::new(client);
    let fetched = reconciler.pull().await?;
    note_cached(&fetched);

    for key in BADGE_KEYS {
        let check = if fetched.value.earned(key) { "x" } else { " " };
        println!("[{check}] {key}");
    }
    println!(
        "\n{} of {} badges earned.",
        fetched.value.earned_count(),
        BADGE_KEYS.len(),
    );
    Ok(())
}

/// Recompute achievements from live counters and push them to the server.
#[allow(clippy::print_stdout)]
pub async fn sync() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "badges sync").await?;

    let reconciler = BadgeReconciler::new(client);
    let report = reconciler.sync().await?;

    for key in &report.newly_earned {
        println!("New badge earned: {key}");
    }
    if report.newly_earned.is_empty() {
        println!("No new badges this time.");
    }
    println!(
        "{} of {} badges earned.",
        report.state.earned_count(),
        BADGE_KEYS.len(),
    );
    if report.flushed {
        println!("Progress pushed to the server.");
    } else {
        println!("Server already in sync.");
    }
    Ok(())
}

/// List every badge the backend can award.
#[allow(clippy::print_stdout)]
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;

    let fetched = client.badge_catalog().await?;
    note_cached(&fetched);

    for key in &fetched.value {
        println!("{key}");
    }
    Ok(())
}

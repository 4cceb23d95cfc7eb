//! Calendar commands.

use tandem_core::{ActivityId, CalendarEventId, NewCalendarEvent};

use super::{connect, note_cached, require_paired};
use crate::CalendarAddArgs;

/// List calendar events.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "calendar list").await?;

    let fetched = client.list_calendar_events().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("Nothing on the calendar.");
        return Ok(());
    }
    for event in &fetched.value {
        let when = if event.all_day {
            event.start_time.format("%Y-%m-%d (all day)").to_string()
        } else {
            event.start_time.format("%Y-%m-%d %H:%M").to_string()
        };
        let location = event
            .location
            .as_deref()
            .map(|l| format!("  at {l}"))
            .unwrap_or_default();
        println!("{:>4}  {when}  {}{location}", event.id, event.title);
    }
    Ok(())
}

/// Add a calendar event.
#[allow(clippy::print_stdout)]
pub async fn add(args: CalendarAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "calendar add").await?;

    let new_event = NewCalendarEvent {
        title: args.title,
        description: args.description,
        start_time: args.start,
        end_time: args.end,
        all_day: args.all_day,
        location: args.location,
        event_type: args.event_type,
        recurrence: args.recurrence,
        color: args.color,
        reminder: args.reminder,
        shared: !args.private,
        activity_id: args.activity.map(ActivityId::new),
    };
    let event = client.create_calendar_event(&new_event).await?;
    println!(
        "Added event {}: {} on {}",
        event.id,
        event.title,
        event.start_time.format("%Y-%m-%d %H:%M"),
    );
    Ok(())
}

/// Delete a calendar event.
#[allow(clippy::print_stdout)]
pub async fn delete(id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "calendar delete").await?;

    client.delete_calendar_event(CalendarEventId::new(id)).await?;
    println!("Deleted event {id}.");
    Ok(())
}

//! Wire structs for the backend's REST resources.
//!
//! These mirror the JSON the backend produces and accepts. `New*` structs
//! are request bodies for creation, `*Update` structs are partial patches
//! that skip unset fields.

pub mod account;
pub mod activity;
pub mod blog;
pub mod calendar;
pub mod challenge;
pub mod goal;
pub mod library;
pub mod milestone;
pub mod photo;

pub use account::{AvatarOptions, LoginResponse, NewUser, ProfileUpdate, User};
pub use activity::{Activity, ActivityFilter, ActivityUpdate, NewActivity};
pub use blog::{BlogEntry, NewBlogEntry};
pub use calendar::{CalendarEvent, CalendarEventUpdate, NewCalendarEvent};
pub use challenge::{
    Challenge, ChallengeCompletion, ChallengeProgress, ChallengeWithProgress,
};
pub use goal::{Goal, GoalUpdate, NewGoal};
pub use library::{Book, BookUpdate, Movie, MovieUpdate, NewBook, NewMovie};
pub use milestone::{Milestone, MilestoneKind};
pub use photo::Photo;

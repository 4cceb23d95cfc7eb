//! Tandem CLI - Couple pairing, shared lists, and badges from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Pair this device, then share the code with your partner
//! tandem pair generate
//! tandem pair join 7K2XQ9
//!
//! # Sign in so writes carry your account
//! tandem login -e me@example.com -p secret
//!
//! # Plan something, then mark it done
//! tandem activities add -t "Sunrise hike" -d "The ridge trail" -c outdoor
//! tandem activities complete 12 --rating 5
//!
//! # See where the badges stand
//! tandem badges sync
//! ```
//!
//! # Configuration
//!
//! Reads `TANDEM_API_URL` (required) and `TANDEM_DATA_DIR` (optional) from
//! the environment or a `.env` file. All state lives under the data
//! directory; the backend is only needed for shared resources, and reads
//! fall back to the last synced copy when it is unreachable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tandem_core::{
    BookStatus, Category, Cost, CoupleCode, Difficulty, EventType, MilestoneKind, MovieStatus,
    Recurrence, Season,
};

mod commands;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(author, version, about = "Tandem: a shared life, one terminal at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair this device with your partner
    Pair {
        #[command(subcommand)]
        action: PairAction,
    },
    /// Create an account on the backend
    Register(RegisterArgs),
    /// Sign in and store the session token
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Drop the stored session locally
    Logout,
    /// Show or edit the signed-in profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Shared activity ideas
    Activities {
        #[command(subcommand)]
        action: ActivitiesAction,
    },
    /// The shared reading list
    Books {
        #[command(subcommand)]
        action: BooksAction,
    },
    /// The shared watch list
    Movies {
        #[command(subcommand)]
        action: MoviesAction,
    },
    /// The shared journal
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// The shared calendar
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Goals you are working toward together
    Goals {
        #[command(subcommand)]
        action: GoalsAction,
    },
    /// Couple challenges and their progress
    Challenges {
        #[command(subcommand)]
        action: ChallengesAction,
    },
    /// The shared photo gallery
    Photos {
        #[command(subcommand)]
        action: PhotosAction,
    },
    /// Achievement badges
    Badges {
        #[command(subcommand)]
        action: BadgesAction,
    },
    /// The relationship timeline kept on this device
    Milestones {
        #[command(subcommand)]
        action: MilestonesAction,
    },
}

#[derive(Subcommand)]
enum PairAction {
    /// Generate a fresh couple code and make it active
    Generate,
    /// Join your partner's couple with the code they shared
    Join {
        /// The 6-character couple code
        code: String,
    },
    /// Show the locally active and server-linked codes
    Status,
    /// Forget the locally stored code
    Clear,
}

#[derive(Args)]
struct RegisterArgs {
    /// Email address
    #[arg(short, long)]
    email: String,
    /// Password
    #[arg(short, long)]
    password: String,
    /// Display name
    #[arg(short, long)]
    name: Option<String>,
    /// Couple code shared by your partner, to link at signup
    #[arg(short, long)]
    code: Option<CoupleCode>,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the signed-in profile
    Show,
    /// Change the display name
    SetName {
        /// The new display name
        name: String,
    },
    /// Show or edit the avatar (prints it when no flag is given)
    Avatar(AvatarArgs),
}

#[derive(Args)]
struct AvatarArgs {
    /// Hair or headwear token (e.g. ShortHairFlat, WinterHat1)
    #[arg(long)]
    top: Option<String>,
    /// Accessories token (e.g. None, Round)
    #[arg(long)]
    accessories: Option<String>,
    /// Hair color token
    #[arg(long)]
    hair_color: Option<String>,
    /// Facial hair token
    #[arg(long)]
    facial_hair: Option<String>,
    /// Facial hair color token
    #[arg(long)]
    facial_hair_color: Option<String>,
    /// Clothing token
    #[arg(long)]
    clothes: Option<String>,
    /// Clothing color token
    #[arg(long)]
    clothes_color: Option<String>,
    /// Eye style token
    #[arg(long)]
    eyes: Option<String>,
    /// Eyebrow style token
    #[arg(long)]
    eyebrows: Option<String>,
    /// Mouth style token
    #[arg(long)]
    mouth: Option<String>,
    /// Skin tone token
    #[arg(long)]
    skin: Option<String>,
}

#[derive(Subcommand)]
enum ActivitiesAction {
    /// List activities, optionally filtered
    List {
        /// outdoor, indoor, dining, entertainment or travel
        #[arg(long)]
        category: Option<Category>,
        /// easy, medium or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// free, low, medium or high
        #[arg(long)]
        cost: Option<Cost>,
        /// spring, summer, fall, winter or any
        #[arg(long)]
        season: Option<Season>,
    },
    /// Add a new activity idea
    Add(ActivityAddArgs),
    /// Mark an activity completed
    Complete {
        /// Activity id
        id: i32,
        /// 1-5 star rating
        #[arg(short, long)]
        rating: Option<i32>,
        /// Notes about how it went
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Args)]
struct ActivityAddArgs {
    /// Short name shown in lists
    #[arg(short, long)]
    title: String,
    /// What the idea is
    #[arg(short, long)]
    description: String,
    /// outdoor, indoor, dining, entertainment or travel
    #[arg(short, long)]
    category: Category,
    /// easy, medium or hard
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,
    /// Expected duration in minutes
    #[arg(long, default_value_t = 60)]
    duration: i32,
    /// free, low, medium or high
    #[arg(long, default_value = "free")]
    cost: Cost,
    /// Season it suits best
    #[arg(long)]
    season: Option<Season>,
    /// Mood emoji or free text
    #[arg(long)]
    mood: Option<String>,
}

#[derive(Subcommand)]
enum BooksAction {
    /// List the reading list
    List,
    /// Add a book
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,
        /// Author
        #[arg(short, long)]
        author: String,
    },
    /// Update reading progress
    Update {
        /// Book id
        id: i32,
        /// to_read, reading or completed
        #[arg(long)]
        status: BookStatus,
        /// 1-5 star rating
        #[arg(short, long)]
        rating: Option<i32>,
        /// A short review
        #[arg(long)]
        review: Option<String>,
    },
}

#[derive(Subcommand)]
enum MoviesAction {
    /// List the watch list
    List,
    /// Add a movie
    Add {
        /// Movie title
        #[arg(short, long)]
        title: String,
        /// Genre
        #[arg(short, long)]
        genre: String,
    },
    /// Update watch progress
    Update {
        /// Movie id
        id: i32,
        /// to_watch or watched
        #[arg(long)]
        status: MovieStatus,
        /// 1-5 star rating
        #[arg(short, long)]
        rating: Option<i32>,
        /// A short review
        #[arg(long)]
        review: Option<String>,
    },
}

#[derive(Subcommand)]
enum JournalAction {
    /// List journal entries
    List,
    /// Write a new entry
    Write {
        /// Entry title
        #[arg(short, long)]
        title: String,
        /// Entry body
        #[arg(short, long)]
        content: String,
        /// Mood emoji or free text
        #[arg(long)]
        mood: Option<String>,
    },
}

#[derive(Subcommand)]
enum CalendarAction {
    /// List calendar events
    List,
    /// Add an event
    Add(CalendarAddArgs),
    /// Delete an event
    Delete {
        /// Event id
        id: i32,
    },
}

#[derive(Args)]
struct CalendarAddArgs {
    /// Event title
    #[arg(short, long)]
    title: String,
    /// Start time, RFC 3339 (e.g. 2026-06-01T19:00:00Z)
    #[arg(short, long)]
    start: DateTime<Utc>,
    /// End time, RFC 3339
    #[arg(long)]
    end: Option<DateTime<Utc>>,
    /// Longer description
    #[arg(long)]
    description: Option<String>,
    /// The event spans the whole day
    #[arg(long)]
    all_day: bool,
    /// Where it happens
    #[arg(long)]
    location: Option<String>,
    /// birthday, anniversary, date, reminder, appointment, activity or other
    #[arg(long)]
    event_type: Option<EventType>,
    /// none, daily, weekly, monthly or yearly
    #[arg(long)]
    recurrence: Option<Recurrence>,
    /// Display color as a CSS hex string
    #[arg(long)]
    color: Option<String>,
    /// Reminder lead time in minutes
    #[arg(long)]
    reminder: Option<i32>,
    /// Keep the event off your partner's calendar
    #[arg(long)]
    private: bool,
    /// Activity to schedule this event from
    #[arg(long)]
    activity: Option<i32>,
}

#[derive(Subcommand)]
enum GoalsAction {
    /// List goals
    List,
    /// Add a goal
    Add(GoalAddArgs),
    /// Mark a goal completed
    Complete {
        /// Goal id
        id: i32,
    },
    /// Delete a goal
    Delete {
        /// Goal id
        id: i32,
    },
}

#[derive(Args)]
struct GoalAddArgs {
    /// Goal title
    #[arg(short, long)]
    title: String,
    /// Longer description
    #[arg(short, long)]
    description: Option<String>,
    /// Target date, RFC 3339
    #[arg(long)]
    target_date: Option<DateTime<Utc>>,
    /// low, medium or high
    #[arg(long)]
    priority: Option<String>,
    /// Free-form category
    #[arg(long)]
    category: Option<String>,
}

#[derive(Subcommand)]
enum ChallengesAction {
    /// List challenges with your progress
    List,
    /// Start a challenge
    Start {
        /// Challenge id
        id: i32,
    },
    /// Complete a started challenge
    Complete {
        /// Challenge id
        id: i32,
        /// Free-form progress details
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
enum PhotosAction {
    /// List uploaded photos
    List,
    /// Upload a photo
    Upload {
        /// Path to the image file
        path: String,
        /// Activity to attach the photo to
        #[arg(long)]
        activity: Option<i32>,
        /// Journal entry to attach the photo to
        #[arg(long)]
        journal: Option<i32>,
    },
}

#[derive(Subcommand)]
enum BadgesAction {
    /// Show earned and unearned badges
    Show,
    /// Recompute achievements and push them to the server
    Sync,
    /// List every badge the app can award
    Catalog,
}

#[derive(Subcommand)]
enum MilestonesAction {
    /// List the timeline
    List,
    /// Remember a moment
    Add(MilestoneAddArgs),
    /// Remove a moment
    Remove {
        /// Milestone id (shown by `milestones list`)
        id: Uuid,
    },
}

#[derive(Args)]
struct MilestoneAddArgs {
    /// What happened
    #[arg(short, long)]
    title: String,
    /// The day it happened (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// The story behind it
    #[arg(short, long, default_value = "")]
    description: String,
    /// anniversary, date, achievement, emotion or place
    #[arg(long, default_value = "date")]
    kind: MilestoneKind,
}

#[tokio::main]
async fn main() {
    // Default to info for our crates so command feedback is visible
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tandem_cli=info,tandem_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Pair { action } => match action {
            PairAction::Generate => commands::pair::generate().await?,
            PairAction::Join { code } => commands::pair::join(&code).await?,
            PairAction::Status => commands::pair::status().await?,
            PairAction::Clear => commands::pair::clear().await?,
        },
        Commands::Register(args) => commands::account::register(args).await?,
        Commands::Login { email, password } => commands::account::login(&email, &password).await?,
        Commands::Logout => commands::account::logout().await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show().await?,
            ProfileAction::SetName { name } => commands::profile::set_name(&name).await?,
            ProfileAction::Avatar(args) => commands::profile::avatar(args).await?,
        },
        Commands::Activities { action } => match action {
            ActivitiesAction::List {
                category,
                difficulty,
                cost,
                season,
            } => commands::activities::list(category, difficulty, cost, season).await?,
            ActivitiesAction::Add(args) => commands::activities::add(args).await?,
            ActivitiesAction::Complete { id, rating, notes } => {
                commands::activities::complete(id, rating, notes).await?;
            }
        },
        Commands::Books { action } => match action {
            BooksAction::List => commands::library::books_list().await?,
            BooksAction::Add { title, author } => {
                commands::library::books_add(&title, &author).await?;
            }
            BooksAction::Update {
                id,
                status,
                rating,
                review,
            } => commands::library::books_update(id, status, rating, review).await?,
        },
        Commands::Movies { action } => match action {
            MoviesAction::List => commands::library::movies_list().await?,
            MoviesAction::Add { title, genre } => {
                commands::library::movies_add(&title, &genre).await?;
            }
            MoviesAction::Update {
                id,
                status,
                rating,
                review,
            } => commands::library::movies_update(id, status, rating, review).await?,
        },
        Commands::Journal { action } => match action {
            JournalAction::List => commands::journal::list().await?,
            JournalAction::Write {
                title,
                content,
                mood,
            } => commands::journal::write(&title, &content, mood).await?,
        },
        Commands::Calendar { action } => match action {
            CalendarAction::List => commands::calendar::list().await?,
            CalendarAction::Add(args) => commands::calendar::add(args).await?,
            CalendarAction::Delete { id } => commands::calendar::delete(id).await?,
        },
        Commands::Goals { action } => match action {
            GoalsAction::List => commands::goals::list().await?,
            GoalsAction::Add(args) => commands::goals::add(args).await?,
            GoalsAction::Complete { id } => commands::goals::complete(id).await?,
            GoalsAction::Delete { id } => commands::goals::delete(id).await?,
        },
        Commands::Challenges { action } => match action {
            ChallengesAction::List => commands::challenges::list().await?,
            ChallengesAction::Start { id } => commands::challenges::start(id).await?,
            ChallengesAction::Complete { id, data } => {
                commands::challenges::complete(id, data).await?;
            }
        },
        Commands::Photos { action } => match action {
            PhotosAction::List => commands::photos::list().await?,
            PhotosAction::Upload {
                path,
                activity,
                journal,
            } => commands::photos::upload(&path, activity, journal).await?,
        },
        Commands::Badges { action } => match action {
            BadgesAction::Show => commands::badges::show().await?,
            BadgesAction::Sync => commands::badges::sync().await?,
            BadgesAction::Catalog => commands::badges::catalog().await?,
        },
        Commands::Milestones { action } => match action {
            MilestonesAction::List => commands::milestones::list().await?,
            MilestonesAction::Add(args) => commands::milestones::add(args).await?,
            MilestonesAction::Remove { id } => commands::milestones::remove(id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_activity_add() {
        let cli = Cli::try_parse_from([
            "tandem",
            "activities",
            "add",
            "-t",
            "Sunrise hike",
            "-d",
            "The ridge trail",
            "-c",
            "outdoor",
            "--difficulty",
            "hard",
        ])
        .unwrap();

        let Commands::Activities {
            action: ActivitiesAction::Add(args),
        } = cli.command
        else {
            panic!("parsed into the wrong command");
        };
        assert_eq!(args.title, "Sunrise hike");
        assert_eq!(args.category, Category::Outdoor);
        assert_eq!(args.difficulty, Difficulty::Hard);
        assert_eq!(args.duration, 60);
        assert_eq!(args.cost, Cost::Free);
    }

    #[test]
    fn test_parses_pair_join_code() {
        let cli = Cli::try_parse_from(["tandem", "pair", "join", "7K2XQ9"]).unwrap();
        let Commands::Pair {
            action: PairAction::Join { code },
        } = cli.command
        else {
            panic!("parsed into the wrong command");
        };
        assert_eq!(code, "7K2XQ9");
    }

    #[test]
    fn test_rejects_badge_subcommand_typo() {
        assert!(Cli::try_parse_from(["tandem", "badges", "synk"]).is_err());
    }

    #[test]
    fn test_milestone_date_must_be_a_date() {
        assert!(
            Cli::try_parse_from([
                "tandem",
                "milestones",
                "add",
                "-t",
                "First met",
                "--date",
                "yesterday",
            ])
            .is_err()
        );
    }
}

//! In-process stub of the Tandem backend.
//!
//! Serves the production route surface from in-memory maps, partitioned by
//! the couple code header exactly like the real thing. On top of that it
//! offers the failure knobs the scenarios need: induced 500s, response
//! delays, and a hard stop that refuses further connections.

// Axum handlers are async and take extractors by value.
#![allow(clippy::needless_pass_by_value, clippy::unused_async)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

use tandem_client::api::{COUPLE_CODE_HEADER, CoupleLink};
use tandem_core::{
    Activity, ActivityId, ActivityUpdate, BADGE_KEYS, BadgeState, BlogEntry, BlogEntryId, Book,
    BookId, BookUpdate, CalendarEvent, CalendarEventId, CalendarEventUpdate, Category, Challenge,
    ChallengeCompletion, ChallengeId, ChallengeProgress, ChallengeProgressId,
    ChallengeWithProgress, Cost, CoupleCode, Difficulty, Goal, GoalId, GoalUpdate, LoginResponse,
    Movie, MovieId, MovieUpdate, NewActivity, NewBlogEntry, NewBook, NewCalendarEvent, NewGoal,
    NewMovie, NewUser, Photo, PhotoId, ProfileUpdate, Season, User, UserId,
};

type Shared = Arc<Mutex<BackendState>>;
type Rejection = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, Rejection>;

// ----------------------------------------------------------------------
// Backend handle
// ----------------------------------------------------------------------

/// An in-process backend listening on an ephemeral localhost port.
pub struct TestBackend {
    addr: SocketAddr,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
}

impl TestBackend {
    /// Bind an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = router(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend address");
        let (shutdown, signal) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
                .expect("serve stub backend");
        });
        Self {
            addr,
            state,
            shutdown: Some(shutdown),
            server: Some(server),
        }
    }

    /// Base URL clients should be configured with.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("stub backend url")
    }

    /// Stop serving and release the port, so later requests fail at
    /// connect. Stored state survives for assertions.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(server) = self.server.take() {
            let _ = server.await;
        }
    }

    /// Add a challenge to the shared catalog.
    pub fn seed_challenge(&self, title: &str, points: i32) -> ChallengeId {
        let mut state = self.state.lock().unwrap();
        let id = ChallengeId::new(state.allocate_id());
        state.challenges.push(Challenge {
            id,
            title: title.to_owned(),
            description: None,
            category: Some("weekly".to_owned()),
            points,
            icon: None,
            active: true,
            created_at: Utc::now(),
        });
        id
    }

    /// The stored badge map for `code`, as the last flush left it.
    #[must_use]
    pub fn badge_state(&self, code: &CoupleCode) -> BadgeState {
        let state = self.state.lock().unwrap();
        state
            .couples
            .get(code)
            .map(|couple| couple.badges.clone())
            .unwrap_or_default()
    }

    /// Overwrite the stored badge map for `code`, as if another device
    /// had flushed it.
    pub fn set_badge_state(&self, code: &CoupleCode, badges: BadgeState) {
        let mut state = self.state.lock().unwrap();
        state.couples.entry(code.clone()).or_default().badges = badges;
    }

    /// Answer the next `count` requests with a 500 before routing.
    pub fn fail_requests(&self, count: u32) {
        self.state.lock().unwrap().failures = InducedFailures {
            remaining: count,
            only_matching: None,
        };
    }

    /// Answer the next `count` requests whose `METHOD /path` line contains
    /// `needle` with a 500. Other requests pass through unaffected.
    pub fn fail_matching(&self, needle: &str, count: u32) {
        self.state.lock().unwrap().failures = InducedFailures {
            remaining: count,
            only_matching: Some(needle.to_owned()),
        };
    }

    /// Hold every response for `delay`, for driving the client timeout.
    pub fn delay_responses(&self, delay: Duration) {
        self.state.lock().unwrap().response_delay = Some(delay);
    }

    /// How many requests matched the exact `METHOD /path` line.
    #[must_use]
    pub fn hits(&self, line: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .iter()
            .filter(|hit| hit.as_str() == line)
            .count()
    }

    /// Total requests that reached the backend.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().hits.len()
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

// ----------------------------------------------------------------------
// Routes and middleware
// ----------------------------------------------------------------------

fn router(state: Shared) -> Router {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/profile", get(profile).put(update_profile))
        .route("/couple/code", get(couple_code))
        .route("/couple/link", post(couple_link))
        .route("/activities/", get(list_activities).post(create_activity))
        .route("/activities/{id}", patch(update_activity))
        .route("/books/", get(list_books).post(create_book))
        .route("/books/{id}", patch(update_book))
        .route("/movies/", get(list_movies).post(create_movie))
        .route("/movies/{id}", patch(update_movie))
        .route("/blog-entries/", get(list_blog_entries).post(create_blog_entry))
        .route("/calendar/", get(list_events).post(create_event))
        .route("/calendar/{id}", put(update_event).delete(delete_event))
        .route("/goals/", get(list_goals).post(create_goal))
        .route("/goals/{id}", put(update_goal).delete(delete_goal))
        .route("/challenges/", get(list_challenges))
        .route("/challenges/{id}/start", post(start_challenge))
        .route("/challenges/{id}/complete", post(complete_challenge))
        .route("/photos/", get(list_photos).post(upload_photo))
        .route("/badges/", get(badge_catalog))
        .route(
            "/badges/progress",
            get(badge_progress).post(update_badge_progress),
        )
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            observe,
        ))
        .with_state(state)
}

/// Records the hit line and applies the failure and delay knobs before any
/// route runs.
async fn observe(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    let (delay, fail) = {
        let mut state = state.lock().unwrap();
        state.hits.push(line.clone());
        let fail = state.failures.claim(&line);
        (state.response_delay, fail)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "induced failure").into_response();
    }
    next.run(request).await
}

#[derive(Default)]
struct InducedFailures {
    remaining: u32,
    only_matching: Option<String>,
}

impl InducedFailures {
    /// Whether this request consumes a failure.
    fn claim(&mut self, line: &str) -> bool {
        if self.remaining == 0 {
            return false;
        }
        if self
            .only_matching
            .as_deref()
            .is_some_and(|needle| !line.contains(needle))
        {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

// ----------------------------------------------------------------------
// Stored state
// ----------------------------------------------------------------------

#[derive(Default)]
struct BackendState {
    id_counter: i32,
    users: Vec<StoredUser>,
    // Access token to email.
    tokens: HashMap<String, String>,
    challenges: Vec<Challenge>,
    couples: HashMap<CoupleCode, CoupleData>,
    hits: Vec<String>,
    failures: InducedFailures,
    response_delay: Option<Duration>,
}

impl BackendState {
    fn allocate_id(&mut self) -> i32 {
        self.id_counter += 1;
        self.id_counter
    }
}

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct CoupleData {
    activities: Vec<Activity>,
    books: Vec<Book>,
    movies: Vec<Movie>,
    blog_entries: Vec<BlogEntry>,
    events: Vec<CalendarEvent>,
    goals: Vec<Goal>,
    photos: Vec<Photo>,
    progress: Vec<ChallengeProgress>,
    badges: BadgeState,
}

// ----------------------------------------------------------------------
// Shared handler plumbing
// ----------------------------------------------------------------------

fn detail(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "detail": message })))
}

/// The couple code a scoped request is stamped with.
fn scope(headers: &HeaderMap) -> Result<CoupleCode, Rejection> {
    let raw = headers
        .get(COUPLE_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| detail(StatusCode::BAD_REQUEST, "couple code required"))?;
    CoupleCode::parse(raw).map_err(|_| detail(StatusCode::BAD_REQUEST, "invalid couple code"))
}

/// The email behind the bearer token, or a 401 the way FastAPI phrases it.
fn authed_email(state: &BackendState, headers: &HeaderMap) -> Result<String, Rejection> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

// ----------------------------------------------------------------------
// Accounts
// ----------------------------------------------------------------------

async fn register(State(state): State<Shared>, Json(new_user): Json<NewUser>) -> ApiResult<User> {
    let mut state = state.lock().unwrap();
    if state
        .users
        .iter()
        .any(|stored| stored.user.email == new_user.email)
    {
        return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let id = state.allocate_id();
    let user = User {
        id: UserId::new(id),
        email: new_user.email,
        display_name: new_user.display_name,
        profile_pic: None,
        couple_code: new_user.couple_code,
        created_at: Utc::now(),
    };
    state.users.push(StoredUser {
        user: user.clone(),
        password: new_user.password,
    });
    Ok(Json(user))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(
    State(state): State<Shared>,
    Form(form): Form<LoginForm>,
) -> ApiResult<LoginResponse> {
    let mut state = state.lock().unwrap();
    let Some(user) = state
        .users
        .iter()
        .find(|stored| stored.user.email == form.username && stored.password == form.password)
        .map(|stored| stored.user.clone())
    else {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Incorrect email or password",
        ));
    };
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user.email.clone());
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_owned(),
        user,
    }))
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<User> {
    let state = state.lock().unwrap();
    let email = authed_email(&state, &headers)?;
    let user = state
        .users
        .iter()
        .find(|stored| stored.user.email == email)
        .map(|stored| stored.user.clone())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(user))
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<User> {
    let mut state = state.lock().unwrap();
    let email = authed_email(&state, &headers)?;
    let Some(stored) = state
        .users
        .iter_mut()
        .find(|stored| stored.user.email == email)
    else {
        return Err(detail(StatusCode::NOT_FOUND, "User not found"));
    };
    if let Some(name) = update.display_name {
        stored.user.display_name = Some(name);
    }
    if let Some(pic) = update.profile_pic {
        stored.user.profile_pic = Some(pic);
    }
    if let Some(code) = update.couple_code {
        stored.user.couple_code = Some(code);
    }
    Ok(Json(stored.user.clone()))
}

// ----------------------------------------------------------------------
// Couple linkage
// ----------------------------------------------------------------------

async fn couple_code(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<CoupleLink> {
    let state = state.lock().unwrap();
    let email = authed_email(&state, &headers)?;
    let code = state
        .users
        .iter()
        .find(|stored| stored.user.email == email)
        .and_then(|stored| stored.user.couple_code.clone());
    Ok(Json(CoupleLink { code }))
}

async fn couple_link(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(link): Json<CoupleLink>,
) -> ApiResult<CoupleLink> {
    let mut state = state.lock().unwrap();
    let email = authed_email(&state, &headers)?;
    let Some(code) = link.code else {
        return Err(detail(StatusCode::BAD_REQUEST, "couple code required"));
    };
    let Some(stored) = state
        .users
        .iter_mut()
        .find(|stored| stored.user.email == email)
    else {
        return Err(detail(StatusCode::NOT_FOUND, "User not found"));
    };
    stored.user.couple_code = Some(code.clone());
    Ok(Json(CoupleLink { code: Some(code) }))
}

// ----------------------------------------------------------------------
// Activities
// ----------------------------------------------------------------------

#[derive(Default, Deserialize)]
struct ActivityQuery {
    category: Option<Category>,
    difficulty: Option<Difficulty>,
    cost: Option<Cost>,
    season: Option<Season>,
}

impl ActivityQuery {
    fn matches(&self, activity: &Activity) -> bool {
        self.category.is_none_or(|c| activity.category == c)
            && self.difficulty.is_none_or(|d| activity.difficulty == d)
            && self.cost.is_none_or(|c| activity.cost == c)
            && self.season.is_none_or(|s| activity.season == Some(s))
    }
}

async fn list_activities(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(filter): Query<ActivityQuery>,
) -> ApiResult<Vec<Activity>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| {
            couple
                .activities
                .iter()
                .filter(|activity| filter.matches(activity))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_activity(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewActivity>,
) -> ApiResult<Activity> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let activity = Activity {
        id: ActivityId::new(id),
        title: new.title,
        description: new.description,
        status: new.status,
        category: new.category,
        difficulty: new.difficulty,
        duration: new.duration,
        cost: new.cost,
        season: new.season,
        mood: new.mood,
        created_at: Utc::now(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .activities
        .push(activity.clone());
    Ok(Json(activity))
}

async fn update_activity(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(update): Json<ActivityUpdate>,
) -> ApiResult<Activity> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(activity) = couple
        .activities
        .iter_mut()
        .find(|activity| activity.id == ActivityId::new(id))
    else {
        return Err(detail(StatusCode::NOT_FOUND, "Activity not found"));
    };
    // Rating, notes and completion time are accepted but not part of the
    // response model, matching the production backend.
    activity.status = update.status;
    if let Some(mood) = update.mood {
        activity.mood = Some(mood);
    }
    Ok(Json(activity.clone()))
}

// ----------------------------------------------------------------------
// Library
// ----------------------------------------------------------------------

async fn list_books(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<Book>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.books.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewBook>,
) -> ApiResult<Book> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let book = Book {
        id: BookId::new(id),
        title: new.title,
        author: new.author,
        status: new.status,
        review: new.review,
        rating: new.rating,
        created_at: Utc::now(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .books
        .push(book.clone());
    Ok(Json(book))
}

async fn update_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(update): Json<BookUpdate>,
) -> ApiResult<Book> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(book) = couple
        .books
        .iter_mut()
        .find(|book| book.id == BookId::new(id))
    else {
        return Err(detail(StatusCode::NOT_FOUND, "Book not found"));
    };
    book.status = update.status;
    if let Some(review) = update.review {
        book.review = Some(review);
    }
    if let Some(rating) = update.rating {
        book.rating = Some(rating);
    }
    Ok(Json(book.clone()))
}

async fn list_movies(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<Movie>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.movies.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_movie(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewMovie>,
) -> ApiResult<Movie> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let movie = Movie {
        id: MovieId::new(id),
        title: new.title,
        genre: new.genre,
        status: new.status,
        review: new.review,
        rating: new.rating,
        created_at: Utc::now(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .movies
        .push(movie.clone());
    Ok(Json(movie))
}

async fn update_movie(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(update): Json<MovieUpdate>,
) -> ApiResult<Movie> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(movie) = couple
        .movies
        .iter_mut()
        .find(|movie| movie.id == MovieId::new(id))
    else {
        return Err(detail(StatusCode::NOT_FOUND, "Movie not found"));
    };
    movie.status = update.status;
    if let Some(review) = update.review {
        movie.review = Some(review);
    }
    if let Some(rating) = update.rating {
        movie.rating = Some(rating);
    }
    Ok(Json(movie.clone()))
}

// ----------------------------------------------------------------------
// Journal
// ----------------------------------------------------------------------

async fn list_blog_entries(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> ApiResult<Vec<BlogEntry>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.blog_entries.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_blog_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewBlogEntry>,
) -> ApiResult<BlogEntry> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let entry = BlogEntry {
        id: BlogEntryId::new(id),
        title: new.title,
        content: new.content,
        mood: new.mood,
        created_at: Utc::now(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .blog_entries
        .push(entry.clone());
    Ok(Json(entry))
}

// ----------------------------------------------------------------------
// Calendar
// ----------------------------------------------------------------------

async fn list_events(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> ApiResult<Vec<CalendarEvent>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.events.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_event(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewCalendarEvent>,
) -> ApiResult<CalendarEvent> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let event = CalendarEvent {
        id: CalendarEventId::new(id),
        title: new.title,
        description: new.description,
        start_time: new.start_time,
        end_time: new.end_time,
        all_day: new.all_day,
        location: new.location,
        event_type: new.event_type,
        recurrence: new.recurrence,
        color: new.color,
        reminder: new.reminder,
        shared: new.shared,
        activity_id: new.activity_id,
        created_at: Utc::now(),
        created_by: None,
        couple_code: code.clone(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .events
        .push(event.clone());
    Ok(Json(event))
}

async fn update_event(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(update): Json<CalendarEventUpdate>,
) -> ApiResult<CalendarEvent> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(event) = couple
        .events
        .iter_mut()
        .find(|event| event.id == CalendarEventId::new(id))
    else {
        return Err(detail(StatusCode::NOT_FOUND, "Event not found"));
    };
    if let Some(title) = update.title {
        event.title = title;
    }
    if let Some(description) = update.description {
        event.description = Some(description);
    }
    if let Some(start_time) = update.start_time {
        event.start_time = start_time;
    }
    if let Some(end_time) = update.end_time {
        event.end_time = Some(end_time);
    }
    if let Some(all_day) = update.all_day {
        event.all_day = all_day;
    }
    if let Some(location) = update.location {
        event.location = Some(location);
    }
    if let Some(event_type) = update.event_type {
        event.event_type = Some(event_type);
    }
    if let Some(recurrence) = update.recurrence {
        event.recurrence = Some(recurrence);
    }
    if let Some(color) = update.color {
        event.color = Some(color);
    }
    if let Some(reminder) = update.reminder {
        event.reminder = Some(reminder);
    }
    if let Some(shared) = update.shared {
        event.shared = shared;
    }
    if let Some(activity_id) = update.activity_id {
        event.activity_id = Some(activity_id);
    }
    Ok(Json(event.clone()))
}

async fn delete_event(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<StatusCode, Rejection> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let before = couple.events.len();
    couple
        .events
        .retain(|event| event.id != CalendarEventId::new(id));
    if couple.events.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Event not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Goals
// ----------------------------------------------------------------------

async fn list_goals(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<Goal>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.goals.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn create_goal(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(new): Json<NewGoal>,
) -> ApiResult<Goal> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let goal = Goal {
        id: GoalId::new(id),
        title: new.title,
        description: new.description,
        target_date: new.target_date,
        priority: new.priority,
        category: new.category,
        completed: false,
        created_by: None,
        created_at: Utc::now(),
        completed_at: None,
        couple_code: code.clone(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .goals
        .push(goal.clone());
    Ok(Json(goal))
}

async fn update_goal(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Goal> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(goal) = couple
        .goals
        .iter_mut()
        .find(|goal| goal.id == GoalId::new(id))
    else {
        return Err(detail(StatusCode::NOT_FOUND, "Goal not found"));
    };
    if let Some(title) = update.title {
        goal.title = title;
    }
    if let Some(description) = update.description {
        goal.description = Some(description);
    }
    if let Some(target_date) = update.target_date {
        goal.target_date = Some(target_date);
    }
    if let Some(priority) = update.priority {
        goal.priority = Some(priority);
    }
    if let Some(category) = update.category {
        goal.category = Some(category);
    }
    if let Some(completed) = update.completed {
        goal.completed = completed;
        goal.completed_at = completed.then(Utc::now);
    }
    Ok(Json(goal.clone()))
}

async fn delete_goal(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<StatusCode, Rejection> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let before = couple.goals.len();
    couple.goals.retain(|goal| goal.id != GoalId::new(id));
    if couple.goals.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Goal not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Challenges
// ----------------------------------------------------------------------

async fn list_challenges(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> ApiResult<Vec<ChallengeWithProgress>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let progress = state
        .couples
        .get(&code)
        .map(|couple| couple.progress.clone())
        .unwrap_or_default();
    let rows = state
        .challenges
        .iter()
        .map(|challenge| {
            let record = progress
                .iter()
                .find(|record| record.challenge_id == challenge.id);
            ChallengeWithProgress {
                challenge: challenge.clone(),
                started: record.is_some(),
                completed: record.is_some_and(|record| record.completed_at.is_some()),
                started_at: record.map(|record| record.started_at),
                completed_at: record.and_then(|record| record.completed_at),
            }
        })
        .collect();
    Ok(Json(rows))
}

async fn start_challenge(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> ApiResult<ChallengeProgress> {
    let code = scope(&headers)?;
    let challenge_id = ChallengeId::new(id);
    let mut state = state.lock().unwrap();
    if !state
        .challenges
        .iter()
        .any(|challenge| challenge.id == challenge_id)
    {
        return Err(detail(StatusCode::NOT_FOUND, "Challenge not found"));
    }
    let started = state.couples.get(&code).is_some_and(|couple| {
        couple
            .progress
            .iter()
            .any(|record| record.challenge_id == challenge_id)
    });
    if started {
        return Err(detail(StatusCode::BAD_REQUEST, "Challenge already started"));
    }
    let progress_id = state.allocate_id();
    let record = ChallengeProgress {
        id: ChallengeProgressId::new(progress_id),
        challenge_id,
        couple_code: code.clone(),
        started_at: Utc::now(),
        completed_at: None,
        progress_data: None,
    };
    state
        .couples
        .entry(code)
        .or_default()
        .progress
        .push(record.clone());
    Ok(Json(record))
}

async fn complete_challenge(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(completion): Json<ChallengeCompletion>,
) -> ApiResult<ChallengeProgress> {
    let code = scope(&headers)?;
    let challenge_id = ChallengeId::new(id);
    let mut state = state.lock().unwrap();
    let couple = state.couples.entry(code).or_default();
    let Some(record) = couple
        .progress
        .iter_mut()
        .find(|record| record.challenge_id == challenge_id)
    else {
        return Err(detail(StatusCode::BAD_REQUEST, "Challenge not started"));
    };
    if record.completed_at.is_some() {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Challenge already completed",
        ));
    }
    record.completed_at = Some(Utc::now());
    record.progress_data = completion.data;
    Ok(Json(record.clone()))
}

// ----------------------------------------------------------------------
// Photos
// ----------------------------------------------------------------------

async fn list_photos(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<Photo>> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let rows = state
        .couples
        .get(&code)
        .map(|couple| couple.photos.clone())
        .unwrap_or_default();
    Ok(Json(rows))
}

async fn upload_photo(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Photo> {
    let code = scope(&headers)?;
    let mut file_name = None;
    let mut activity_id = None;
    let mut blog_entry_id = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| detail(StatusCode::BAD_REQUEST, "malformed multipart body"))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(str::to_owned);
                // Body is drained and dropped; only the name is kept.
                let _ = field
                    .bytes()
                    .await
                    .map_err(|_| detail(StatusCode::BAD_REQUEST, "unreadable file part"))?;
            }
            Some("activity_id") => {
                activity_id = field.text().await.ok().and_then(|raw| raw.parse::<i32>().ok());
            }
            Some("blog_entry_id") => {
                blog_entry_id = field.text().await.ok().and_then(|raw| raw.parse::<i32>().ok());
            }
            _ => {}
        }
    }
    let Some(file_name) = file_name else {
        return Err(detail(StatusCode::BAD_REQUEST, "file part required"));
    };
    let mut state = state.lock().unwrap();
    let id = state.allocate_id();
    let photo = Photo {
        id: PhotoId::new(id),
        file_path: format!("/uploads/{file_name}"),
        activity_id: activity_id.map(ActivityId::new),
        blog_entry_id: blog_entry_id.map(BlogEntryId::new),
        couple_code: code.clone(),
        uploaded_at: Utc::now(),
    };
    state
        .couples
        .entry(code)
        .or_default()
        .photos
        .push(photo.clone());
    Ok(Json(photo))
}

// ----------------------------------------------------------------------
// Badges
// ----------------------------------------------------------------------

async fn badge_catalog() -> Json<Vec<String>> {
    Json(BADGE_KEYS.iter().map(|key| (*key).to_owned()).collect())
}

async fn badge_progress(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<BadgeState> {
    let code = scope(&headers)?;
    let state = state.lock().unwrap();
    let badges = state
        .couples
        .get(&code)
        .map(|couple| couple.badges.clone())
        .unwrap_or_default();
    Ok(Json(badges))
}

/// The server is a dumb store here: a flush replaces the whole map. The
/// client's union merge is what protects earned badges.
async fn update_badge_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(badges): Json<BadgeState>,
) -> ApiResult<BadgeState> {
    let code = scope(&headers)?;
    let mut state = state.lock().unwrap();
    state.couples.entry(code).or_default().badges = badges.clone();
    Ok(Json(badges))
}

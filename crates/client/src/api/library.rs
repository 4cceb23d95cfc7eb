//! Shared library endpoints: books and movies.

use tracing::instrument;

use tandem_core::{Book, BookId, BookUpdate, Movie, MovieId, MovieUpdate, NewBook, NewMovie};

use super::{ApiClient, ApiError, Fetched};

// ───────────────────────────── Books ─────────────────────────────

impl ApiClient {
    /// The couple's reading list.
    #[instrument(skip(self))]
    pub async fn list_books(&self) -> Result<Fetched<Vec<Book>>, ApiError> {
        self.get_scoped("books/").await
    }

    /// Add a book to the list.
    #[instrument(skip(self, book))]
    pub async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError> {
        self.post_scoped("books/", book).await
    }

    /// Move a book along its status, optionally attaching a review and
    /// rating once finished.
    #[instrument(skip(self, update), fields(book_id = %id))]
    pub async fn update_book(&self, id: BookId, update: &BookUpdate) -> Result<Book, ApiError> {
        self.patch_scoped(&format!("books/{id}"), update).await
    }
}

// ───────────────────────────── Movies ─────────────────────────────

impl ApiClient {
    /// The couple's watch list.
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Fetched<Vec<Movie>>, ApiError> {
        self.get_scoped("movies/").await
    }

    /// Add a movie to the list.
    #[instrument(skip(self, movie))]
    pub async fn create_movie(&self, movie: &NewMovie) -> Result<Movie, ApiError> {
        self.post_scoped("movies/", movie).await
    }

    /// Mark a movie watched or attach a review and rating.
    #[instrument(skip(self, update), fields(movie_id = %id))]
    pub async fn update_movie(&self, id: MovieId, update: &MovieUpdate) -> Result<Movie, ApiError> {
        self.patch_scoped(&format!("movies/{id}"), update).await
    }
}

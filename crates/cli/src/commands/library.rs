//! Reading-list and watch-list commands.

use tandem_core::{
    BookId, BookStatus, BookUpdate, MovieId, MovieStatus, MovieUpdate, NewBook, NewMovie,
};

use super::{connect, note_cached, require_paired};

fn rating_suffix(rating: Option<i32>) -> String {
    rating.map_or_else(String::new, |stars| format!("  rated {stars}/5"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Books
// ─────────────────────────────────────────────────────────────────────────────

/// List the shared reading list.
#[allow(clippy::print_stdout)]
pub async fn books_list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "books list").await?;

    let fetched = client.list_books().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No books on the list yet.");
        return Ok(());
    }
    for book in &fetched.value {
        println!(
            "{:>4}  {:<9}  {} by {}{}",
            book.id,
            book.status,
            book.title,
            book.author,
            rating_suffix(book.rating),
        );
    }
    Ok(())
}

/// Add a book to the reading list.
#[allow(clippy::print_stdout)]
pub async fn books_add(title: &str, author: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "books add").await?;

    let new_book = NewBook {
        title: title.to_owned(),
        author: author.to_owned(),
        status: BookStatus::ToRead,
        review: None,
        rating: None,
    };
    let book = client.create_book(&new_book).await?;
    println!("Added book {}: {} by {}", book.id, book.title, book.author);
    Ok(())
}

/// Update reading progress on a book.
#[allow(clippy::print_stdout)]
pub async fn books_update(
    id: i32,
    status: BookStatus,
    rating: Option<i32>,
    review: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "books update").await?;

    let update = BookUpdate {
        status,
        review,
        rating,
    };
    let book = client.update_book(BookId::new(id), &update).await?;
    println!("Updated {}: now {}", book.title, book.status);
    if book.status == BookStatus::Completed {
        println!("Run `tandem badges sync` to refresh achievements.");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Movies
// ─────────────────────────────────────────────────────────────────────────────

/// List the shared watch list.
#[allow(clippy::print_stdout)]
pub async fn movies_list() -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "movies list").await?;

    let fetched = client.list_movies().await?;
    note_cached(&fetched);

    if fetched.value.is_empty() {
        println!("No movies on the list yet.");
        return Ok(());
    }
    for movie in &fetched.value {
        println!(
            "{:>4}  {:<9}  {} ({}){}",
            movie.id,
            movie.status,
            movie.title,
            movie.genre,
            rating_suffix(movie.rating),
        );
    }
    Ok(())
}

/// Add a movie to the watch list.
#[allow(clippy::print_stdout)]
pub async fn movies_add(title: &str, genre: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "movies add").await?;

    let new_movie = NewMovie {
        title: title.to_owned(),
        genre: genre.to_owned(),
        status: MovieStatus::ToWatch,
        review: None,
        rating: None,
    };
    let movie = client.create_movie(&new_movie).await?;
    println!("Added movie {}: {}", movie.id, movie.title);
    Ok(())
}

/// Update watch progress on a movie.
#[allow(clippy::print_stdout)]
pub async fn movies_update(
    id: i32,
    status: MovieStatus,
    rating: Option<i32>,
    review: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = connect()?;
    require_paired(client.store(), "movies update").await?;

    let update = MovieUpdate {
        status,
        review,
        rating,
    };
    let movie = client.update_movie(MovieId::new(id), &update).await?;
    println!("Updated {}: now {}", movie.title, movie.status);
    if movie.status == MovieStatus::Watched {
        println!("Run `tandem badges sync` to refresh achievements.");
    }
    Ok(())
}

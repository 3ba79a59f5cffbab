//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookAvailability, BookDetails, BookIn},
        lend::BookLendHistory,
    },
};

use super::AuthenticatedUser;

/// Search query string
#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive substring to match
    pub q: String,
}

/// Add a book under the caller's publisher
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookIn,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "No publisher registered for this user")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<BookIn>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let caller = auth.user_id()?;
    let book = state.services.books.create(caller, request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List the live catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.get_all().await?;
    Ok(Json(books))
}

/// Availability report: shelf copies and active loans per book
#[utoipa::path(
    get,
    path = "/books/availability",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Availability per book", body = Vec<BookAvailability>)
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<BookAvailability>>> {
    let report = state.services.books.availability().await?;
    Ok(Json(report))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/books/search/title",
    tag = "books",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDetails>),
        (status = 404, description = "No matching book")
    )
)]
pub async fn search_by_title(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.search_by_title(&query.q).await?;
    Ok(Json(books))
}

/// Search books by author
#[utoipa::path(
    get,
    path = "/books/search/author",
    tag = "books",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDetails>),
        (status = 404, description = "No matching book")
    )
)]
pub async fn search_by_author(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.books.search_by_author(&query.q).await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book found", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.get_details(id).await?;
    Ok(Json(book))
}

/// Update a book owned by the caller's publisher
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookIn,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Book belongs to another publisher"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<BookIn>,
) -> AppResult<Json<Book>> {
    let caller = auth.user_id()?;
    let book = state.services.books.update(caller, id, request).await?;
    Ok(Json(book))
}

/// Remove a book from the catalog (soft delete)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book removed"),
        (status = 403, description = "Book belongs to another publisher"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let caller = auth.user_id()?;
    state.services.books.delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Full lend history of a book
#[utoipa::path(
    get,
    path = "/books/{id}/history",
    tag = "lends",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book lend history", body = BookLendHistory),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_history(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookLendHistory>> {
    let history = state.services.lends.book_history(id).await?;
    Ok(Json(history))
}

//! Lend transaction endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::lend::{CreateLend, LendTransaction, ReturnBook},
};

use super::AuthenticatedUser;

/// Return confirmation with the closed transaction
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Confirmation message naming the returned book
    pub message: String,
    /// The closed lend transaction
    pub lend: LendTransaction,
}

/// Borrow a book for the calling user
#[utoipa::path(
    post,
    path = "/lends",
    tag = "lends",
    security(("bearer_auth" = [])),
    request_body = CreateLend,
    responses(
        (status = 201, description = "Lend created", body = LendTransaction),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Out of stock or duplicate active loan")
    )
)]
pub async fn create_lend(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<CreateLend>,
) -> AppResult<(StatusCode, Json<LendTransaction>)> {
    let caller = auth.user_id()?;
    let lend = state.services.lends.create(caller, request).await?;
    Ok((StatusCode::CREATED, Json(lend)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/lends/return",
    tag = "lends",
    security(("bearer_auth" = [])),
    request_body = ReturnBook,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Book not found or no active loan"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<ReturnBook>,
) -> AppResult<Json<ReturnResponse>> {
    let caller = auth.user_id()?;
    let (lend, title) = state.services.lends.return_book(caller, request).await?;

    Ok(Json(ReturnResponse {
        message: format!("Returned '{}'", title),
        lend,
    }))
}

/// List the whole lend ledger
#[utoipa::path(
    get,
    path = "/lends",
    tag = "lends",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All lend transactions", body = Vec<LendTransaction>)
    )
)]
pub async fn list_lends(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<LendTransaction>>> {
    let lends = state.services.lends.get_all().await?;
    Ok(Json(lends))
}

/// Get a lend transaction by ID
#[utoipa::path(
    get,
    path = "/lends/{id}",
    tag = "lends",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Lend ID")
    ),
    responses(
        (status = 200, description = "Lend found", body = LendTransaction),
        (status = 404, description = "Lend not found")
    )
)]
pub async fn get_lend(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LendTransaction>> {
    let lend = state.services.lends.get_by_id(id).await?;
    Ok(Json(lend))
}

/// Remove a ledger entry; inventory is not adjusted
#[utoipa::path(
    delete,
    path = "/lends/{id}",
    tag = "lends",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Lend ID")
    ),
    responses(
        (status = 204, description = "Lend deleted"),
        (status = 404, description = "Lend not found")
    )
)]
pub async fn delete_lend(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.lends.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

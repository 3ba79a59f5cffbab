//! Publisher endpoints
//!
//! A user owns at most one publisher; update and delete always target
//! the caller's own publisher.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::publisher::{Publisher, PublisherIn},
};

use super::AuthenticatedUser;

/// Register a publisher for the calling user
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body = PublisherIn,
    responses(
        (status = 201, description = "Publisher created", body = Publisher),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "User already has a publisher")
    )
)]
pub async fn create_publisher(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<PublisherIn>,
) -> AppResult<(StatusCode, Json<Publisher>)> {
    let caller = auth.user_id()?;
    let publisher = state.services.publishers.create(caller, request).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

/// List all publishers
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All publishers", body = Vec<Publisher>)
    )
)]
pub async fn list_publishers(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<Publisher>>> {
    let publishers = state.services.publishers.get_all().await?;
    Ok(Json(publishers))
}

/// Get a publisher by ID
#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Publisher ID")
    ),
    responses(
        (status = 200, description = "Publisher found", body = Publisher),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn get_publisher(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Publisher>> {
    let publisher = state.services.publishers.get_by_id(id).await?;
    Ok(Json(publisher))
}

/// Update the calling user's publisher
#[utoipa::path(
    put,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body = PublisherIn,
    responses(
        (status = 200, description = "Publisher updated", body = Publisher),
        (status = 404, description = "No publisher registered for this user")
    )
)]
pub async fn update_publisher(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<PublisherIn>,
) -> AppResult<Json<Publisher>> {
    let caller = auth.user_id()?;
    let publisher = state.services.publishers.update_own(caller, request).await?;
    Ok(Json(publisher))
}

/// Delete the calling user's publisher
#[utoipa::path(
    delete,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Publisher deleted"),
        (status = 404, description = "No publisher registered for this user"),
        (status = 409, description = "Publisher still has books")
    )
)]
pub async fn delete_publisher(
    State(state): State<crate::AppState>,
    auth: AuthenticatedUser,
) -> AppResult<StatusCode> {
    let caller = auth.user_id()?;
    state.services.publishers.delete_own(caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

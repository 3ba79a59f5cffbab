//! Statistics endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::stats::{CategoryMonthlyStat, MonthlyBorrowCount, TopBorrowedBook, YearSummary},
};

use super::AuthenticatedUser;

/// Ten most borrowed books
#[utoipa::path(
    get,
    path = "/stats/top-borrowed",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Top borrowed books", body = Vec<TopBorrowedBook>)
    )
)]
pub async fn top_borrowed(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<TopBorrowedBook>>> {
    let report = state.services.stats.top_borrowed().await?;
    Ok(Json(report))
}

/// Borrow counts per calendar month, all years collapsed
#[utoipa::path(
    get,
    path = "/stats/monthly-borrowed",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrow counts per month name", body = Vec<MonthlyBorrowCount>)
    )
)]
pub async fn monthly_borrowed(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<MonthlyBorrowCount>>> {
    let report = state.services.stats.monthly_borrowed().await?;
    Ok(Json(report))
}

/// Lending summary for one calendar year
#[utoipa::path(
    get,
    path = "/stats/yearly-summary/{year}",
    tag = "stats",
    security(("bearer_auth" = [])),
    params(
        ("year" = i32, Path, description = "Calendar year")
    ),
    responses(
        (status = 200, description = "Year summary", body = YearSummary),
        (status = 404, description = "No lending activity that year")
    )
)]
pub async fn yearly_summary(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
    Path(year): Path<i32>,
) -> AppResult<Json<YearSummary>> {
    let summary = state.services.stats.year_summary(year).await?;
    Ok(Json(summary))
}

/// Average borrows per active day, per month and category
#[utoipa::path(
    get,
    path = "/stats/category-monthly-average",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-category monthly averages", body = Vec<CategoryMonthlyStat>)
    )
)]
pub async fn category_monthly_average(
    State(state): State<crate::AppState>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<CategoryMonthlyStat>>> {
    let report = state.services.stats.category_monthly_average().await?;
    Ok(Json(report))
}

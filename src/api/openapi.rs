//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, lends, publishers, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Librarium API",
        version = "1.0.0",
        description = "Library lending backend REST API"
    ),
    paths(
        // Health
        health::health_check,
        // Users
        users::register,
        users::login,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::get_user_history,
        // Publishers
        publishers::create_publisher,
        publishers::list_publishers,
        publishers::get_publisher,
        publishers::update_publisher,
        publishers::delete_publisher,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::get_availability,
        books::search_by_title,
        books::search_by_author,
        books::get_book_history,
        // Lends
        lends::create_lend,
        lends::return_book,
        lends::list_lends,
        lends::get_lend,
        lends::delete_lend,
        // Stats
        stats::top_borrowed,
        stats::monthly_borrowed,
        stats::yearly_summary,
        stats::category_monthly_average,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UserAuth,
            users::TokenResponse,
            // Publishers
            crate::models::publisher::Publisher,
            crate::models::publisher::PublisherSummary,
            crate::models::publisher::PublisherIn,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookSummary,
            crate::models::book::BookIn,
            crate::models::book::BookAvailability,
            // Lends
            crate::models::lend::LendStatus,
            crate::models::lend::LendTransaction,
            crate::models::lend::CreateLend,
            crate::models::lend::ReturnBook,
            crate::models::lend::BookHistoryEntry,
            crate::models::lend::BookLendHistory,
            crate::models::lend::UserHistoryEntry,
            crate::models::lend::UserLendHistory,
            lends::ReturnResponse,
            // Stats
            crate::models::stats::TopBorrowedBook,
            crate::models::stats::MonthlyBorrowCount,
            crate::models::stats::YearSummary,
            crate::models::stats::CategoryMonthlyStat,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User accounts and authentication"),
        (name = "publishers", description = "Publisher management"),
        (name = "books", description = "Catalog management"),
        (name = "lends", description = "Lend transactions and history"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

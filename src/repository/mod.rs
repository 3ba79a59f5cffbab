//! Repository layer for database operations

pub mod books;
pub mod lends;
pub mod publishers;
pub mod stats;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub publishers: publishers::PublishersRepository,
    pub books: books::BooksRepository,
    pub lends: lends::LendsRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        let books = books::BooksRepository::new(pool.clone());
        Self {
            users: users::UsersRepository::new(pool.clone()),
            publishers: publishers::PublishersRepository::new(pool.clone()),
            lends: lends::LendsRepository::new(pool.clone(), books.clone()),
            books,
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }
}

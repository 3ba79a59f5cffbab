//! Business logic services

pub mod books;
pub mod lends;
pub mod publishers;
pub mod stats;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub publishers: publishers::PublishersService,
    pub books: books::BooksService,
    pub lends: lends::LendsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            publishers: publishers::PublishersService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            lends: lends::LendsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }
}

//! Business logic services

pub mod borrows;
pub mod catalog;
pub mod stats;
pub mod users;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub borrows: borrows::BorrowsService,
    pub stats: stats::StatsService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            users: users::UsersService::new(repository),
        }
    }
}

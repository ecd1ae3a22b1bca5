//! Dashboard statistics service

use crate::{error::AppResult, models::stats::Stats, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Totals of users, books and loans
    pub async fn get(&self) -> AppResult<Stats> {
        let (users, books, loans) = tokio::try_join!(
            self.repository.users.count(),
            self.repository.books.count(),
            self.repository.loans.count(),
        )?;
        Ok(Stats::new(users, books, loans))
    }
}

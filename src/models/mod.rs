//! Data models for Biblio

pub mod book;
pub mod loan;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookDetails};
pub use loan::{Loan, LoanDetails};
pub use stats::Stats;
pub use user::User;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Normalized `(page, per_page, offset)` for list queries
pub fn paginate(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page, (page - 1) * per_page)
}

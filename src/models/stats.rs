//! Dashboard statistics

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Totals shown on the home dashboard, in chart-ready form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Stats {
    pub users: i64,
    pub books: i64,
    pub loans: i64,
    /// Chart labels, aligned with `data`
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl Stats {
    pub fn new(users: i64, books: i64, loans: i64) -> Self {
        Self {
            users,
            books,
            loans,
            labels: vec!["users".to_string(), "books".to_string(), "loans".to_string()],
            data: vec![users, books, loans],
        }
    }
}

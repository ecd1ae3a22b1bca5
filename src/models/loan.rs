//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{book::BookOption, user::UserOption};

/// Loan record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub loan_date: DateTime<Utc>,
    /// Set once the book is back
    pub return_date: Option<DateTime<Utc>>,
}

impl Loan {
    /// A return date may not precede the loan date
    pub fn check_dates(
        loan_date: DateTime<Utc>,
        return_date: Option<DateTime<Utc>>,
    ) -> Result<(), String> {
        match return_date {
            Some(returned) if returned < loan_date => Err(format!(
                "Return date {} is before loan date {}",
                returned, loan_date
            )),
            _ => Ok(()),
        }
    }
}

/// Loan with borrower and book information for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub book_id: Uuid,
    pub book_author: String,
    pub book_isbn: String,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

/// Loan list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    pub user_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    /// `true`: only loans not returned yet, `false`: only returned ones
    pub active: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create loan request. The loan date is always the creation time.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub return_date: Option<DateTime<Utc>>,
}

/// Update loan request. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub user_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub loan_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Choices offered when building a loan form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanFormOptions {
    pub users: Vec<UserOption>,
    pub books: Vec<BookOption>,
}

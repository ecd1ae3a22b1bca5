//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, LoanDetails, LoanQuery},
        paginate,
    },
};

const LOAN_COLUMNS: &str = "id, user_id, book_id, loan_date, return_date";

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.user_id, u.name AS user_name,
           l.book_id, b.author AS book_author, b.isbn AS book_isbn,
           l.loan_date, l.return_date,
           (l.return_date IS NOT NULL) AS is_returned
    FROM loans l
    JOIN users u ON l.user_id = u.id
    JOIN books b ON l.book_id = b.id
"#;

/// Filter shared by the count and select of `search`
const SEARCH_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR l.user_id = $1)
      AND ($2::uuid IS NULL OR l.book_id = $2)
      AND ($3::boolean IS NULL OR (l.return_date IS NULL) = $3)
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!("SELECT {} FROM loans WHERE id = $1", LOAN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan with user and book information
    pub async fn get_details(&self, id: Uuid) -> AppResult<LoanDetails> {
        sqlx::query_as::<_, LoanDetails>(&format!("{} WHERE l.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Search loans with pagination, newest first
    pub async fn search(&self, query: &LoanQuery) -> AppResult<(Vec<LoanDetails>, i64)> {
        let (_, per_page, offset) = paginate(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM loans l {}", SEARCH_FILTER))
            .bind(query.user_id)
            .bind(query.book_id)
            .bind(query.active)
            .fetch_one(&self.pool)
            .await?;

        let loans = sqlx::query_as::<_, LoanDetails>(&format!(
            "{} {} ORDER BY l.loan_date DESC LIMIT {} OFFSET {}",
            DETAILS_SELECT, SEARCH_FILTER, per_page, offset
        ))
        .bind(query.user_id)
        .bind(query.book_id)
        .bind(query.active)
        .fetch_all(&self.pool)
        .await?;

        Ok((loans, total))
    }

    /// Create a new loan starting at `loan_date`
    pub async fn create(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        loan_date: DateTime<Utc>,
        return_date: Option<DateTime<Utc>>,
    ) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (id, user_id, book_id, loan_date, return_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(book_id)
        .bind(loan_date)
        .bind(return_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(loan)
    }

    /// Replace every editable field of a loan
    pub async fn update(&self, loan: &Loan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(&format!(
            r#"
            UPDATE loans
            SET user_id = $1, book_id = $2, loan_date = $3, return_date = $4
            WHERE id = $5
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.return_date)
        .bind(loan.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan.id)))
    }

    /// Close an open loan. Fails with a conflict if it was already returned.
    pub async fn mark_returned(&self, id: Uuid, when: DateTime<Utc>) -> AppResult<Loan> {
        let updated = sqlx::query_as::<_, Loan>(&format!(
            r#"
            UPDATE loans SET return_date = GREATEST($1, loan_date)
            WHERE id = $2 AND return_date IS NULL
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(when)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(loan) => Ok(loan),
            None => {
                // Distinguish "no such loan" from "already returned"
                self.get_by_id(id).await?;
                Err(AppError::Conflict(format!("Loan {} has already been returned", id)))
            }
        }
    }

    /// Delete a loan
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

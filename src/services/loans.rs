//! Loan management service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanDetails, LoanFormOptions, LoanQuery, UpdateLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn search(&self, query: &LoanQuery) -> AppResult<(Vec<LoanDetails>, i64)> {
        self.repository.loans.search(query).await
    }

    pub async fn get_details(&self, id: Uuid) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id).await
    }

    /// Lend a book to a user, starting now
    pub async fn create(&self, data: CreateLoan) -> AppResult<LoanDetails> {
        self.check_references(data.user_id, data.book_id).await?;

        let now = Utc::now();
        Loan::check_dates(now, data.return_date).map_err(AppError::Validation)?;

        let loan = self
            .repository
            .loans
            .create(data.user_id, data.book_id, now, data.return_date)
            .await?;
        tracing::info!(loan_id = %loan.id, user_id = %loan.user_id, book_id = %loan.book_id, "Loan created");

        self.repository.loans.get_details(loan.id).await
    }

    pub async fn update(&self, id: Uuid, data: UpdateLoan) -> AppResult<LoanDetails> {
        let mut loan = self.repository.loans.get_by_id(id).await?;

        if let Some(user_id) = data.user_id {
            loan.user_id = user_id;
        }
        if let Some(book_id) = data.book_id {
            loan.book_id = book_id;
        }
        if let Some(loan_date) = data.loan_date {
            loan.loan_date = loan_date;
        }
        if data.return_date.is_some() {
            loan.return_date = data.return_date;
        }

        self.check_references(loan.user_id, loan.book_id).await?;
        Loan::check_dates(loan.loan_date, loan.return_date).map_err(AppError::Validation)?;

        self.repository.loans.update(&loan).await?;
        self.repository.loans.get_details(id).await
    }

    /// Record that the book came back
    pub async fn return_loan(&self, id: Uuid) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.mark_returned(id, Utc::now()).await?;
        tracing::info!(loan_id = %loan.id, "Loan returned");
        self.repository.loans.get_details(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.loans.delete(id).await
    }

    /// Users and books to choose from in a loan form
    pub async fn form_options(&self) -> AppResult<LoanFormOptions> {
        Ok(LoanFormOptions {
            users: self.repository.users.options().await?,
            books: self.repository.books.options().await?,
        })
    }

    async fn check_references(&self, user_id: Uuid, book_id: Uuid) -> AppResult<()> {
        if !self.repository.users.exists(user_id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
        }
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }
        Ok(())
    }
}

//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails, LoanFormOptions, LoanQuery, UpdateLoan},
};

use super::{ApiQuery, PaginatedLoans, PaginatedResponse};

/// List loans, newest first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "List of loans", body = PaginatedLoans)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<LoanQuery>,
) -> AppResult<Json<PaginatedLoans>> {
    let (loans, total) = state.services.loans.search(&query).await?;
    Ok(Json(PaginatedResponse::new(loans, total, query.page, query.per_page)))
}

/// Get loan details by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_details(id).await?;
    Ok(Json(loan))
}

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanDetails),
        (status = 400, description = "Return date before loan date"),
        (status = 404, description = "User or book not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    let loan = state.services.loans.create(data).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Update a loan
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanDetails),
        (status = 400, description = "Return date before loan date"),
        (status = 404, description = "Loan, user or book not found")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateLoan>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.update(id, data).await?;
    Ok(Json(loan))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Book returned", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.return_loan(id).await?;
    Ok(Json(loan))
}

/// Delete a loan
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.loans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Users and books available for a loan form
#[utoipa::path(
    get,
    path = "/loans/options",
    tag = "loans",
    responses(
        (status = 200, description = "Form choices", body = LoanFormOptions)
    )
)]
pub async fn form_options(State(state): State<crate::AppState>) -> AppResult<Json<LoanFormOptions>> {
    let options = state.services.loans.form_options().await?;
    Ok(Json(options))
}

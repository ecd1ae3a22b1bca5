//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::stats::Stats};

/// Totals of users, books and loans for the home dashboard
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard totals", body = Stats)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<Stats>> {
    let stats = state.services.stats.get().await?;
    Ok(Json(stats))
}

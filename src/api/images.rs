//! Image upload endpoints

use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

use super::ApiQuery;

/// Multipart field carrying the picture
pub const FILE_FIELD: &str = "file";

/// Resize options of an upload
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResizeParams {
    /// Target width in pixels (default: 256)
    pub width: Option<u32>,
}

/// Multipart upload body
#[derive(ToSchema)]
pub struct ImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DataUriResponse {
    /// `data:image;base64,...`
    pub data_uri: String,
}

/// Read the bytes of the `file` field of a multipart body
pub async fn read_file_field(mut multipart: Multipart) -> AppResult<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)));
        }
    }
    Err(AppError::BadRequest(format!("Missing '{}' field", FILE_FIELD)))
}

/// Resize an image and return it as a data URI, without storing it
#[utoipa::path(
    post,
    path = "/images/data-uri",
    tag = "images",
    params(ResizeParams),
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resized image", body = DataUriResponse),
        (status = 400, description = "Empty or undecodable image"),
        (status = 501, description = "Resizing not available on this server")
    )
)]
pub async fn convert_image(
    State(state): State<crate::AppState>,
    ApiQuery(params): ApiQuery<ResizeParams>,
    multipart: Multipart,
) -> AppResult<Json<DataUriResponse>> {
    let source = read_file_field(multipart).await?;
    let data_uri = state.services.images.to_data_uri(source, params.width).await?;
    Ok(Json(DataUriResponse { data_uri }))
}

/// Cover used for books without a photo
#[utoipa::path(
    get,
    path = "/images/placeholder",
    tag = "images",
    responses(
        (status = 200, description = "Placeholder cover", body = DataUriResponse)
    )
)]
pub async fn placeholder(State(state): State<crate::AppState>) -> Json<DataUriResponse> {
    Json(DataUriResponse {
        data_uri: state.services.images.placeholder().to_string(),
    })
}

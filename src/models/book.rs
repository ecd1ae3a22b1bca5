//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::images;

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    /// Author name(s)
    pub author: String,
    pub publisher: Option<String>,
    pub isbn: String,
    /// Cover picture as a `data:image;base64,...` URI
    pub photo: Option<String>,
}

/// Book with a cover that is always displayable
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: Uuid,
    pub author: String,
    pub publisher: Option<String>,
    pub isbn: String,
    /// Whether `cover` is an uploaded photo rather than the placeholder
    pub has_photo: bool,
    /// Data URI of the photo, or of the placeholder
    pub cover: String,
}

impl From<Book> for BookDetails {
    fn from(book: Book) -> Self {
        let has_photo = book.photo.as_deref().is_some_and(|p| !p.is_empty());
        let cover = images::cover_or_placeholder(book.photo.as_deref()).to_string();
        Self {
            id: book.id,
            author: book.author,
            publisher: book.publisher,
            isbn: book.isbn,
            has_photo,
            cover,
        }
    }
}

/// Book list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    #[validate(length(max = 255))]
    pub publisher: Option<String>,
    #[validate(length(min = 1, max = 32, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<String>,
}

/// Update book request. Missing fields are left unchanged; an empty
/// `publisher` clears it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(length(max = 255))]
    pub publisher: Option<String>,
    #[validate(length(min = 1, max = 32, message = "ISBN cannot be empty"))]
    pub isbn: Option<String>,
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<String>,
}

/// Book entry for pickers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookOption {
    pub id: Uuid,
    pub author: String,
}

fn validate_photo(photo: &str) -> Result<(), validator::ValidationError> {
    if photo.starts_with("data:image") {
        Ok(())
    } else {
        Err(validator::ValidationError::new("photo_not_data_uri"))
    }
}

//! Book catalog service

use axum::body::Bytes;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

use super::images::ImagesService;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    images: ImagesService,
}

impl BooksService {
    pub fn new(repository: Repository, images: ImagesService) -> Self {
        Self { repository, images }
    }

    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookDetails> {
        self.repository.books.get_by_id(id).await.map(BookDetails::from)
    }

    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(&data).await?;
        tracing::info!(book_id = %book.id, isbn = %book.isbn, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: Uuid, data: UpdateBook) -> AppResult<Book> {
        data.validate()?;
        self.repository.books.update(id, &data).await
    }

    /// Delete a book; refused while loans reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict(format!("Book {} still has loans", id)),
            other => other,
        })?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }

    /// Resize an uploaded picture and store it as the book's cover
    pub async fn upload_cover(&self, id: Uuid, source: Bytes, width: Option<u32>) -> AppResult<BookDetails> {
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        let data_uri = self.images.to_data_uri(source, width).await?;
        let book = self.repository.books.set_photo(id, Some(&data_uri)).await?;
        Ok(book.into())
    }

    /// Remove the cover; the placeholder is shown again
    pub async fn remove_cover(&self, id: Uuid) -> AppResult<BookDetails> {
        let book = self.repository.books.set_photo(id, None).await?;
        Ok(book.into())
    }
}

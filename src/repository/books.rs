//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookOption, BookQuery, CreateBook, UpdateBook},
        paginate,
    },
};

use super::contains_pattern;

const BOOK_COLUMNS: &str = "id, author, publisher, isbn, photo";

/// WHERE clause of a book search and the parameters it binds, in order
fn search_filter(query: &BookQuery) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(ref author) = query.author {
        params.push(contains_pattern(author));
        conditions.push(format!("LOWER(author) LIKE ${} ESCAPE '\\'", params.len()));
    }

    if let Some(ref isbn) = query.isbn {
        params.push(isbn.to_lowercase());
        conditions.push(format!("LOWER(isbn) = ${}", params.len()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), params)
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Search books with pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let (_, per_page, offset) = paginate(query.page, query.per_page);

        let (where_clause, params) = search_filter(query);

        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT {}
            FROM books
            {}
            ORDER BY author, isbn
            LIMIT {} OFFSET {}
            "#,
            BOOK_COLUMNS, where_clause, per_page, offset
        );
        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Create a new book
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, author, publisher, isbn, photo)
            VALUES ($1, $2, NULLIF($3, ''), $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&data.author)
        .bind(&data.publisher)
        .bind(&data.isbn)
        .bind(&data.photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Update the fields present in `data`
    pub async fn update(&self, id: Uuid, data: &UpdateBook) -> AppResult<Book> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.author, "author");
        if data.publisher.is_some() {
            sets.push(format!("publisher = NULLIF(${}, '')", idx));
            idx += 1;
        }
        add_field!(data.isbn, "isbn");
        add_field!(data.photo, "photo");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE books SET {} WHERE id = ${} RETURNING {}",
            sets.join(", "),
            idx,
            BOOK_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.author);
        bind_field!(data.publisher);
        bind_field!(data.isbn);
        bind_field!(data.photo);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Replace (or clear) the cover picture
    pub async fn set_photo(&self, id: Uuid, photo: Option<&str>) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET photo = $1 WHERE id = $2 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(photo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All books as picker entries, ordered by author
    pub async fn options(&self) -> AppResult<Vec<BookOption>> {
        let rows = sqlx::query_as::<_, BookOption>("SELECT id, author FROM books ORDER BY author")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

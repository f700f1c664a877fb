//! Books repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery},
};

const BOOK_DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.publish_date, b.isbn,
           a.name as author, c.name as category, p.name as publisher
    FROM books b
    JOIN authors a ON b.author_id = a.id
    JOIN categories c ON b.category_id = c.id
    JOIN publishers p ON b.publisher_id = p.id
"#;

fn details_from_row(row: &sqlx::postgres::PgRow) -> BookDetails {
    BookDetails {
        id: row.get("id"),
        title: row.get("title"),
        author: row.get("author"),
        category: row.get("category"),
        publisher: row.get("publisher"),
        publish_date: row.get("publish_date"),
        isbn: row.get("isbn"),
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

    /// Get book row by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book with resolved reference names
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let query = format!("{} WHERE b.id = $1", BOOK_DETAILS_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        Ok(details_from_row(&row))
    }

    /// Search books with optional substring search and category filter
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref search) = query.search {
            params.push(format!("%{}%", search.to_lowercase()));
            conditions.push(format!(
                "(LOWER(b.title) LIKE ${n} OR LOWER(a.name) LIKE ${n} OR LOWER(COALESCE(b.isbn, '')) LIKE ${n})",
                n = params.len()
            ));
        }

        if let Some(ref category) = query.category {
            params.push(category.clone());
            conditions.push(format!("c.name = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_query = format!(
            "{} {} ORDER BY b.title, b.id",
            BOOK_DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query(&select_query);
        for param in &params {
            builder = builder.bind(param);
        }
        let rows = builder.fetch_all(&self.pool).await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Most recently added books, by descending identifier
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<BookDetails>> {
        let query = format!("{} ORDER BY b.id DESC LIMIT $1", BOOK_DETAILS_SELECT);
        let rows = sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Create a new book with already-resolved reference ids
    pub async fn create(&self, book: &Book) -> AppResult<BookDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author_id, category_id, publisher_id, publish_date, isbn)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.category_id)
        .bind(book.publisher_id)
        .bind(book.publish_date)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Overwrite all fields of an existing book
    pub async fn update(&self, book: &Book) -> AppResult<BookDetails> {
        let updated = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, category_id = $3, publisher_id = $4,
                publish_date = $5, isbn = $6
            WHERE id = $7
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.category_id)
        .bind(book.publisher_id)
        .bind(book.publish_date)
        .bind(&book.isbn)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book.id
            )));
        }

        self.get_details(book.id).await
    }

    /// Delete a book. Its borrow records go with it through the schema
    /// cascade; records of other books are untouched.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

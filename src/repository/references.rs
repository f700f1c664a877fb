//! Reference-data repository: authors, categories, publishers
//!
//! Name resolution is an idempotent upsert (get-or-create); deletion is an
//! explicit transactional cascade into dependent books.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reference::{AuthorBookCount, Category, CategoryBookCount, Publisher},
};

#[derive(Clone)]
pub struct ReferencesRepository {
    pool: Pool<Postgres>,
}

impl ReferencesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Resolve a name in one of the reference tables, creating the row if
    /// absent. The no-op DO UPDATE makes RETURNING yield the id on both paths.
    async fn upsert_named(&self, table: &str, name: &str) -> AppResult<i32> {
        let query = format!(
            "INSERT INTO {table} (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id"
        );
        let id = sqlx::query_scalar::<_, i32>(&query)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn get_or_create_author(&self, name: &str) -> AppResult<i32> {
        self.upsert_named("authors", name).await
    }

    pub async fn get_or_create_category(&self, name: &str) -> AppResult<i32> {
        self.upsert_named("categories", name).await
    }

    pub async fn get_or_create_publisher(&self, name: &str) -> AppResult<i32> {
        self.upsert_named("publishers", name).await
    }

    /// Delete a reference row and every book depending on it, in one
    /// transaction. Returns the number of cascaded books.
    async fn delete_with_cascade(&self, table: &str, fk_column: &str, id: i32) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let books_query = format!("DELETE FROM books WHERE {fk_column} = $1");
        let books_deleted = sqlx::query(&books_query)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let ref_query = format!("DELETE FROM {table} WHERE id = $1");
        let deleted = sqlx::query(&ref_query)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "{} with id {} not found",
                table, id
            )));
        }

        tx.commit().await?;
        Ok(books_deleted)
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<u64> {
        self.delete_with_cascade("authors", "author_id", id).await
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<u64> {
        self.delete_with_cascade("categories", "category_id", id).await
    }

    pub async fn delete_publisher(&self, id: i32) -> AppResult<u64> {
        self.delete_with_cascade("publishers", "publisher_id", id).await
    }

    /// All authors with their book counts
    pub async fn list_authors(&self) -> AppResult<Vec<AuthorBookCount>> {
        let authors = sqlx::query_as::<_, AuthorBookCount>(
            r#"
            SELECT a.id, a.name, COUNT(b.id) as book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name
            ORDER BY a.name, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Top authors by number of books, ties broken by ascending id
    pub async fn top_authors(&self, limit: i64) -> AppResult<Vec<AuthorBookCount>> {
        let authors = sqlx::query_as::<_, AuthorBookCount>(
            r#"
            SELECT a.id, a.name, COUNT(b.id) as book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name
            ORDER BY book_count DESC, a.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Book counts for every category, empty categories included
    pub async fn category_counts(&self) -> AppResult<Vec<CategoryBookCount>> {
        let categories = sqlx::query_as::<_, CategoryBookCount>(
            r#"
            SELECT c.id, c.name, COUNT(b.id) as book_count
            FROM categories c
            LEFT JOIN books b ON b.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY book_count DESC, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn list_publishers(&self) -> AppResult<Vec<Publisher>> {
        let publishers =
            sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(publishers)
    }

    pub async fn count_authors(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_categories(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_publishers(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

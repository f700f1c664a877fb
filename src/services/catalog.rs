//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
        reference::{AuthorBookCount, Category, Publisher},
    },
    repository::Repository,
};

fn require_name(name: &str, what: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(format!("{} name must not be blank", what)));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID with resolved reference names
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// Create a new book, resolving author/category/publisher by name with
    /// get-or-create semantics
    pub async fn create_book(&self, request: CreateBook) -> AppResult<BookDetails> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        require_name(&request.title, "Title")?;
        require_name(&request.author, "Author")?;
        require_name(&request.category, "Category")?;
        require_name(&request.publisher, "Publisher")?;

        let author_id = self
            .repository
            .references
            .get_or_create_author(request.author.trim())
            .await?;
        let category_id = self
            .repository
            .references
            .get_or_create_category(request.category.trim())
            .await?;
        let publisher_id = self
            .repository
            .references
            .get_or_create_publisher(request.publisher.trim())
            .await?;

        let book = Book {
            id: 0,
            title: request.title,
            author_id,
            category_id,
            publisher_id,
            publish_date: request.publish_date,
            isbn: request.isbn,
        };

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Catalog: created book id={} \"{}\"", created.id, created.title);
        Ok(created)
    }

    /// Update a book in place; reference fields are re-pointed through the
    /// same get-or-create resolution
    pub async fn update_book(&self, id: i32, request: UpdateBook) -> AppResult<BookDetails> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut book = self.repository.books.get_by_id(id).await?;

        if let Some(title) = request.title {
            require_name(&title, "Title")?;
            book.title = title;
        }
        if let Some(author) = request.author {
            require_name(&author, "Author")?;
            book.author_id = self
                .repository
                .references
                .get_or_create_author(author.trim())
                .await?;
        }
        if let Some(category) = request.category {
            require_name(&category, "Category")?;
            book.category_id = self
                .repository
                .references
                .get_or_create_category(category.trim())
                .await?;
        }
        if let Some(publisher) = request.publisher {
            require_name(&publisher, "Publisher")?;
            book.publisher_id = self
                .repository
                .references
                .get_or_create_publisher(publisher.trim())
                .await?;
        }
        if request.publish_date.is_some() {
            book.publish_date = request.publish_date;
        }
        if request.isbn.is_some() {
            book.isbn = request.isbn;
        }

        self.repository.books.update(&book).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }

    /// List authors with their book counts
    pub async fn list_authors(&self) -> AppResult<Vec<AuthorBookCount>> {
        self.repository.references.list_authors().await
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.references.list_categories().await
    }

    pub async fn list_publishers(&self) -> AppResult<Vec<Publisher>> {
        self.repository.references.list_publishers().await
    }

    /// Delete an author and every book by that author
    pub async fn delete_author(&self, id: i32) -> AppResult<u64> {
        let cascaded = self.repository.references.delete_author(id).await?;
        tracing::info!("Catalog: deleted author id={} ({} books cascaded)", id, cascaded);
        Ok(cascaded)
    }

    /// Delete a category and every book in it
    pub async fn delete_category(&self, id: i32) -> AppResult<u64> {
        let cascaded = self.repository.references.delete_category(id).await?;
        tracing::info!("Catalog: deleted category id={} ({} books cascaded)", id, cascaded);
        Ok(cascaded)
    }

    /// Delete a publisher and every book it published
    pub async fn delete_publisher(&self, id: i32) -> AppResult<u64> {
        let cascaded = self.repository.references.delete_publisher(id).await?;
        tracing::info!("Catalog: deleted publisher id={} ({} books cascaded)", id, cascaded);
        Ok(cascaded)
    }
}

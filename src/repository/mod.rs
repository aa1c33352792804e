//! Repository layer for database operations

pub mod books;
pub mod copies;
pub mod groups;
pub mod requests;
pub mod students;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub groups: groups::GroupsRepository,
    pub students: students::StudentsRepository,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub requests: requests::RequestsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            groups: groups::GroupsRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            pool,
        }
    }
}

//! Book (title) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Language a book is written for. `Both` titles serve kz and ru groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "book_lang", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookLang {
    Kz,
    Ru,
    Both,
}

impl BookLang {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookLang::Kz => "kz",
            BookLang::Ru => "ru",
            BookLang::Both => "both",
        }
    }
}

impl std::fmt::Display for BookLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book model from database.
///
/// Availability is never stored on the book row; it is derived from the
/// copies owned by the book (see `BookSummary.available`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub year: i16,
    pub publisher: Option<String>,
    pub total_quantity: i32,
    pub language: BookLang,
    pub course: i16,
}

/// Book with its derived count of available copies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub year: i16,
    pub publisher: Option<String>,
    pub total_quantity: i32,
    pub language: BookLang,
    pub course: i16,
    /// Count of copies currently marked available
    pub available: i64,
}

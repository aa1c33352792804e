//! Data models for Kitaphana

pub mod book;
pub mod copy;
pub mod group;
pub mod request;
pub mod student;

// Re-export commonly used types
pub use book::{Book, BookLang, BookSummary};
pub use copy::BookCopy;
pub use group::{Group, GroupLang};
pub use request::{BookRequest, RequestDetails, RequestStatus};
pub use student::{Student, StudentWithGroup};

//! Catalog service: groups, eligible book lists and interactive search

use crate::{
    error::AppResult,
    lookup::{self, MAX_RESULTS},
    models::{BookSummary, Group, Student, StudentWithGroup},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all groups (form population)
    pub async fn list_groups(&self) -> AppResult<Vec<Group>> {
        self.repository.groups.list().await
    }

    /// List books a group may borrow that have at least one available copy
    pub async fn list_eligible_books(&self, group_id: i32) -> AppResult<Vec<BookSummary>> {
        let group = self.repository.groups.get_by_id(group_id).await?;
        let books = self.repository.books.list_for_group(&group).await?;

        Ok(books.into_iter().filter(|b| b.available > 0).collect())
    }

    /// List all students of a group
    pub async fn group_students(&self, group_id: i32) -> AppResult<Vec<Student>> {
        // Verify group exists
        self.repository.groups.get_by_id(group_id).await?;
        self.repository.students.list_by_group(group_id).await
    }

    /// Word-prefix search over student names, optionally narrowed to a
    /// group. A blank query returns nothing.
    pub async fn search_students(
        &self,
        query: &str,
        group_id: Option<i32>,
    ) -> AppResult<Vec<StudentWithGroup>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let students = self.repository.students.list_with_group(group_id).await?;

        Ok(students
            .into_iter()
            .filter(|s| lookup::matches_word_prefix(&s.full_name, query))
            .take(MAX_RESULTS)
            .collect())
    }

    /// Word-prefix search over titles and authors of the books a group may
    /// borrow
    pub async fn search_books(&self, query: &str, group_id: i32) -> AppResult<Vec<BookSummary>> {
        let group = self.repository.groups.get_by_id(group_id).await?;

        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let books = self.repository.books.list_for_group(&group).await?;

        Ok(books
            .into_iter()
            .filter(|b| {
                lookup::matches_word_prefix(&b.name, query)
                    || lookup::matches_word_prefix(&b.author, query)
            })
            .take(MAX_RESULTS)
            .collect())
    }
}

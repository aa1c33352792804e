//! Eligibility rules: which books a group is permitted to borrow

use crate::models::{BookLang, Group, GroupLang};

/// A book is eligible for a group when the course matches and the book is
/// written in the group's language (or marked for both languages).
///
/// Applied twice: when filtering the book list shown to a group, and again
/// at submission time, since the client-supplied book/group pairing is not
/// trusted.
pub fn is_eligible(book_language: BookLang, book_course: i16, group: &Group) -> bool {
    if book_course != group.course {
        return false;
    }

    match book_language {
        BookLang::Both => true,
        BookLang::Kz => group.language == GroupLang::Kz,
        BookLang::Ru => group.language == GroupLang::Ru,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(language: GroupLang, course: i16) -> Group {
        Group {
            id: 1,
            name: "АҚЖ-214".to_string(),
            language,
            course,
        }
    }

    #[test]
    fn test_matching_language_and_course() {
        let g = group(GroupLang::Kz, 1);
        assert!(is_eligible(BookLang::Kz, 1, &g));
    }

    #[test]
    fn test_wrong_course() {
        let g = group(GroupLang::Kz, 1);
        assert!(!is_eligible(BookLang::Kz, 2, &g));
    }

    #[test]
    fn test_wrong_language() {
        let g = group(GroupLang::Ru, 1);
        assert!(!is_eligible(BookLang::Kz, 1, &g));
    }

    #[test]
    fn test_both_languages_wildcard() {
        assert!(is_eligible(BookLang::Both, 2, &group(GroupLang::Kz, 2)));
        assert!(is_eligible(BookLang::Both, 2, &group(GroupLang::Ru, 2)));
    }

    #[test]
    fn test_both_still_requires_course() {
        assert!(!is_eligible(BookLang::Both, 1, &group(GroupLang::Ru, 2)));
    }
}

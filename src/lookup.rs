//! Word-prefix matching for interactive student and book search.
//!
//! The match runs in memory over rows already narrowed by a relational
//! query (group id, or book language/course). It is deliberately not a SQL
//! LIKE pattern: the query must match the *start of a word*, and fields are
//! split on punctuation (including «guillemets» and other locale quotation
//! marks), which a naive substring match cannot express.

/// Cap on interactive search result sets
pub const MAX_RESULTS: usize = 20;

/// True if any word of `text` starts with `query`, case-insensitively.
///
/// Words are maximal runs of alphanumeric characters; everything else
/// (whitespace, hyphens, quotation marks) separates words. An empty or
/// blank query matches nothing.
pub fn matches_word_prefix(text: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }

    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| word.to_lowercase().starts_with(&query))
}

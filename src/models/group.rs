//! Student group model and teaching-language enum

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Teaching language of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "group_lang", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GroupLang {
    Kz,
    Ru,
}

impl GroupLang {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupLang::Kz => "kz",
            GroupLang::Ru => "ru",
        }
    }
}

impl std::fmt::Display for GroupLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Group model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    pub id: i32,
    /// Group name, e.g. "АҚЖ-214"
    pub name: String,
    pub language: GroupLang,
    /// Course year, 1 or 2
    pub course: i16,
}

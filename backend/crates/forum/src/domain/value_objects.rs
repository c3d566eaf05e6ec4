//! Domain Value Objects
//!
//! Validated text fields of posts and comments. Every constructor trims its
//! input and rejects what is empty afterwards.

use serde::Serialize;
use std::fmt;

use crate::error::{ForumError, ForumResult};

/// Maximum title length in characters
pub const TITLE_MAX_LENGTH: usize = 200;

/// Maximum post/comment body length in characters
pub const BODY_MAX_LENGTH: usize = 10_000;

/// Maximum category length in characters
pub const CATEGORY_MAX_LENGTH: usize = 50;

fn validated(raw: String, field: &str, max: usize) -> ForumResult<String> {
    let value = raw.trim();

    if value.is_empty() {
        return Err(ForumError::Validation(format!("{} cannot be empty", field)));
    }

    if value.chars().count() > max {
        return Err(ForumError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }

    Ok(value.to_string())
}

/// Post title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(raw: impl Into<String>) -> ForumResult<Self> {
        validated(raw.into(), "Title", TITLE_MAX_LENGTH).map(Self)
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post or comment body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentBody(String);

impl ContentBody {
    pub fn new(raw: impl Into<String>) -> ForumResult<Self> {
        validated(raw.into(), "Body", BODY_MAX_LENGTH).map(Self)
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post category
///
/// Open set of labels; `"all"` is reserved for listing every category and
/// can never be stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const DEFAULT: &'static str = "general";
    pub const ALL: &'static str = "all";

    pub fn new(raw: impl Into<String>) -> ForumResult<Self> {
        let value = validated(raw.into(), "Category", CATEGORY_MAX_LENGTH)?;

        if value == Self::ALL {
            return Err(ForumError::Validation(format!(
                "\"{}\" is not a valid category",
                Self::ALL
            )));
        }

        Ok(Self(value))
    }

    /// Category used when a post names none
    pub fn general() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category selection for post listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every post
    All,
    /// Posts whose category equals this value exactly (case-sensitive)
    Only(String),
}

impl CategoryFilter {
    /// `None`, empty, and exactly `"all"` select every post; anything else
    /// is matched verbatim
    pub fn from_query(category: Option<&str>) -> Self {
        match category {
            None | Some("") => CategoryFilter::All,
            Some(Category::ALL) => CategoryFilter::All,
            Some(name) => CategoryFilter::Only(name.to_string()),
        }
    }

    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => category.as_str() == name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_validation() {
        assert_eq!(PostTitle::new("  Hello ").unwrap().as_str(), "Hello");
        assert!(matches!(
            PostTitle::new("   "),
            Err(ForumError::Validation(msg)) if msg == "Title cannot be empty"
        ));
        assert!(PostTitle::new("t".repeat(TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_body_validation() {
        assert!(ContentBody::new("\n\t").is_err());
        assert!(ContentBody::new("b".repeat(BODY_MAX_LENGTH)).is_ok());
        assert!(ContentBody::new("b".repeat(BODY_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_category_rejects_reserved_and_empty() {
        assert!(Category::new("all").is_err());
        assert!(Category::new(" all ").is_err());
        assert!(Category::new("").is_err());
        assert_eq!(Category::new("All").unwrap().as_str(), "All");
        assert_eq!(Category::general().as_str(), "general");
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(CategoryFilter::from_query(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_query(Some("all")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_query(Some("")), CategoryFilter::All);

        let cyber = CategoryFilter::from_query(Some("cyber"));
        assert!(cyber.matches(&Category::new("cyber").unwrap()));
        assert!(!cyber.matches(&Category::new("Cyber").unwrap()));
        assert!(!cyber.matches(&Category::general()));
        assert!(CategoryFilter::All.matches(&Category::general()));

        let padded = CategoryFilter::from_query(Some(" cyber "));
        assert_eq!(padded, CategoryFilter::Only(" cyber ".to_string()));
        assert!(!padded.matches(&Category::new("cyber").unwrap()));
        assert_eq!(
            CategoryFilter::from_query(Some(" all")),
            CategoryFilter::Only(" all".to_string())
        );
    }
}

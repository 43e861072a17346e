// src/models/theme.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'themes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Theme {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// Theme row annotated with the number of tests it groups.
#[derive(Debug, Serialize, FromRow)]
pub struct ThemeListItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub test_count: i64,
}

/// DTO for creating a theme. The slug is derived from the title.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThemeRequest {
    #[validate(length(
        min = 1,
        max = 256,
        message = "Theme title length must be between 1 and 256 characters."
    ))]
    pub title: String,
}

/// Derives a URL slug from a theme title: lowercase alphanumeric runs
/// joined by single hyphens, everything else dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

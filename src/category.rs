//! Centralized category normalization.
//!
//! Categories are open string values. Every entry point that accepts a
//! category runs it through [normalize] so the trimming and the default
//! label live in exactly one place.

/// The category assigned when the user leaves the field blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Categories that are always offered in the category drop-down, even with an
/// empty expense table.
pub const BUILT_IN_CATEGORIES: [&str; 6] = [
    "Other",
    "Food",
    "Travel",
    "Shopping",
    "Bills",
    "Entertainment",
];

/// Trim a raw category value, falling back to [DEFAULT_CATEGORY] when nothing
/// is left.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_owned()
    } else {
        trimmed.to_owned()
    }
}

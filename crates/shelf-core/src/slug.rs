//! Slug derivation.
//!
//! A slug is a lowercase, URL-safe token derived from a record's name. The
//! name is first transliterated to ASCII (`Émile` reads as `Emile`, `三体` as
//! `San Ti`), then ASCII letters, digits and `_` are kept, runs of whitespace
//! and `-` become a single `-`, and other punctuation is dropped.

use deunicode::deunicode;

/// Maximum slug length for books.
pub const BOOK_SLUG_MAX: usize = 64;

/// Maximum slug length for authors, publishers and tags.
pub const NAME_SLUG_MAX: usize = 32;

/// Derive a slug from a name without a length cap.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Derive a slug and cap it at `max` bytes without leaving a trailing `-`.
pub fn slugify_capped(name: &str, max: usize) -> String {
    let mut slug = slugify(name);
    if slug.len() > max {
        // Slugs are ASCII, so any byte index is a char boundary.
        slug.truncate(max);
        let trimmed = slug.trim_end_matches(['-', '_']).len();
        slug.truncate(trimmed);
    }
    slug
}

/// Slug for an author, publisher or tag name.
pub fn name_slug(name: &str) -> String {
    slugify_capped(name, NAME_SLUG_MAX)
}

/// Slug for a book: `<book name>-by-<author name>`.
pub fn book_slug(book_name: &str, author_name: &str) -> String {
    slugify_capped(&format!("{book_name}-by-{author_name}"), BOOK_SLUG_MAX)
}

//! Naming conventions: page filenames and URL slugs.
//!
//! ## Page Filenames
//!
//! Static pages follow the `NNN-name[.locale]` convention. The numeric prefix
//! orders the page in navigation; pages without one are rendered but hidden
//! from nav. An optional locale suffix marks a translated variant:
//!
//! - `010-products.md` → number=10, name="products", locale=None
//! - `030-contact.ru.md` → number=30, name="contact", locale=Some(Ru)
//! - `privacy.md` → number=None, name="privacy", locale=None
//!
//! ## Slugs
//!
//! Post slugs are derived from titles by [`generate_slug`]. A slug only ever
//! contains `[a-z0-9-]`, never starts or ends with a dash and never contains
//! two dashes in a row.

use crate::i18n::Locale;

/// Result of parsing a page file stem like `030-contact.ru`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `30` from `030-contact`)
    pub number: Option<u32>,
    /// Name part after `NNN-` with the locale suffix removed.
    pub name: String,
    /// Display title: name with dashes converted to spaces.
    pub display_title: String,
    /// Locale suffix, if the stem ends in a known locale code.
    pub locale: Option<Locale>,
}

/// Parse a page file stem following the `NNN-name[.locale]` convention.
///
/// An unknown suffix (`notes.draft`) is kept as part of the name.
pub fn parse_entry_name(stem: &str) -> ParsedName {
    let (base, locale) = match stem.rsplit_once('.') {
        Some((base, suffix)) => match suffix.parse::<Locale>() {
            Ok(locale) => (base, Some(locale)),
            Err(_) => (stem, None),
        },
        None => (stem, None),
    };

    let (number, name) = match base.split_once('-') {
        Some((prefix, rest)) => match prefix.parse::<u32>() {
            Ok(num) => (Some(num), rest),
            Err(_) => (None, base),
        },
        None => match base.parse::<u32>() {
            Ok(num) => (Some(num), ""),
            Err(_) => (None, base),
        },
    };

    ParsedName {
        number,
        name: name.to_string(),
        display_title: name.replace('-', " "),
        locale,
    }
}

/// Derive a URL slug from a title.
///
/// Lowercases, drops everything outside `[a-z0-9 -]`, turns each run of
/// spaces and dashes into a single dash and trims dashes from both ends.
///
/// ```
/// use textile_site::naming::generate_slug;
///
/// assert_eq!(
///     generate_slug("The Future of Sustainable Textile Manufacturing!"),
///     "the-future-of-sustainable-textile-manufacturing"
/// );
/// ```
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            }
            ' ' | '-' => pending_dash = true,
            _ => {}
        }
    }

    slug
}

/// Whether `slug` is already in the shape [`generate_slug`] produces.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

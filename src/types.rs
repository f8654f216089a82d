//! Content types shared by scan, store, query and generate.
//!
//! These types are serialized into the scan manifest (`manifest.json`) and
//! read back by the generate stage, so scan and generate must agree on them.

use crate::i18n::{Locale, Localized};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A blog article with its publication metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Stable identity, unique across all posts.
    pub id: String,
    pub title: String,
    /// URL slug, unique across published posts.
    pub slug: String,
    pub excerpt: String,
    /// Markdown body.
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    /// Derived from `content`, e.g. `"5 min read"`.
    pub read_time: String,
    /// Slug of the post's category.
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo: Seo,
}

/// Optional search-engine metadata. Display only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Seo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// A named grouping of posts. `slug` is the only key posts refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: Localized<String>,
    pub slug: String,
    pub description: String,
    /// Display token, rendered as a CSS class suffix.
    pub color: String,
}

/// A static page from `pages/NNN-name[.locale].md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Title from the first `# heading`, or the link title as fallback.
    pub title: String,
    /// Nav label: file name with the number stripped and dashes as spaces.
    pub link_title: String,
    pub slug: String,
    /// Raw markdown.
    pub body: String,
    pub in_nav: bool,
    pub sort_key: u32,
    /// `None` for the default variant of a page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

/// An image card in a carousel: the home page fabrics or a workshop gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselCard {
    pub image: String,
    pub title: Localized<String>,
    pub description: Localized<String>,
}

/// A production workshop with its photo gallery.
///
/// Galleries are browsed by hand and do not advance on a timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    /// Slug, unique across workshops. Used as the carousel and reveal id.
    pub id: String,
    pub title: Localized<String>,
    pub description: Localized<String>,
    pub cards: Vec<CarouselCard>,
}

/// Workshop galleries and the page they appear on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workshops {
    /// Slug of the hosting page.
    pub page: String,
    pub galleries: Vec<Workshop>,
}

impl Workshops {
    pub fn is_empty(&self) -> bool {
        self.galleries.is_empty()
    }
}

/// Post front matter as written in `posts/*.md`.
///
/// ```text
/// +++
/// id = "3"
/// title = "Quality Control Standards in Textile Production"
/// date = "2025-01-10"
/// category = "quality"
/// +++
///
/// Markdown body…
/// ```
///
/// `slug` is derived from the title when omitted. `date` is a quoted ISO
/// string so it survives TOML's native datetime handling unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub author: String,
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo: Seo,
}

fn default_published() -> bool {
    true
}

impl FrontMatter {
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: Some(post.slug.clone()),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            date: post.date.format("%Y-%m-%d").to_string(),
            category: post.category.clone(),
            image: post.image.clone(),
            featured: post.featured,
            published: post.published,
            tags: post.tags.clone(),
            seo: post.seo.clone(),
        }
    }
}

const FENCE: &str = "+++";

/// Split a post file into its front matter source and markdown body.
///
/// Returns `None` when the file does not open with a `+++` fence or the
/// closing fence is missing.
pub fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.trim_start_matches('\u{feff}').trim_start();
    let rest = rest.strip_prefix(FENCE)?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    None
}

/// Render front matter and body back into post file form.
pub fn render_post_file(front: &FrontMatter, body: &str) -> Result<String, toml::ser::Error> {
    let header = toml::to_string(front)?;
    Ok(format!("{FENCE}\n{header}{FENCE}\n\n{}\n", body.trim_end()))
}

/// Raw `categories.toml` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Locale code → translated display name.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

fn default_color() -> String {
    "neutral".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoriesFile {
    #[serde(default)]
    pub category: Vec<CategoryEntry>,
}

/// Raw carousel card, as written in `fabrics.toml` and `workshops.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardEntry {
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Locale code → translated title/description.
    #[serde(default)]
    pub translations: BTreeMap<String, CardText>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardText {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FabricsFile {
    #[serde(default)]
    pub fabric: Vec<CardEntry>,
}

/// Raw `workshops.toml` workshop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkshopEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Locale code → translated title/description.
    #[serde(default)]
    pub translations: BTreeMap<String, CardText>,
    #[serde(default)]
    pub card: Vec<CardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkshopsFile {
    /// Slug of the page the galleries are rendered on.
    #[serde(default = "default_workshop_page")]
    pub page: String,
    #[serde(default)]
    pub workshop: Vec<WorkshopEntry>,
}

fn default_workshop_page() -> String {
    "production".to_string()
}

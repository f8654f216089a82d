//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (post,
//! category, page, generated file) leads with its positional index and
//! title. Slugs, source paths and status flags follow as indented context
//! lines, so the output reads as a content inventory while still tracing
//! back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 The Future of Sustainable Textile Manufacturing (featured)
//!     Source: posts/01-sustainable-manufacturing.md
//!     sustainability · 2025-01-15 · 2 min read
//! 002 Innovation in Knitting Technology (draft)
//!     Source: posts/05-knitting-technology.md
//!     technology · 2025-01-05 · 1 min read
//!
//! Categories
//! 001 Sustainability (2 posts)
//!
//! Fabrics
//! 001 Knit Fabrics
//!
//! Workshops
//! 001 Knitting Workshop (3 cards)
//!     Page: production
//!
//! Pages
//! 001 Our Fabrics
//!     Slug: products
//! 002 Get in Touch
//!     Slug: contact
//!     Variants: ru
//!
//! Config
//!     config.toml
//!     categories.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Root → index.html
//! en
//!     Home → en/index.html
//!     Blog → en/blog/index.html
//!     Category Quality → en/blog/category/quality/index.html
//!     001 The Future of ... → en/blog/the-future-of-.../index.html
//!
//! Generated 3 locales: 3 home, 18 category, 18 post, 9 page
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{GenerateSummary, PageKind};
use crate::i18n::{Locale, format_display_date};
use crate::scan::Manifest;
use crate::types::{Category, Post};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Post header: index, title, and a status marker for drafts and the
/// featured post.
///
/// ```text
/// 001 The Future of Sustainable Textile Manufacturing (featured)
/// 005 Innovation in Knitting Technology (draft)
/// ```
fn post_header(index: usize, post: &Post) -> String {
    let marker = match (post.published, post.featured) {
        (false, _) => " (draft)",
        (true, true) => " (featured)",
        (true, false) => "",
    };
    format!("{} {}{}", format_index(index), post.title, marker)
}

/// `category · date · read time` context line.
fn post_facts(post: &Post, locale: Option<Locale>) -> String {
    let date = match locale {
        Some(locale) => format_display_date(post.date, locale),
        None => post.date.to_string(),
    };
    format!("{} \u{b7} {} \u{b7} {}", post.category, date, post.read_time)
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output: the content inventory of a manifest.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Posts".to_string());
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        if let Some(source) = manifest.sources.get(&post.id) {
            lines.push(format!("{}Source: {}", indent(1), source));
        }
        lines.push(format!("{}{}", indent(1), post_facts(post, None)));
    }

    if !manifest.categories.is_empty() {
        let blog = manifest.blog();
        lines.push(String::new());
        lines.push("Categories".to_string());
        for (i, category) in manifest.categories.iter().enumerate() {
            let count = blog.posts_by_category(&category.slug).len();
            lines.push(format!(
                "{} {} ({} posts)",
                format_index(i + 1),
                category.name.get(manifest.config.site.default_locale),
                count
            ));
            if !category.description.is_empty() {
                lines.push(format!(
                    "{}{}",
                    indent(1),
                    truncate_desc(&category.description, 60)
                ));
            }
        }
    }

    if !manifest.fabrics.is_empty() {
        lines.push(String::new());
        lines.push("Fabrics".to_string());
        for (i, fabric) in manifest.fabrics.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(i + 1),
                fabric.title.get(manifest.config.site.default_locale)
            ));
        }
    }

    if !manifest.workshops.is_empty() {
        lines.push(String::new());
        lines.push("Workshops".to_string());
        for (i, workshop) in manifest.workshops.galleries.iter().enumerate() {
            lines.push(format!(
                "{} {} ({} cards)",
                format_index(i + 1),
                workshop.title.get(manifest.config.site.default_locale),
                workshop.cards.len()
            ));
        }
        lines.push(format!("{}Page: {}", indent(1), manifest.workshops.page));
    }

    let base_pages: Vec<_> = manifest.base_pages().collect();
    if !base_pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in base_pages.iter().enumerate() {
            let hidden = if page.in_nav { "" } else { " (hidden)" };
            lines.push(format!("{} {}{}", format_index(i + 1), page.title, hidden));
            lines.push(format!("{}Slug: {}", indent(1), page.slug));

            let variants: Vec<&str> = manifest
                .pages
                .iter()
                .filter(|p| p.slug == page.slug)
                .filter_map(|p| p.locale.map(Locale::code))
                .collect();
            if !variants.is_empty() {
                lines.push(format!("{}Variants: {}", indent(1), variants.join(", ")));
            }
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    for file in [
        "config.toml",
        "categories.toml",
        "fabrics.toml",
        "workshops.toml",
    ] {
        if source_root.join(file).exists() {
            lines.push(format!("{}{}", indent(1), file));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate output
// ============================================================================

fn kind_label(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Redirect => "redirect",
        PageKind::Home => "home",
        PageKind::BlogIndex => "blog",
        PageKind::Category => "category",
        PageKind::Post => "post",
        PageKind::Page => "page",
    }
}

/// Format generate output grouped by locale.
///
/// Posts are numbered within their locale; every other page shows its kind
/// and title.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for page in summary.pages.iter().filter(|p| p.locale.is_none()) {
        lines.push(format!("Root \u{2192} {}", page.path));
    }

    let mut locale_count = 0;
    for locale in Locale::ALL {
        let pages: Vec<_> = summary.for_locale(locale).collect();
        if pages.is_empty() {
            continue;
        }
        locale_count += 1;
        lines.push(locale.code().to_string());

        let mut post_index = 0;
        for page in pages {
            let label = match page.kind {
                PageKind::Post => {
                    post_index += 1;
                    format!("{} {}", format_index(post_index), page.title)
                }
                PageKind::Home => "Home".to_string(),
                PageKind::BlogIndex => "Blog".to_string(),
                PageKind::Category => format!("Category {}", page.title),
                _ => page.title.clone(),
            };
            lines.push(format!("{}{} \u{2192} {}", indent(1), label, page.path));
        }
    }

    let counts: Vec<String> = [
        PageKind::Home,
        PageKind::BlogIndex,
        PageKind::Category,
        PageKind::Post,
        PageKind::Page,
    ]
    .into_iter()
    .map(|kind| (kind, summary.count(kind)))
    .filter(|(_, n)| *n > 0)
    .map(|(kind, n)| format!("{} {}", n, kind_label(kind)))
    .collect();

    lines.push(String::new());
    lines.push(format!(
        "Generated {} locales: {}",
        locale_count,
        counts.join(", ")
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Format a query result: one entry per post, in result order.
pub fn format_post_list(posts: &[&Post], locale: Locale) -> Vec<String> {
    if posts.is_empty() {
        return vec!["No posts found".to_string()];
    }

    let mut lines = Vec::new();
    for (i, post) in posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(format!("{}Slug: {}", indent(1), post.slug));
        lines.push(format!("{}{}", indent(1), post_facts(post, Some(locale))));
    }
    lines.push(String::new());
    lines.push(format!("{} posts", posts.len()));
    lines
}

/// Print a query result to stdout.
pub fn print_post_list(posts: &[&Post], locale: Locale) {
    for line in format_post_list(posts, locale) {
        println!("{}", line);
    }
}

/// Format a single post with its related posts.
pub fn format_post_detail(
    post: &Post,
    category: Option<&Category>,
    related: &[&Post],
    locale: Locale,
) -> Vec<String> {
    let mut lines = vec![post.title.clone()];
    lines.push(format!("{}Slug: {}", indent(1), post.slug));
    lines.push(format!("{}Author: {}", indent(1), post.author));
    lines.push(format!(
        "{}Date: {}",
        indent(1),
        format_display_date(post.date, locale)
    ));
    let category_name = category
        .map(|c| c.name.get(locale).as_str())
        .unwrap_or(post.category.as_str());
    lines.push(format!("{}Category: {}", indent(1), category_name));
    lines.push(format!("{}Read time: {}", indent(1), post.read_time));
    if !post.tags.is_empty() {
        lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
    }
    if !post.excerpt.is_empty() {
        lines.push(format!("{}{}", indent(1), truncate_desc(&post.excerpt, 80)));
    }

    if !related.is_empty() {
        lines.push(String::new());
        lines.push("Related".to_string());
        for (i, other) in related.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), other.title));
            lines.push(format!("{}Slug: {}", indent(1), other.slug));
        }
    }
    lines
}

/// Print a single post to stdout.
pub fn print_post_detail(
    post: &Post,
    category: Option<&Category>,
    related: &[&Post],
    locale: Locale,
) {
    for line in format_post_detail(post, category, related, locale) {
        println!("{}", line);
    }
}

// ============================================================================
// Admin
// ============================================================================

/// Format the admin listing: every post, drafts included, with its id.
pub fn format_admin_list(posts: &[Post]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, post) in posts.iter().enumerate() {
        lines.push(post_header(i + 1, post));
        lines.push(format!("{}Id: {}", indent(1), post.id));
        lines.push(format!("{}{}", indent(1), post_facts(post, None)));
    }
    let drafts = posts.iter().filter(|p| !p.published).count();
    lines.push(String::new());
    lines.push(format!("{} posts, {} drafts", posts.len(), drafts));
    lines
}

/// Print the admin listing to stdout.
pub fn print_admin_list(posts: &[Post]) {
    for line in format_admin_list(posts) {
        println!("{}", line);
    }
}

/// One-line confirmation of a store write.
pub fn format_store_action(action: &str, post: &Post) -> String {
    let status = if post.published { "published" } else { "draft" };
    format!("{} {} {} ({})", action, post.id, post.title, status)
}

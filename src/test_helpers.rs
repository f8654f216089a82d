//! Shared test utilities for the textile-site test suite.
//!
//! Provides fixture setup, manifest lookups that panic with the available
//! keys on a miss, and small builders for posts and categories.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let post = find_post(&manifest, "traditional-uzbek-weaving-techniques-in-modern-fashion");
//! assert_eq!(post.category, "craftsmanship");
//!
//! let blog = Blog::new(
//!     vec![post("1", "a", "2025-01-01", "quality").featured()],
//!     vec![category("quality")],
//! );
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::blog::{self, Blog};
use crate::i18n::Localized;
use crate::scan::Manifest;
use crate::types::{Category, Page, Post};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a post by slug, drafts included. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a category by slug. Panics if not found.
pub fn find_category<'a>(manifest: &'a Manifest, slug: &str) -> &'a Category {
    manifest
        .categories
        .iter()
        .find(|c| c.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.categories.iter().map(|c| c.slug.as_str()).collect();
            panic!("category '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a default-locale page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a Page {
    manifest
        .base_pages()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// Nav page slugs in nav order.
pub fn nav_page_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.nav_pages().iter().map(|p| p.slug.as_str()).collect()
}

/// Slugs of a query result, in result order.
pub fn slugs<'a>(posts: &[&'a Post]) -> Vec<&'a str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

// =========================================================================
// Builders
// =========================================================================

/// A published, unfeatured post with placeholder text.
pub fn post(id: &str, slug: &str, date: &str, category: &str) -> Post {
    let content = format!("Body of {slug}.");
    Post {
        id: id.to_string(),
        title: slug.replace('-', " "),
        slug: slug.to_string(),
        excerpt: String::new(),
        read_time: blog::compute_read_time(&content),
        content,
        author: "Aknazar Karimov".to_string(),
        date: date.parse().unwrap(),
        category: category.to_string(),
        image: String::new(),
        featured: false,
        published: true,
        tags: Vec::new(),
        seo: Default::default(),
    }
}

/// Chainable tweaks on test posts.
pub trait PostBuilder {
    fn unpublished(self) -> Self;
    fn featured(self) -> Self;
    fn tags(self, tags: &[&str]) -> Self;
    fn titled(self, title: &str) -> Self;
    fn excerpt(self, excerpt: &str) -> Self;
    fn content(self, content: &str) -> Self;
}

impl PostBuilder for Post {
    fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    fn titled(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    fn excerpt(mut self, excerpt: &str) -> Self {
        self.excerpt = excerpt.to_string();
        self
    }

    fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self.read_time = blog::compute_read_time(content);
        self
    }
}

/// A category whose id, slug and name all derive from `slug`.
pub fn category(slug: &str) -> Category {
    let mut name = slug.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Category {
        id: slug.to_string(),
        name: Localized::new(name),
        slug: slug.to_string(),
        description: String::new(),
        color: "neutral".to_string(),
    }
}

/// An in-memory blog shaped like the shipped content: six categories, six
/// published posts and one draft.
pub fn sample_blog() -> Blog {
    let categories = [
        "sustainability",
        "craftsmanship",
        "quality",
        "business",
        "technology",
        "design",
    ]
    .into_iter()
    .map(category)
    .collect();

    let posts = vec![
        post("1", "sustainable", "2025-01-15", "sustainability")
            .titled("The Future of Sustainable Textile Manufacturing")
            .excerpt("How eco-friendly practices are making production greener.")
            .content("Our closed-loop water systems recycle most process water.")
            .tags(&["sustainability", "eco-friendly", "innovation"])
            .featured(),
        post("2", "weaving", "2025-01-12", "craftsmanship")
            .titled("Traditional Uzbek Weaving Techniques in Modern Fashion")
            .excerpt("Ancient patterns finding new life on contemporary runways.")
            .tags(&["tradition", "uzbekistan", "craft"]),
        post("3", "quality-control", "2025-01-10", "quality")
            .titled("Quality Control Standards in Textile Production")
            .excerpt("Inside the testing lab behind every roll of fabric.")
            .tags(&["quality", "testing", "standards"]),
        post("4", "markets", "2025-01-08", "business")
            .titled("Expanding Markets: Central Asia to Europe")
            .excerpt("Trade routes old and new for textile exporters.")
            .tags(&["export", "business", "europe"]),
        post("5", "knitting-draft", "2025-01-05", "technology")
            .titled("Innovation in Knitting Technology")
            .excerpt("Computerized knitting machines on the factory floor.")
            .tags(&["technology", "knitting", "innovation"])
            .unpublished(),
        post("6", "color-trends", "2025-01-03", "design")
            .titled("Color Trends 2025: Natural Dyes Make a Comeback")
            .excerpt("Plant-based dyes are back in demand.")
            .tags(&["design", "color", "natural"]),
        post("7", "cotton-harvest", "2024-12-20", "sustainability")
            .titled("From Field to Fabric: The Cotton Harvest")
            .excerpt("Following the autumn harvest in the Fergana valley.")
            .tags(&["cotton", "sustainability"]),
    ];

    Blog::new(posts, categories)
}

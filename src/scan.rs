//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory, validates it
//! and produces a [`Manifest`] that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── categories.toml              # [[category]] entries
//! ├── fabrics.toml                 # [[fabric]] hero carousel cards (optional)
//! ├── workshops.toml               # [[workshop]] galleries for the production page (optional)
//! ├── posts/                       # Blog posts, any depth
//! │   ├── sustainable-manufacturing.md
//! │   └── 2025/
//! │       └── color-trends.md
//! └── pages/
//!     ├── 010-products.md          # Page (numbered = appears in nav)
//!     ├── 030-contact.md
//!     ├── 030-contact.ru.md        # Russian variant of the contact page
//!     └── privacy.md               # Unnumbered = hidden from nav
//! ```
//!
//! ## Post Files
//!
//! A post is a markdown file opening with a `+++` TOML front matter block
//! (see [`FrontMatter`]). Posts keep collection order, which is the sorted
//! path order under `posts/`.
//!
//! ## Validation
//!
//! The scanner enforces these rules:
//! - Every post references a known category slug
//! - Post ids are unique; published slugs are unique
//! - Slugs are well formed, and titles that derive to an empty slug need an
//!   explicit one
//! - Dates are ISO `YYYY-MM-DD`
//! - Translation keys are supported locale codes
//! - Workshop ids are unique slugs and their host page exists
//! - No page takes a slug the generator routes itself (`blog`)
//!
//! More than one featured post is allowed but logged, since only the first
//! is ever shown.

use crate::blog::{self, Blog};
use crate::config::{self, SiteConfig};
use crate::i18n::{Locale, Localized};
use crate::naming::{generate_slug, is_valid_slug, parse_entry_name};
use crate::types::{
    CardEntry, CarouselCard, CategoriesFile, Category, FabricsFile, FrontMatter, Page, Post,
    Workshop, Workshops, WorkshopsFile, split_front_matter,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Missing +++ front matter in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("{path}: {source}")]
    Post { path: PathBuf, source: PostError },
    #[error("Unknown category \"{category}\" in {path}")]
    UnknownCategory { path: PathBuf, category: String },
    #[error("Duplicate post id \"{id}\" in {path}")]
    DuplicatePostId { id: String, path: PathBuf },
    #[error("Duplicate slug \"{slug}\" in {path}")]
    DuplicateSlug { slug: String, path: PathBuf },
    #[error("Duplicate category slug \"{0}\"")]
    DuplicateCategory(String),
    #[error("Invalid category slug \"{0}\"")]
    InvalidCategorySlug(String),
    #[error("Unsupported locale \"{code}\" in {path}")]
    UnknownLocale { code: String, path: PathBuf },
    #[error("Page slug \"{slug}\" in {path} is reserved")]
    ReservedPageSlug { slug: String, path: PathBuf },
    #[error("Invalid workshop id \"{0}\"")]
    InvalidWorkshopId(String),
    #[error("Duplicate workshop id \"{0}\"")]
    DuplicateWorkshop(String),
    #[error("Workshop galleries reference missing page \"{0}\"")]
    UnknownWorkshopPage(String),
}

/// Page slugs the generator routes itself.
pub const RESERVED_PAGE_SLUGS: &[&str] = &["blog"];

/// Problems turning front matter into a [`Post`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostError {
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("title \"{0}\" produces an empty slug; set `slug` explicitly")]
    EmptySlug(String),
    #[error("invalid slug \"{0}\", use lowercase letters, digits and single dashes")]
    InvalidSlug(String),
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub posts: Vec<Post>,
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<Page>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fabrics: Vec<CarouselCard>,
    #[serde(default, skip_serializing_if = "Workshops::is_empty")]
    pub workshops: Workshops,
    /// Post id → source path relative to the content root.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sources: BTreeMap<String, String>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Query view over the manifest's posts and categories.
    pub fn blog(&self) -> Blog {
        Blog::new(self.posts.clone(), self.categories.clone())
    }

    /// Default-locale pages shown in navigation, in nav order.
    pub fn nav_pages(&self) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|p| p.in_nav && p.locale.is_none())
            .collect()
    }

    /// Default-locale pages, one per slug.
    pub fn base_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.locale.is_none())
    }

    /// The variant of page `slug` for `locale`, falling back to the default.
    pub fn page_variant(&self, slug: &str, locale: Locale) -> Option<&Page> {
        self.pages
            .iter()
            .find(|p| p.slug == slug && p.locale == Some(locale))
            .or_else(|| self.pages.iter().find(|p| p.slug == slug && p.locale.is_none()))
    }

    /// Workshop galleries rendered on page `slug`.
    pub fn galleries_for(&self, slug: &str) -> &[Workshop] {
        if self.workshops.page == slug {
            &self.workshops.galleries
        } else {
            &[]
        }
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let categories = load_categories(root)?;
    let fabrics = load_fabrics(root)?;
    let (posts, sources) = load_posts(root, &categories)?;
    let pages = parse_pages(root)?;
    let workshops = load_workshops(root)?;

    if !workshops.is_empty()
        && !pages
            .iter()
            .any(|p| p.locale.is_none() && p.slug == workshops.page)
    {
        return Err(ScanError::UnknownWorkshopPage(workshops.page));
    }

    let featured = posts.iter().filter(|p| p.published && p.featured).count();
    if featured > 1 {
        log::warn!("{featured} published posts are featured, only the first is shown");
    }

    log::debug!(
        "scanned {} posts, {} categories, {} pages, {} fabrics, {} workshops",
        posts.len(),
        categories.len(),
        pages.len(),
        fabrics.len(),
        workshops.galleries.len()
    );

    Ok(Manifest {
        posts,
        categories,
        pages,
        fabrics,
        workshops,
        sources,
        config,
    })
}

// ============================================================================
// Categories, fabrics and workshops
// ============================================================================

fn read_toml<T>(path: &Path) -> Result<Option<T>, ScanError>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ScanError::Toml {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_locale_key(code: &str, path: &Path) -> Result<Locale, ScanError> {
    code.parse().map_err(|_| ScanError::UnknownLocale {
        code: code.to_string(),
        path: path.to_path_buf(),
    })
}

/// Load `categories.toml`. A missing file means no categories.
pub fn load_categories(root: &Path) -> Result<Vec<Category>, ScanError> {
    let path = root.join("categories.toml");
    let Some(file) = read_toml::<CategoriesFile>(&path)? else {
        log::warn!("no categories.toml in {}", root.display());
        return Ok(Vec::new());
    };

    let mut categories: Vec<Category> = Vec::with_capacity(file.category.len());
    for entry in file.category {
        let slug = entry.slug.unwrap_or_else(|| generate_slug(&entry.name));
        if !is_valid_slug(&slug) {
            return Err(ScanError::InvalidCategorySlug(slug));
        }
        if categories.iter().any(|c| c.slug == slug) {
            return Err(ScanError::DuplicateCategory(slug));
        }

        let mut name = Localized::new(entry.name);
        for (code, translated) in entry.translations {
            name = name.with(parse_locale_key(&code, &path)?, translated);
        }

        categories.push(Category {
            id: entry.id,
            name,
            slug,
            description: entry.description,
            color: entry.color,
        });
    }
    Ok(categories)
}

fn build_card(entry: CardEntry, path: &Path) -> Result<CarouselCard, ScanError> {
    let mut title = Localized::new(entry.title);
    let mut description = Localized::new(entry.description);
    for (code, text) in entry.translations {
        let locale = parse_locale_key(&code, path)?;
        title = title.with(locale, text.title);
        if let Some(desc) = text.description {
            description = description.with(locale, desc);
        }
    }
    Ok(CarouselCard {
        image: entry.image,
        title,
        description,
    })
}

/// Load `fabrics.toml`. A missing file means an empty carousel.
pub fn load_fabrics(root: &Path) -> Result<Vec<CarouselCard>, ScanError> {
    let path = root.join("fabrics.toml");
    let Some(file) = read_toml::<FabricsFile>(&path)? else {
        return Ok(Vec::new());
    };
    file.fabric
        .into_iter()
        .map(|entry| build_card(entry, &path))
        .collect()
}

/// Load `workshops.toml`. A missing file means no galleries.
pub fn load_workshops(root: &Path) -> Result<Workshops, ScanError> {
    let path = root.join("workshops.toml");
    let Some(file) = read_toml::<WorkshopsFile>(&path)? else {
        return Ok(Workshops::default());
    };

    let mut galleries: Vec<Workshop> = Vec::with_capacity(file.workshop.len());
    for entry in file.workshop {
        if !is_valid_slug(&entry.id) {
            return Err(ScanError::InvalidWorkshopId(entry.id));
        }
        if galleries.iter().any(|w| w.id == entry.id) {
            return Err(ScanError::DuplicateWorkshop(entry.id));
        }
        if entry.card.is_empty() {
            log::warn!("workshop {} has no cards", entry.id);
        }

        let mut title = Localized::new(entry.title);
        let mut description = Localized::new(entry.description);
        for (code, text) in entry.translations {
            let locale = parse_locale_key(&code, &path)?;
            title = title.with(locale, text.title);
            if let Some(desc) = text.description {
                description = description.with(locale, desc);
            }
        }
        let cards = entry
            .card
            .into_iter()
            .map(|card| build_card(card, &path))
            .collect::<Result<Vec<_>, _>>()?;

        galleries.push(Workshop {
            id: entry.id,
            title,
            description,
            cards,
        });
    }

    Ok(Workshops {
        page: file.page,
        galleries,
    })
}

// ============================================================================
// Posts
// ============================================================================

/// Build a [`Post`] from parsed front matter and its markdown body.
///
/// Derives the slug from the title when none is given and computes the read
/// time from the body.
pub fn build_post(front: FrontMatter, body: &str) -> Result<Post, PostError> {
    let date = NaiveDate::parse_from_str(front.date.trim(), "%Y-%m-%d")
        .map_err(|_| PostError::InvalidDate(front.date.clone()))?;

    let slug = match front.slug {
        Some(slug) if is_valid_slug(&slug) => slug,
        Some(slug) => return Err(PostError::InvalidSlug(slug)),
        None => {
            let derived = generate_slug(&front.title);
            if derived.is_empty() {
                return Err(PostError::EmptySlug(front.title));
            }
            derived
        }
    };

    let content = body.trim_end().to_string();
    Ok(Post {
        id: front.id,
        title: front.title,
        slug,
        excerpt: front.excerpt,
        read_time: blog::compute_read_time(&content),
        content,
        author: front.author,
        date,
        category: front.category,
        image: front.image,
        featured: front.featured,
        published: front.published,
        tags: front.tags,
        seo: front.seo,
    })
}

/// Parse one post file.
pub fn parse_post_file(path: &Path) -> Result<Post, ScanError> {
    let source = fs::read_to_string(path)?;
    let (header, body) =
        split_front_matter(&source).ok_or_else(|| ScanError::MissingFrontMatter(path.to_path_buf()))?;
    let front: FrontMatter = toml::from_str(header).map_err(|source| ScanError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    build_post(front, body).map_err(|source| ScanError::Post {
        path: path.to_path_buf(),
        source,
    })
}

/// Markdown files under `posts/`, sorted by path.
pub fn post_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let posts_dir = root.join("posts");
    if !posts_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(&posts_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load and validate every post. Returns the posts in collection order and
/// a map from post id to source path relative to `root`.
pub fn load_posts(
    root: &Path,
    categories: &[Category],
) -> Result<(Vec<Post>, BTreeMap<String, String>), ScanError> {
    let mut posts = Vec::new();
    let mut sources = BTreeMap::new();
    let mut published_slugs: HashMap<String, PathBuf> = HashMap::new();

    for path in post_files(root)? {
        let post = parse_post_file(&path)?;

        if !categories.iter().any(|c| c.slug == post.category) {
            return Err(ScanError::UnknownCategory {
                path,
                category: post.category,
            });
        }
        if sources.contains_key(&post.id) {
            return Err(ScanError::DuplicatePostId { id: post.id, path });
        }
        if post.published {
            if let Some(first) = published_slugs.get(&post.slug) {
                log::debug!("slug {} already used by {}", post.slug, first.display());
                return Err(ScanError::DuplicateSlug {
                    slug: post.slug,
                    path,
                });
            }
            published_slugs.insert(post.slug.clone(), path.clone());
        }

        let rel = path.strip_prefix(root).unwrap_or(&path);
        sources.insert(post.id.clone(), rel.to_string_lossy().into_owned());
        posts.push(post);
    }
    Ok((posts, sources))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

// ============================================================================
// Pages
// ============================================================================

/// Parse all markdown files in `pages/` into pages.
///
/// Numbered files (`NNN-name.md`) appear in navigation sorted by number;
/// unnumbered files are generated but hidden. A `.ru`/`.uz` suffix marks a
/// translated variant of the page with the same slug.
fn parse_pages(root: &Path) -> Result<Vec<Page>, ScanError> {
    let pages_dir = root.join("pages");
    if !pages_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut md_files: Vec<PathBuf> = fs::read_dir(&pages_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p))
        .collect();
    md_files.sort();

    let mut pages = Vec::new();
    for md_path in &md_files {
        let stem = md_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_entry_name(&stem);
        if parsed.name.is_empty() {
            log::warn!("skipping page with no name: {}", md_path.display());
            continue;
        }
        if RESERVED_PAGE_SLUGS
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&parsed.name))
        {
            return Err(ScanError::ReservedPageSlug {
                slug: parsed.name,
                path: md_path.clone(),
            });
        }

        let content = fs::read_to_string(md_path)?;
        let title = content
            .lines()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .unwrap_or_else(|| parsed.display_title.clone());

        pages.push(Page {
            title,
            link_title: parsed.display_title,
            slug: parsed.name,
            body: content,
            in_nav: parsed.number.is_some(),
            sort_key: parsed.number.unwrap_or(u32::MAX),
            locale: parsed.locale,
        });
    }

    pages.sort_by_key(|p| p.sort_key);
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_post(root: &Path, name: &str, front: &str, body: &str) {
        let dir = root.join("posts");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), format!("+++\n{front}+++\n\n{body}\n")).unwrap();
    }

    fn minimal_root() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("categories.toml"),
            "[[category]]\nid = \"quality\"\nname = \"Quality\"\n",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn scan_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        assert_eq!(manifest.categories.len(), 6);
        assert_eq!(manifest.posts.len(), 7);
        assert_eq!(manifest.fabrics.len(), 7);
        assert_eq!(manifest.workshops.galleries.len(), 4);
    }

    // =========================================================================
    // Workshop tests
    // =========================================================================

    fn write_workshops(root: &Path, toml: &str) {
        fs::write(root.join("workshops.toml"), toml).unwrap();
    }

    fn production_page(root: &Path) {
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("pages/020-production.md"), "# Production\n").unwrap();
    }

    #[test]
    fn fixture_workshops_load_in_file_order() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let ids: Vec<&str> = manifest
            .workshops
            .galleries
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, vec!["knitting", "dyeing", "finishing", "quality"]);

        let knitting = &manifest.workshops.galleries[0];
        assert_eq!(knitting.cards.len(), 3);
        assert_eq!(knitting.title.get(Locale::Ru), "Вязальная Мастерская");
        assert_eq!(knitting.cards[2].title.get(Locale::Ru), "Quality Yarn Selection");
        assert_eq!(manifest.galleries_for("production").len(), 4);
        assert!(manifest.galleries_for("contact").is_empty());
    }

    #[test]
    fn duplicate_workshop_id_is_error() {
        let tmp = TempDir::new().unwrap();
        production_page(tmp.path());
        write_workshops(
            tmp.path(),
            "[[workshop]]\nid = \"dyeing\"\ntitle = \"A\"\n\n[[workshop]]\nid = \"dyeing\"\ntitle = \"B\"\n",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::DuplicateWorkshop(_))
        ));
    }

    #[test]
    fn invalid_workshop_id_is_error() {
        let tmp = TempDir::new().unwrap();
        production_page(tmp.path());
        write_workshops(tmp.path(), "[[workshop]]\nid = \"Dye Shop\"\ntitle = \"A\"\n");
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::InvalidWorkshopId(_))
        ));
    }

    #[test]
    fn workshops_need_their_host_page() {
        let tmp = TempDir::new().unwrap();
        write_workshops(
            tmp.path(),
            "page = \"factory\"\n\n[[workshop]]\nid = \"dyeing\"\ntitle = \"A\"\n",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::UnknownWorkshopPage(page)) if page == "factory"
        ));
    }

    #[test]
    fn workshop_card_translation_locale_is_checked() {
        let tmp = TempDir::new().unwrap();
        production_page(tmp.path());
        write_workshops(
            tmp.path(),
            "[[workshop]]\nid = \"dyeing\"\ntitle = \"A\"\n\n[[workshop.card]]\nimage = \"/a.jpg\"\ntitle = \"Vats\"\ntranslations.de = { title = \"Bottiche\" }\n",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::UnknownLocale { .. })
        ));
    }

    #[test]
    fn fixture_posts_keep_path_order() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let first = manifest.posts.first().unwrap();
        assert_eq!(first.slug, "the-future-of-sustainable-textile-manufacturing");
    }

    #[test]
    fn fixture_draft_is_scanned_but_unpublished() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let draft = find_post(&manifest, "innovation-in-knitting-technology");
        assert!(!draft.published);
    }

    #[test]
    fn fixture_category_translations() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let quality = find_category(&manifest, "quality");
        assert_eq!(quality.name.get(Locale::En), "Quality");
        assert_eq!(quality.name.get(Locale::Ru), "Качество");
    }

    #[test]
    fn sources_are_relative() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.sources.len(), manifest.posts.len());
        for source in manifest.sources.values() {
            assert!(source.starts_with("posts"));
            assert!(!source.contains(tmp.path().to_str().unwrap()));
        }
    }

    #[test]
    fn slug_derived_from_title() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"Quality Control: 2025!\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.posts[0].slug, "quality-control-2025");
        assert_eq!(manifest.posts[0].read_time, "1 min read");
        assert_eq!(manifest.posts[0].content, "Body");
    }

    #[test]
    fn nested_post_directories_are_walked() {
        let tmp = minimal_root();
        let front = "id = \"1\"\ntitle = \"Nested\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n";
        fs::create_dir_all(tmp.path().join("posts/2025")).unwrap();
        fs::write(
            tmp.path().join("posts/2025/nested.md"),
            format!("+++\n{front}+++\n\nBody\n"),
        )
        .unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.posts[0].slug, "nested");
    }

    #[test]
    fn empty_derived_slug_is_error() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "ru.md",
            "id = \"1\"\ntitle = \"Новости\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        let result = scan(tmp.path());
        assert!(matches!(
            result,
            Err(ScanError::Post {
                source: PostError::EmptySlug(_),
                ..
            })
        ));
    }

    #[test]
    fn explicit_slug_is_validated() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"Hi\"\nslug = \"Bad Slug\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::Post {
                source: PostError::InvalidSlug(_),
                ..
            })
        ));
    }

    #[test]
    fn invalid_date_is_error() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"Hi\"\ndate = \"15/01/2025\"\ncategory = \"quality\"\n",
            "Body",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::Post {
                source: PostError::InvalidDate(_),
                ..
            })
        ));
    }

    #[test]
    fn unknown_category_is_error() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"Hi\"\ndate = \"2025-01-10\"\ncategory = \"Quality\"\n",
            "Body",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn duplicate_published_slug_is_error() {
        let tmp = minimal_root();
        let front = |id: &str| {
            format!("id = \"{id}\"\ntitle = \"Same\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n")
        };
        write_post(tmp.path(), "a.md", &front("1"), "Body");
        write_post(tmp.path(), "b.md", &front("2"), "Body");
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::DuplicateSlug { .. })
        ));
    }

    #[test]
    fn draft_may_share_slug_with_published_post() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"Same\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        write_post(
            tmp.path(),
            "b.md",
            "id = \"2\"\ntitle = \"Same\"\ndate = \"2025-01-11\"\ncategory = \"quality\"\npublished = false\n",
            "Body",
        );
        assert_eq!(scan(tmp.path()).unwrap().posts.len(), 2);
    }

    #[test]
    fn duplicate_post_id_is_error() {
        let tmp = minimal_root();
        write_post(
            tmp.path(),
            "a.md",
            "id = \"1\"\ntitle = \"One\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        write_post(
            tmp.path(),
            "b.md",
            "id = \"1\"\ntitle = \"Two\"\ndate = \"2025-01-10\"\ncategory = \"quality\"\n",
            "Body",
        );
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::DuplicatePostId { .. })
        ));
    }

    #[test]
    fn missing_front_matter_is_error() {
        let tmp = minimal_root();
        fs::create_dir_all(tmp.path().join("posts")).unwrap();
        fs::write(tmp.path().join("posts/plain.md"), "# Just markdown\n").unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::MissingFrontMatter(_))
        ));
    }

    #[test]
    fn non_markdown_files_ignored() {
        let tmp = minimal_root();
        fs::create_dir_all(tmp.path().join("posts")).unwrap();
        fs::write(tmp.path().join("posts/notes.txt"), "not a post").unwrap();
        assert!(scan(tmp.path()).unwrap().posts.is_empty());
    }

    #[test]
    fn duplicate_category_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("categories.toml"),
            "[[category]]\nid = \"1\"\nname = \"Design\"\n\n[[category]]\nid = \"2\"\nname = \"design\"\n",
        )
        .unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn unsupported_translation_locale_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("categories.toml"),
            "[[category]]\nid = \"1\"\nname = \"Design\"\ntranslations = { de = \"Entwurf\" }\n",
        )
        .unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::UnknownLocale { .. })
        ));
    }

    #[test]
    fn empty_content_dir_scans_to_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.posts.is_empty());
        assert!(manifest.categories.is_empty());
        assert!(manifest.pages.is_empty());
        assert_eq!(manifest.config, SiteConfig::default());
    }

    // =========================================================================
    // Page tests
    // =========================================================================

    #[test]
    fn pages_parsed_from_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        let products = find_page(&manifest, "products");
        assert_eq!(products.title, "Our Fabrics");
        assert_eq!(products.link_title, "products");
        assert!(products.in_nav);
        assert_eq!(products.locale, None);
    }

    #[test]
    fn nav_pages_exclude_translations() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(
            nav_page_slugs(&manifest),
            vec!["products", "production", "contact"]
        );
    }

    #[test]
    fn page_variant_prefers_locale_then_default() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();

        let ru = manifest.page_variant("contact", Locale::Ru).unwrap();
        assert_eq!(ru.locale, Some(Locale::Ru));
        let uz = manifest.page_variant("contact", Locale::Uz).unwrap();
        assert_eq!(uz.locale, None);
        assert!(manifest.page_variant("missing", Locale::En).is_none());
    }

    #[test]
    fn page_title_fallback_to_link_title() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(
            tmp.path().join("pages/010-about-us.md"),
            "Just some content without a heading.",
        )
        .unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let page = manifest.pages.first().unwrap();
        assert_eq!(page.title, "about us");
        assert_eq!(page.slug, "about-us");
    }

    #[test]
    fn unnumbered_page_hidden_from_nav() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("pages/privacy.md"), "# Privacy\n").unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let page = manifest.pages.first().unwrap();
        assert!(!page.in_nav);
        assert_eq!(page.slug, "privacy");
        assert!(manifest.nav_pages().is_empty());
    }

    #[test]
    fn reserved_page_slug_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("pages/040-blog.md"), "# Our Blog\n").unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::ReservedPageSlug { slug, .. }) if slug == "blog"
        ));
    }

    #[test]
    fn reserved_page_slug_applies_to_variants() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages")).unwrap();
        fs::write(tmp.path().join("pages/Blog.ru.md"), "# Блог\n").unwrap();
        assert!(matches!(
            scan(tmp.path()),
            Err(ScanError::ReservedPageSlug { .. })
        ));
    }

    #[test]
    fn multiple_pages_sorted_by_number() {
        let tmp = TempDir::new().unwrap();
        let pages = tmp.path().join("pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("020-second.md"), "# Second").unwrap();
        fs::write(pages.join("010-first.md"), "# First").unwrap();
        fs::write(pages.join("030-third.md"), "# Third").unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let titles: Vec<&str> = manifest.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    // =========================================================================
    // Config integration tests
    // =========================================================================

    #[test]
    fn config_loaded_from_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.config.site.name, "Aknazar Textile");
        assert_eq!(manifest.config.carousel.interval_ms, 3000);
    }

    #[test]
    fn invalid_config_fails_scan() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[carousel]\ninterval_ms = 0\n").unwrap();
        assert!(matches!(scan(tmp.path()), Err(ScanError::Config(_))));
    }

    #[test]
    fn manifest_json_roundtrip_preserves_blog_queries() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();

        assert_eq!(back.posts, manifest.posts);
        assert_eq!(back.categories, manifest.categories);

        let (before, after) = (manifest.blog(), back.blog());
        assert_eq!(
            slugs(&after.filtered_posts("All", "")),
            slugs(&before.filtered_posts("All", ""))
        );
    }
}

//! Post storage for the admin commands.
//!
//! A [`ContentStore`] owns the posts; the query side ([`Blog`]) is always
//! rebuilt from [`ContentStore::list`] and never keeps a copy of its own.
//!
//! Two implementations:
//!
//! - [`MemoryStore`]: a `Vec` in process. Used for tests and dry runs.
//! - [`DirStore`]: post files under `<content>/posts/`. New posts are written
//!   as `posts/<slug>.md`; updates rewrite the post's existing file.
//!
//! Every write validates before touching anything: the category must exist,
//! a published post's slug must not collide with another published post, and
//! the slug and read time are derived the same way the scanner does.

use crate::blog::Blog;
use crate::scan::{self, PostError, ScanError};
use crate::types::{Category, FrontMatter, Post, Seo, render_post_file};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Invalid post: {0}")]
    Post(#[from] PostError),
    #[error("Could not serialize front matter: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("No post with id \"{0}\"")]
    NotFound(String),
    #[error("Unknown category \"{0}\"")]
    UnknownCategory(String),
    #[error("Slug \"{0}\" is already used by a published post")]
    DuplicateSlug(String),
}

/// Editable fields of a post. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    /// Derived from the title when `None`.
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub published: bool,
    pub tags: Vec<String>,
    pub seo: Seo,
}

impl PostDraft {
    /// An unpublished draft with empty text fields.
    pub fn new(title: impl Into<String>, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            slug: None,
            excerpt: String::new(),
            content: String::new(),
            author: String::new(),
            date,
            category: category.into(),
            image: String::new(),
            featured: false,
            published: false,
            tags: Vec::new(),
            seo: Seo::default(),
        }
    }

    /// The editable fields of an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: Some(post.slug.clone()),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            date: post.date,
            category: post.category.clone(),
            image: post.image.clone(),
            featured: post.featured,
            published: post.published,
            tags: post.tags.clone(),
            seo: post.seo.clone(),
        }
    }

    fn front_matter(&self, id: &str) -> FrontMatter {
        FrontMatter {
            id: id.to_string(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            author: self.author.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            category: self.category.clone(),
            image: self.image.clone(),
            featured: self.featured,
            published: self.published,
            tags: self.tags.clone(),
            seo: self.seo.clone(),
        }
    }

    /// Build the post this draft describes under `id`.
    pub fn to_post(&self, id: &str) -> Result<Post, PostError> {
        scan::build_post(self.front_matter(id), &self.content)
    }
}

/// Field-by-field changes to an existing post. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostEdit {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl PostEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields this edit sets.
    pub fn apply(self, draft: &mut PostDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(slug) = self.slug {
            draft.slug = Some(slug);
        }
        if let Some(excerpt) = self.excerpt {
            draft.excerpt = excerpt;
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        if let Some(author) = self.author {
            draft.author = author;
        }
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(image) = self.image {
            draft.image = image;
        }
        if let Some(featured) = self.featured {
            draft.featured = featured;
        }
        if let Some(published) = self.published {
            draft.published = published;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
    }
}

/// Post persistence used by the admin commands.
pub trait ContentStore {
    /// Every post, drafts included, in collection order.
    fn list(&self) -> Result<Vec<Post>, StoreError>;

    /// Categories posts may reference.
    fn categories(&self) -> &[Category];

    /// Store a new post and return it with its assigned id.
    fn create(&mut self, draft: PostDraft) -> Result<Post, StoreError>;

    /// Replace the editable fields of post `id`.
    fn update(&mut self, id: &str, draft: PostDraft) -> Result<Post, StoreError>;

    /// Remove post `id` and return it.
    fn delete(&mut self, id: &str) -> Result<Post, StoreError>;

    fn get(&self, id: &str) -> Result<Post, StoreError> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Apply `edit` to post `id`. The slug is kept unless the edit sets one.
    fn edit(&mut self, id: &str, edit: PostEdit) -> Result<Post, StoreError> {
        let mut draft = PostDraft::from_post(&self.get(id)?);
        edit.apply(&mut draft);
        self.update(id, draft)
    }

    fn set_published(&mut self, id: &str, published: bool) -> Result<Post, StoreError> {
        self.edit(
            id,
            PostEdit {
                published: Some(published),
                ..PostEdit::default()
            },
        )
    }

    /// A fresh query view over the stored posts.
    fn blog(&self) -> Result<Blog, StoreError> {
        Ok(Blog::new(self.list()?, self.categories().to_vec()))
    }
}

/// Check `candidate` against the category set and the other posts.
fn validate(posts: &[Post], categories: &[Category], candidate: &Post) -> Result<(), StoreError> {
    if !categories.iter().any(|c| c.slug == candidate.category) {
        return Err(StoreError::UnknownCategory(candidate.category.clone()));
    }
    if candidate.published
        && posts
            .iter()
            .any(|p| p.published && p.id != candidate.id && p.slug == candidate.slug)
    {
        return Err(StoreError::DuplicateSlug(candidate.slug.clone()));
    }
    Ok(())
}

/// Next free id: one past the largest numeric id.
fn next_id(posts: &[Post]) -> String {
    let mut next = posts
        .iter()
        .filter_map(|p| p.id.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n + 1);
    while posts.iter().any(|p| p.id == next.to_string()) {
        next += 1;
    }
    next.to_string()
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: Vec<Post>,
    categories: Vec<Category>,
}

impl MemoryStore {
    pub fn new(posts: Vec<Post>, categories: Vec<Category>) -> Self {
        Self { posts, categories }
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl ContentStore for MemoryStore {
    fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.clone())
    }

    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn create(&mut self, draft: PostDraft) -> Result<Post, StoreError> {
        let post = draft.to_post(&next_id(&self.posts))?;
        validate(&self.posts, &self.categories, &post)?;
        log::info!("created post {} ({})", post.id, post.slug);
        self.posts.push(post.clone());
        Ok(post)
    }

    fn update(&mut self, id: &str, draft: PostDraft) -> Result<Post, StoreError> {
        let index = self.position(id)?;
        let post = draft.to_post(id)?;
        validate(&self.posts, &self.categories, &post)?;
        log::info!("updated post {} ({})", post.id, post.slug);
        self.posts[index] = post.clone();
        Ok(post)
    }

    fn delete(&mut self, id: &str) -> Result<Post, StoreError> {
        let index = self.position(id)?;
        let post = self.posts.remove(index);
        log::info!("deleted post {} ({})", post.id, post.slug);
        Ok(post)
    }
}

// ============================================================================
// Directory store
// ============================================================================

/// Posts stored as front-matter markdown files in a content directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    categories: Vec<Category>,
}

impl DirStore {
    /// Open the content directory at `root`, loading its categories.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            root: root.to_path_buf(),
            categories: scan::load_categories(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Posts with their absolute file paths.
    fn entries(&self) -> Result<Vec<(Post, PathBuf)>, StoreError> {
        let (posts, sources) = scan::load_posts(&self.root, &self.categories)?;
        Ok(posts
            .into_iter()
            .filter_map(|p| {
                let path = self.root.join(sources.get(&p.id)?);
                Some((p, path))
            })
            .collect())
    }

    fn find(&self, id: &str) -> Result<(Vec<Post>, PathBuf), StoreError> {
        let entries = self.entries()?;
        let path = entries
            .iter()
            .find(|(p, _)| p.id == id)
            .map(|(_, path)| path.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok((entries.into_iter().map(|(p, _)| p).collect(), path))
    }

    /// A path under `posts/` for a new post that does not clobber a file.
    fn new_post_path(&self, post: &Post) -> PathBuf {
        let dir = self.root.join("posts");
        let plain = dir.join(format!("{}.md", post.slug));
        if plain.exists() {
            dir.join(format!("{}-{}.md", post.slug, post.id))
        } else {
            plain
        }
    }

    fn write(&self, path: &Path, draft: &PostDraft, post: &Post) -> Result<(), StoreError> {
        let front = FrontMatter {
            slug: Some(post.slug.clone()),
            ..draft.front_matter(&post.id)
        };
        let file = render_post_file(&front, &post.content)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, file)?;
        Ok(())
    }
}

impl ContentStore for DirStore {
    fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.entries()?.into_iter().map(|(p, _)| p).collect())
    }

    fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn create(&mut self, draft: PostDraft) -> Result<Post, StoreError> {
        let posts = self.list()?;
        let post = draft.to_post(&next_id(&posts))?;
        validate(&posts, &self.categories, &post)?;

        let path = self.new_post_path(&post);
        self.write(&path, &draft, &post)?;
        log::info!("created post {} at {}", post.id, path.display());
        Ok(post)
    }

    fn update(&mut self, id: &str, draft: PostDraft) -> Result<Post, StoreError> {
        let (posts, path) = self.find(id)?;
        let post = draft.to_post(id)?;
        validate(&posts, &self.categories, &post)?;

        self.write(&path, &draft, &post)?;
        log::info!("updated post {} at {}", post.id, path.display());
        Ok(post)
    }

    fn delete(&mut self, id: &str) -> Result<Post, StoreError> {
        let (posts, path) = self.find(id)?;
        let post = posts
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        fs::remove_file(&path)?;
        log::info!("deleted post {} ({})", post.id, path.display());
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::ALL_CATEGORIES;
    use crate::test_helpers::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn memory_store() -> MemoryStore {
        let blog = sample_blog();
        MemoryStore::new(blog.all_posts().to_vec(), blog.categories().to_vec())
    }

    #[test]
    fn create_assigns_next_id_and_derives_fields() {
        let mut store = memory_store();
        let mut draft = PostDraft::new("Linen Care Guide", "quality", date("2025-03-01"));
        draft.content = "word ".repeat(450);
        draft.published = true;

        let post = store.create(draft).unwrap();
        assert_eq!(post.id, "8");
        assert_eq!(post.slug, "linen-care-guide");
        assert_eq!(post.read_time, "3 min read");
    }

    #[test]
    fn created_post_is_visible_to_queries() {
        let mut store = memory_store();
        let mut draft = PostDraft::new("Linen Care Guide", "quality", date("2025-03-01"));
        draft.published = true;
        store.create(draft).unwrap();

        let blog = store.blog().unwrap();
        assert_eq!(
            blog.filtered_posts(ALL_CATEGORIES, "").first().map(|p| p.slug.as_str()),
            Some("linen-care-guide")
        );
    }

    #[test]
    fn new_drafts_stay_hidden() {
        let mut store = memory_store();
        store
            .create(PostDraft::new("Secret", "quality", date("2025-03-01")))
            .unwrap();
        assert!(store.blog().unwrap().post_by_slug("secret").is_none());
    }

    #[test]
    fn create_rejects_unknown_category() {
        let mut store = memory_store();
        let result = store.create(PostDraft::new("Hi", "Quality", date("2025-03-01")));
        assert!(matches!(result, Err(StoreError::UnknownCategory(_))));
    }

    #[test]
    fn create_rejects_duplicate_published_slug() {
        let mut store = memory_store();
        let mut draft = PostDraft::new("Anything", "quality", date("2025-03-01"));
        draft.slug = Some("weaving".into());
        draft.published = true;
        assert!(matches!(
            store.create(draft.clone()),
            Err(StoreError::DuplicateSlug(_))
        ));

        // Unpublished drafts may share a slug.
        draft.published = false;
        assert!(store.create(draft).is_ok());
    }

    #[test]
    fn create_rejects_empty_slug() {
        let mut store = memory_store();
        let result = store.create(PostDraft::new("Новости", "quality", date("2025-03-01")));
        assert!(matches!(result, Err(StoreError::Post(PostError::EmptySlug(_)))));
    }

    #[test]
    fn publish_and_unpublish() {
        let mut store = memory_store();
        let post = store.set_published("5", true).unwrap();
        assert!(post.published);
        assert!(store.blog().unwrap().post_by_slug("knitting-draft").is_some());

        store.set_published("5", false).unwrap();
        assert!(store.blog().unwrap().post_by_slug("knitting-draft").is_none());
    }

    #[test]
    fn update_keeps_id_and_position() {
        let mut store = memory_store();
        let mut draft = PostDraft::from_post(&store.get("2").unwrap());
        draft.title = "Weaving, Revisited".into();
        store.update("2", draft).unwrap();

        let posts = store.list().unwrap();
        assert_eq!(posts[1].id, "2");
        assert_eq!(posts[1].title, "Weaving, Revisited");
        assert_eq!(posts[1].slug, "weaving");
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let mut store = memory_store();
        let before = store.get("4").unwrap();
        let edited = store
            .edit(
                "4",
                PostEdit {
                    title: Some("Markets of the Silk Road".into()),
                    image: Some("/images/markets.jpg".into()),
                    tags: Some(vec!["trade".into()]),
                    ..PostEdit::default()
                },
            )
            .unwrap();

        assert_eq!(edited.title, "Markets of the Silk Road");
        assert_eq!(edited.image, "/images/markets.jpg");
        assert_eq!(edited.tags, vec!["trade"]);
        // Slug survives a title change.
        assert_eq!(edited.slug, before.slug);
        assert_eq!(edited.excerpt, before.excerpt);
        assert_eq!(edited.date, before.date);
    }

    #[test]
    fn edit_recomputes_read_time() {
        let mut store = memory_store();
        let edited = store
            .edit(
                "2",
                PostEdit {
                    content: Some("word ".repeat(650)),
                    ..PostEdit::default()
                },
            )
            .unwrap();
        assert_eq!(edited.read_time, "4 min read");
    }

    #[test]
    fn edit_validates_category() {
        let mut store = memory_store();
        let result = store.edit(
            "2",
            PostEdit {
                category: Some("nope".into()),
                ..PostEdit::default()
            },
        );
        assert!(matches!(result, Err(StoreError::UnknownCategory(_))));
        assert_eq!(store.get("2").unwrap().category, "craftsmanship");
    }

    #[test]
    fn empty_edit() {
        assert!(PostEdit::default().is_empty());
        let edit = PostEdit {
            featured: Some(false),
            ..PostEdit::default()
        };
        assert!(!edit.is_empty());
    }

    #[test]
    fn delete_removes_post() {
        let mut store = memory_store();
        let removed = store.delete("3").unwrap();
        assert_eq!(removed.slug, "quality-control");
        assert!(matches!(store.get("3"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("3"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn next_id_skips_non_numeric_ids() {
        let posts = vec![
            post("abc", "a", "2025-01-01", "quality"),
            post("9", "b", "2025-01-01", "quality"),
        ];
        assert_eq!(next_id(&posts), "10");
        assert_eq!(next_id(&[]), "1");
    }

    // =========================================================================
    // DirStore
    // =========================================================================

    #[test]
    fn dir_store_lists_fixture_posts() {
        let tmp = setup_fixtures();
        let store = DirStore::open(tmp.path()).unwrap();
        assert_eq!(store.list().unwrap().len(), 7);
        assert_eq!(store.categories().len(), 6);
    }

    #[test]
    fn dir_store_create_writes_file_that_scans_back() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();

        let mut draft = PostDraft::new("Silk Road Stories", "business", date("2025-02-20"));
        draft.content = "Caravans and cloth.".into();
        draft.tags = vec!["history".into()];
        draft.published = true;
        let created = store.create(draft).unwrap();

        assert!(tmp.path().join("posts/silk-road-stories.md").exists());
        let manifest = crate::scan::scan(tmp.path()).unwrap();
        assert_eq!(find_post(&manifest, "silk-road-stories"), &created);
    }

    #[test]
    fn dir_store_update_rewrites_existing_file() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();
        let before = store.list().unwrap().len();

        let original = store.get("1").unwrap();
        let mut draft = PostDraft::from_post(&original);
        draft.excerpt = "Rewritten excerpt.".into();
        store.update("1", draft).unwrap();

        let posts = store.list().unwrap();
        assert_eq!(posts.len(), before);
        let updated = posts.iter().find(|p| p.id == "1").unwrap();
        assert_eq!(updated.excerpt, "Rewritten excerpt.");
        assert_eq!(updated.content, original.content);
    }

    #[test]
    fn dir_store_edit_rewrites_in_place() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();
        let before = scan::post_files(tmp.path()).unwrap();

        store
            .edit(
                "3",
                PostEdit {
                    author: Some("Dilnoza Rashidova".into()),
                    featured: Some(true),
                    ..PostEdit::default()
                },
            )
            .unwrap();

        assert_eq!(scan::post_files(tmp.path()).unwrap(), before);
        let post = store.get("3").unwrap();
        assert_eq!(post.author, "Dilnoza Rashidova");
        assert!(post.featured);
    }

    #[test]
    fn dir_store_publish_fixture_draft() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();
        let draft_id = store
            .list()
            .unwrap()
            .into_iter()
            .find(|p| !p.published)
            .unwrap()
            .id;

        store.set_published(&draft_id, true).unwrap();
        let blog = store.blog().unwrap();
        assert!(blog.post_by_slug("innovation-in-knitting-technology").is_some());
    }

    #[test]
    fn dir_store_delete_removes_file() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();
        let before = store.list().unwrap().len();
        store.delete("2").unwrap();
        assert_eq!(store.list().unwrap().len(), before - 1);
        assert!(matches!(store.get("2"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn dir_store_invalid_write_leaves_directory_untouched() {
        let tmp = setup_fixtures();
        let mut store = DirStore::open(tmp.path()).unwrap();
        let before = scan::post_files(tmp.path()).unwrap();

        let result = store.create(PostDraft::new("Oops", "nope", date("2025-02-20")));
        assert!(matches!(result, Err(StoreError::UnknownCategory(_))));
        assert_eq!(scan::post_files(tmp.path()).unwrap(), before);
    }
}

//! Read-only queries over the blog's posts and categories.
//!
//! [`Blog`] holds the full post list (drafts included, for admin listings)
//! and the category set. Every public query only ever sees published posts.
//! Queries borrow; nothing here mutates the content, so a `Blog` can be shared
//! freely between readers.
//!
//! Categories are referenced by slug everywhere: posts store the category
//! slug and filters compare against it.

use crate::types::{Category, Post};

/// Category token meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Reading speed used for read time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Default number of related posts shown under an article.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// A resolved category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Slug(String),
}

impl CategoryFilter {
    fn matches(&self, post: &Post) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Slug(slug) => post.category == *slug,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Blog {
    posts: Vec<Post>,
    categories: Vec<Category>,
}

impl Blog {
    pub fn new(posts: Vec<Post>, categories: Vec<Category>) -> Self {
        Self { posts, categories }
    }

    /// Every post, drafts included, in collection order.
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Published posts in collection order.
    pub fn list_published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.published)
    }

    /// Resolve a category token from a caller.
    ///
    /// `"All"` and the empty string mean no filter. A token that is not a
    /// known category slug is also treated as no filter.
    pub fn category_filter(&self, token: &str) -> CategoryFilter {
        let token = token.trim();
        if token.is_empty() || token == ALL_CATEGORIES {
            return CategoryFilter::All;
        }
        match self.category_by_slug(token) {
            Some(category) => CategoryFilter::Slug(category.slug.clone()),
            None => {
                log::debug!("unknown category {token:?}, not filtering by category");
                CategoryFilter::All
            }
        }
    }

    /// Published posts matching a category token and a search query, newest
    /// first.
    ///
    /// The search matches case-insensitively against title, excerpt and tags.
    /// An empty or whitespace-only query matches everything.
    pub fn filtered_posts(&self, category: &str, search_query: &str) -> Vec<&Post> {
        let filter = self.category_filter(category);
        self.filtered_by(&filter, search_query)
    }

    /// [`Blog::filtered_posts`] with an already-resolved filter.
    pub fn filtered_by(&self, filter: &CategoryFilter, search_query: &str) -> Vec<&Post> {
        let query = search_query.trim().to_lowercase();

        let mut posts: Vec<&Post> = self
            .list_published()
            .filter(|p| filter.matches(p))
            .filter(|p| query.is_empty() || matches_query(p, &query))
            .collect();

        // Stable: posts sharing a date keep collection order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// The published post with this slug.
    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.list_published().find(|p| p.slug == slug)
    }

    /// The first published post flagged as featured.
    pub fn featured_post(&self) -> Option<&Post> {
        self.list_published().find(|p| p.featured)
    }

    /// Published posts sharing `post`'s category or any of its tags.
    ///
    /// Collection order, `post` itself excluded, at most `limit` items.
    pub fn related_posts(&self, post: &Post, limit: usize) -> Vec<&Post> {
        self.list_published()
            .filter(|p| p.id != post.id)
            .filter(|p| p.category == post.category || p.tags.iter().any(|t| post.tags.contains(t)))
            .take(limit)
            .collect()
    }

    /// Published posts in a category, collection order.
    pub fn posts_by_category(&self, slug: &str) -> Vec<&Post> {
        self.list_published().filter(|p| p.category == slug).collect()
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }
}

fn matches_query(post: &Post, query: &str) -> bool {
    post.title.to_lowercase().contains(query)
        || post.excerpt.to_lowercase().contains(query)
        || post.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// Whole minutes needed to read `content`, rounded up, never below one.
pub fn read_minutes(content: &str) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Read time label stored on posts, e.g. `"3 min read"`.
pub fn compute_read_time(content: &str) -> String {
    format!("{} min read", read_minutes(content))
}

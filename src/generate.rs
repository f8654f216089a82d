//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the
//! final static site, one tree per configured locale.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                          # Redirect to the default locale
//! ├── en/
//! │   ├── index.html                      # Home: hero, fabric carousel, latest posts
//! │   ├── blog/
//! │   │   ├── index.html                  # All published posts, featured on top
//! │   │   ├── category/design/index.html  # One listing per category
//! │   │   └── color-trends-2025/index.html
//! │   ├── production/index.html           # Static pages, workshop galleries
//! │   └── contact/index.html
//! ├── ru/
//! └── uz/
//! ```
//!
//! ## Reveal and Carousel Markup
//!
//! The inline script (`static/reveal.js`) drives the page from data
//! attributes:
//!
//! - `<body data-reveal-threshold data-reveal-margin>`: observer tuning
//! - `<main data-reveal-context>`: identity of the view
//! - `[data-reveal-id]`: one-shot reveal targets
//! - `[data-carousel]`: carousels with `[data-carousel-prev]`,
//!   `[data-carousel-next]` and `[data-carousel-dot]` controls. Only those
//!   with `data-interval` advance on their own; workshop galleries don't.
//!
//! Without `IntersectionObserver` the script marks every target visible.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::blog::{self, ALL_CATEGORIES, Blog};
use crate::config;
use crate::i18n::{Locale, TextKey, format_display_date, t};
use crate::reveal::RevealOptions;
use crate::scan::Manifest;
use crate::types::{CarouselCard, Category, Page, Post, Workshop};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/reveal.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Redirect,
    Home,
    BlogIndex,
    Category,
    Post,
    Page,
}

/// One written HTML file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    /// `None` for the root redirect.
    pub locale: Option<Locale>,
    pub kind: PageKind,
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
}

/// What [`generate`] wrote, in write order.
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub pages: Vec<GeneratedPage>,
}

impl GenerateSummary {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }

    pub fn for_locale(&self, locale: Locale) -> impl Iterator<Item = &GeneratedPage> {
        self.pages.iter().filter(move |p| p.locale == Some(locale))
    }
}

/// Everything a renderer needs that does not change per page.
struct Site<'a> {
    manifest: &'a Manifest,
    blog: Blog,
    css: String,
    reveal: RevealOptions,
    /// Period of the auto-advancing fabric carousel.
    carousel_period: Duration,
}

impl<'a> Site<'a> {
    fn new(manifest: &'a Manifest, css: String) -> Self {
        let config = &manifest.config;
        Self {
            manifest,
            blog: manifest.blog(),
            css,
            reveal: config.reveal.options(),
            carousel_period: config.carousel.timer().period(),
        }
    }
}

/// Read the manifest written by the scan stage and generate the site.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateSummary, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, output_dir)
}

/// Generate the site for an in-memory manifest.
pub fn generate_site(
    manifest: &Manifest,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let color_css = config::generate_color_css(&manifest.config.colors);
    let site = Site::new(manifest, format!("{}\n\n{}", color_css, CSS_STATIC));

    fs::create_dir_all(output_dir)?;
    let mut summary = GenerateSummary::default();

    let default_locale = manifest.config.site.default_locale;
    write_html(output_dir, "index.html", render_redirect(default_locale))?;
    summary.pages.push(GeneratedPage {
        locale: None,
        kind: PageKind::Redirect,
        title: default_locale.display_name().to_string(),
        path: "index.html".to_string(),
    });

    for locale in manifest.config.ordered_locales() {
        let mut emit = |kind: PageKind,
                        title: &str,
                        route: &str,
                        markup: Markup|
         -> Result<(), GenerateError> {
            let path = output_path(locale, route);
            write_html(output_dir, &path, markup)?;
            log::debug!("wrote {path}");
            summary.pages.push(GeneratedPage {
                locale: Some(locale),
                kind,
                title: title.to_string(),
                path,
            });
            Ok(())
        };

        emit(
            PageKind::Home,
            t(locale, TextKey::Home),
            "",
            render_home(&site, locale),
        )?;
        emit(
            PageKind::BlogIndex,
            t(locale, TextKey::Blog),
            "blog/",
            render_blog_index(&site, locale, None),
        )?;
        for category in site.blog.categories() {
            emit(
                PageKind::Category,
                category.name.get(locale),
                &category_route(category),
                render_blog_index(&site, locale, Some(category)),
            )?;
        }
        for post in site.blog.list_published() {
            emit(
                PageKind::Post,
                &post.title,
                &post_route(post),
                render_post_page(&site, locale, post),
            )?;
        }
        for page in manifest.base_pages() {
            let variant = manifest.page_variant(&page.slug, locale).unwrap_or(page);
            emit(
                PageKind::Page,
                &variant.title,
                &page_route(page),
                render_page(&site, locale, variant),
            )?;
        }
    }

    log::info!(
        "generated {} pages in {}",
        summary.pages.len(),
        output_dir.display()
    );
    Ok(summary)
}

fn write_html(output_dir: &Path, rel_path: &str, markup: Markup) -> Result<(), GenerateError> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())?;
    Ok(())
}

// ============================================================================
// Routes
// ============================================================================

// Routes are locale-relative and end in `/` (or are empty for the home page).

fn category_route(category: &Category) -> String {
    format!("blog/category/{}/", category.slug)
}

fn post_route(post: &Post) -> String {
    format!("blog/{}/", post.slug)
}

fn page_route(page: &Page) -> String {
    format!("{}/", page.slug)
}

/// Absolute URL of `route` in `locale`.
fn href(locale: Locale, route: &str) -> String {
    format!("/{}/{}", locale.code(), route)
}

/// Output file for `route` in `locale`, relative to the output directory.
fn output_path(locale: Locale, route: &str) -> String {
    format!("{}/{}index.html", locale.code(), route)
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

/// Split page markdown at its `## ` headings.
///
/// The first chunk is whatever precedes the first heading. Headings inside
/// fenced code blocks don't split.
fn page_sections(markdown: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut in_fence = false;
    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        } else if !in_fence && line.starts_with("## ") && offset > start {
            sections.push(&markdown[start..offset]);
            start = offset;
        }
        offset += line.len();
    }
    sections.push(&markdown[start..]);
    sections.retain(|s| !s.trim().is_empty());
    sections
}

fn localized_read_time(locale: Locale, post: &Post) -> String {
    format!(
        "{} {}",
        blog::read_minutes(&post.content),
        t(locale, TextKey::MinRead)
    )
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    site: &Site,
    locale: Locale,
    title: &str,
    description: Option<&str>,
    route: &str,
    reveal_context: &str,
    content: Markup,
) -> Markup {
    let config = &site.manifest.config;
    let full_title = if title == config.site.name {
        title.to_string()
    } else {
        format!("{} | {}", title, config.site.name)
    };

    html! {
        (DOCTYPE)
        html lang=(locale.code()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                @if let Some(description) = description.filter(|d| !d.is_empty()) {
                    meta name="description" content=(description);
                }
                @for other in config.ordered_locales() {
                    link rel="alternate" hreflang=(other.code()) href=(href(other, route));
                }
                style { (PreEscaped(&site.css)) }
            }
            body data-reveal-threshold=(site.reveal.threshold)
                data-reveal-margin=(site.reveal.margin_px) {
                (site_header(site, locale, route))
                main data-reveal-context=(reveal_context) {
                    (content)
                }
                (site_footer(site, locale))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header: brand, navigation and language switcher
fn site_header(site: &Site, locale: Locale, route: &str) -> Markup {
    html! {
        header.site-header {
            a.brand href=(href(locale, "")) { (site.manifest.config.site.name) }
            nav.site-nav {
                (render_nav(site.manifest, locale, route))
            }
            (language_switcher(site, locale, route))
        }
    }
}

/// Renders the navigation menu (hamburger on small screens)
fn render_nav(manifest: &Manifest, locale: Locale, route: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                (nav_link(locale, "", t(locale, TextKey::Home), route))
                @for page in manifest.nav_pages() {
                    @let variant = manifest.page_variant(&page.slug, locale).unwrap_or(page);
                    (nav_link(locale, &page_route(page), &variant.title, route))
                }
                (nav_link(locale, "blog/", t(locale, TextKey::Blog), route))
            }
        }
    }
}

fn nav_link(locale: Locale, target: &str, label: &str, current: &str) -> Markup {
    let is_current = if target.is_empty() {
        current.is_empty()
    } else {
        current.starts_with(target)
    };
    html! {
        li class=[is_current.then_some("current")] {
            a href=(href(locale, target)) { (label) }
        }
    }
}

/// Links to the same route in every configured locale.
fn language_switcher(site: &Site, locale: Locale, route: &str) -> Markup {
    html! {
        nav.language-switcher aria-label=(t(locale, TextKey::Language)) {
            @for other in site.manifest.config.ordered_locales() {
                a href=(href(other, route)) hreflang=(other.code())
                    class=[(other == locale).then_some("current")] {
                    (other.display_name())
                }
            }
        }
    }
}

fn site_footer(site: &Site, locale: Locale) -> Markup {
    let config = &site.manifest.config;
    let contact = &config.contact;
    html! {
        footer.site-footer.reveal data-reveal-id="footer" {
            div.footer-about {
                span.brand { (config.site.name) }
                p { (t(locale, TextKey::CompanyDescription)) }
            }
            div.footer-contact {
                h4 { (t(locale, TextKey::Contact)) }
                @if !contact.email.is_empty() {
                    a href={ "mailto:" (contact.email) } { (contact.email) }
                }
                @if !contact.phone.is_empty() {
                    span { (contact.phone) }
                }
                @if !contact.address.is_empty() {
                    span { (contact.address) }
                }
                span { (t(locale, TextKey::BusinessHours)) }
                span { (t(locale, TextKey::ShippingInfo)) }
            }
            div.footer-bottom {
                span { (t(locale, TextKey::AllRightsReserved)) }
                span { (t(locale, TextKey::CraftedWithTradition)) }
            }
        }
    }
}

fn category_badge(category: Option<&Category>, locale: Locale) -> Markup {
    html! {
        @if let Some(category) = category {
            span class={ "category-badge color-" (category.color) } {
                (category.name.get(locale))
            }
        }
    }
}

fn post_meta(locale: Locale, post: &Post) -> Markup {
    html! {
        div.post-meta {
            @if !post.author.is_empty() {
                span.author { (post.author) }
            }
            time datetime=(post.date.format("%Y-%m-%d").to_string()) {
                (format_display_date(post.date, locale))
            }
            span.read-time { (localized_read_time(locale, post)) }
        }
    }
}

/// A post summary card. Each card is its own reveal target.
fn post_card(site: &Site, locale: Locale, post: &Post) -> Markup {
    let url = href(locale, &post_route(post));
    html! {
        article.post-card.reveal data-reveal-id={ "post-" (post.slug) } {
            @if !post.image.is_empty() {
                a.post-card-image href=(url) {
                    img src=(post.image) alt=(post.title) loading="lazy";
                }
            }
            div.post-card-body {
                (category_badge(site.blog.category_by_slug(&post.category), locale))
                h3 { a href=(url) { (post.title) } }
                p.excerpt { (post.excerpt) }
                (post_meta(locale, post))
                a.read-more href=(url) { (t(locale, TextKey::ReadMore)) }
            }
        }
    }
}

/// An image carousel. Renders nothing when there are no cards.
///
/// With a `period` the carousel advances on its own; without one it only
/// moves on prev/next/dot clicks.
fn carousel(id: &str, cards: &[CarouselCard], period: Option<Duration>, locale: Locale) -> Markup {
    html! {
        @if !cards.is_empty() {
            div.carousel data-carousel=(id)
                data-interval=[period.map(|p| p.as_millis())]
                data-length=(cards.len()) {
                div.carousel-track {
                    @for (i, card) in cards.iter().enumerate() {
                        figure.carousel-item.active[i == 0] data-index=(i) {
                            img src=(card.image) alt=(card.title.get(locale)) loading="lazy";
                            figcaption {
                                h3 { (card.title.get(locale)) }
                                p { (card.description.get(locale)) }
                            }
                        }
                    }
                }
                @if cards.len() > 1 {
                    button.carousel-prev type="button" data-carousel-prev
                        aria-label=(t(locale, TextKey::Previous)) { "‹" }
                    button.carousel-next type="button" data-carousel-next
                        aria-label=(t(locale, TextKey::Next)) { "›" }
                    div.carousel-dots {
                        @for i in 0..cards.len() {
                            button.carousel-dot.active[i == 0] type="button" data-carousel-dot=(i)
                                aria-label=(i + 1) {}
                        }
                    }
                }
            }
        }
    }
}

/// Hero fabric carousel, advancing on the configured period.
fn fabric_carousel(site: &Site, locale: Locale) -> Markup {
    carousel(
        "fabrics",
        &site.manifest.fabrics,
        Some(site.carousel_period),
        locale,
    )
}

/// One workshop: heading, description and a hand-driven gallery.
fn workshop_section(workshop: &Workshop, locale: Locale) -> Markup {
    let description = workshop.description.get(locale);
    html! {
        section.workshop.reveal id=(workshop.id) data-reveal-id={ "workshop-" (workshop.id) } {
            h2 { (workshop.title.get(locale)) }
            @if !description.is_empty() {
                p.section-description { (description) }
            }
            (carousel(&workshop.id, &workshop.cards, None, locale))
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Root `index.html`: sends visitors to the default locale.
fn render_redirect(default_locale: Locale) -> Markup {
    let target = href(default_locale, "");
    html! {
        (DOCTYPE)
        html lang=(default_locale.code()) {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (target) };
                link rel="canonical" href=(target);
                title { (default_locale.display_name()) }
            }
            body {
                a href=(target) { (default_locale.display_name()) }
            }
        }
    }
}

/// Home page: hero, fabric carousel and the latest articles
fn render_home(site: &Site, locale: Locale) -> Markup {
    let config = &site.manifest.config;
    let latest = site.blog.filtered_posts(ALL_CATEGORIES, "");

    let content = html! {
        section.hero.reveal data-reveal-id="hero" {
            h1 { (t(locale, TextKey::HeroTitle)) }
            p.hero-subtitle { (t(locale, TextKey::HeroSubtitle)) }
            a.button href="#products" { (t(locale, TextKey::ExploreFabrics)) }
        }
        section.products.reveal id="products" data-reveal-id="products" {
            h2 { (t(locale, TextKey::OurPremiumFabrics)) }
            p.section-description { (t(locale, TextKey::ProductsDescription)) }
            (fabric_carousel(site, locale))
        }
        section.latest-articles.reveal data-reveal-id="latest-articles" {
            h2 { (t(locale, TextKey::LatestArticles)) }
            @if latest.is_empty() {
                p.empty { (t(locale, TextKey::NoArticlesAvailable)) }
            } @else {
                div.post-grid {
                    @for post in latest.iter().take(config.blog.latest_on_home) {
                        (post_card(site, locale, post))
                    }
                }
                a.button href=(href(locale, "blog/")) { (t(locale, TextKey::ReadMore)) }
            }
        }
    };

    base_document(site, locale, &config.site.name, None, "", "home", content)
}

/// Blog listing, either all posts or one category
fn render_blog_index(site: &Site, locale: Locale, category: Option<&Category>) -> Markup {
    let token = category.map_or(ALL_CATEGORIES, |c| c.slug.as_str());
    let posts = site.blog.filtered_posts(token, "");
    let route = category.map_or_else(|| "blog/".to_string(), category_route);
    let title = category.map_or(t(locale, TextKey::Blog), |c| c.name.get(locale).as_str());
    let featured = if category.is_none() {
        site.blog.featured_post()
    } else {
        None
    };
    let grid: Vec<&Post> = posts
        .iter()
        .copied()
        .filter(|p| featured.is_none_or(|f| f.id != p.id))
        .collect();

    let content = html! {
        section.blog-hero.reveal data-reveal-id="blog-hero" {
            h1 { (t(locale, TextKey::TextileInsights)) }
            p { (t(locale, TextKey::BlogHeroDescription)) }
        }
        nav.category-filter {
            a href=(href(locale, "blog/")) class=[category.is_none().then_some("current")] {
                (t(locale, TextKey::All))
            }
            @for c in site.blog.categories() {
                @let is_current = category.is_some_and(|sel| sel.slug == c.slug);
                a href=(href(locale, &category_route(c))) class=[is_current.then_some("current")] {
                    (c.name.get(locale))
                }
            }
        }
        @if let Some(post) = featured {
            @let url = href(locale, &post_route(post));
            section.featured-post.reveal data-reveal-id="featured" {
                span.featured-label { (t(locale, TextKey::Featured)) }
                @if !post.image.is_empty() {
                    img src=(post.image) alt=(post.title);
                }
                div.featured-body {
                    (category_badge(site.blog.category_by_slug(&post.category), locale))
                    h2 { a href=(url) { (post.title) } }
                    p.excerpt { (post.excerpt) }
                    (post_meta(locale, post))
                    a.button href=(url) { (t(locale, TextKey::ReadArticle)) }
                }
            }
        }
        section.post-list {
            h2 { (t(locale, TextKey::LatestArticles)) }
            @if !grid.is_empty() {
                div.post-grid {
                    @for post in &grid {
                        (post_card(site, locale, post))
                    }
                }
            } @else if featured.is_none() {
                p.empty {
                    @match category {
                        Some(c) => { (t(locale, TextKey::NoArticlesCategory)) " " (c.name.get(locale)) }
                        None => { (t(locale, TextKey::NoArticlesAvailable)) }
                    }
                }
            }
        }
    };

    let context = format!("blog:{token}");
    base_document(site, locale, title, None, &route, &context, content)
}

/// A single article with its related posts
fn render_post_page(site: &Site, locale: Locale, post: &Post) -> Markup {
    let related = site
        .blog
        .related_posts(post, site.manifest.config.blog.related_limit);
    let route = post_route(post);
    let title = post.seo.meta_title.as_deref().unwrap_or(&post.title);
    let description = post
        .seo
        .meta_description
        .as_deref()
        .unwrap_or(&post.excerpt);

    let content = html! {
        article.post {
            a.back-link href=(href(locale, "blog/")) { "← " (t(locale, TextKey::BackToBlog)) }
            header.post-header.reveal data-reveal-id="post-header" {
                (category_badge(site.blog.category_by_slug(&post.category), locale))
                h1 { (post.title) }
                (post_meta(locale, post))
            }
            @if !post.image.is_empty() {
                img.post-image src=(post.image) alt=(post.title);
            }
            div.post-content.reveal data-reveal-id="post-content" {
                (PreEscaped(markdown_to_html(&post.content)))
            }
            @if !post.tags.is_empty() {
                div.post-tags {
                    h4 { (t(locale, TextKey::Tags)) }
                    ul {
                        @for tag in &post.tags {
                            li.tag { "#" (tag) }
                        }
                    }
                }
            }
        }
        @if !related.is_empty() {
            section.related-posts.reveal data-reveal-id="related" {
                h2 { (t(locale, TextKey::RelatedArticles)) }
                div.post-grid {
                    @for other in &related {
                        (post_card(site, locale, other))
                    }
                }
            }
        }
    };

    let context = format!("post:{}", post.slug);
    base_document(site, locale, title, Some(description), &route, &context, content)
}

/// A static page from `pages/`.
///
/// Every `## ` section is its own reveal target. Workshop galleries hosted
/// by the page follow its text.
fn render_page(site: &Site, locale: Locale, page: &Page) -> Markup {
    let route = page_route(page);
    let galleries = site.manifest.galleries_for(&page.slug);
    let sections: Vec<(String, &str)> = page_sections(&page.body)
        .into_iter()
        .enumerate()
        .map(|(i, section)| match i {
            0 => (format!("page-{}", page.slug), section),
            _ => (format!("page-{}-{}", page.slug, i), section),
        })
        .collect();
    let content = html! {
        article.page-content {
            @for (id, section) in &sections {
                section.page-section.reveal data-reveal-id=(id) {
                    (PreEscaped(markdown_to_html(section)))
                }
            }
        }
        @if !galleries.is_empty() {
            div.workshops {
                @for workshop in galleries {
                    (workshop_section(workshop, locale))
                }
            }
        }
    };
    let context = format!("page:{}", page.slug);
    base_document(site, locale, &page.title, None, &route, &context, content)
}

// ============================================================================
// Tests
// ============================================================================

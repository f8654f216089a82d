//! # Textile Site
//!
//! A static site generator for a multilingual textile-manufacturer website:
//! a marketing home page with a fabric carousel, a blog with category
//! filtering and search, and a handful of static pages, rendered once per
//! locale (English, Russian, Uzbek).
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Content flows through two independent stages joined by a JSON manifest:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → validated data)
//! 2. Generate  manifest  →  dist/xx/...      (one HTML tree per locale)
//! ```
//!
//! The manifest is human-readable and can be inspected between stages.
//! Blog queries ([`blog::Blog`]) are pure functions over the manifest's posts
//! and categories, so listing pages, category pages, related articles and the
//! `posts` command all share one implementation.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads posts, categories, fabrics, workshops and pages, validates them, produces the manifest |
//! | [`generate`] | Stage 2: renders every locale's HTML tree from the manifest using Maud |
//! | [`blog`] | Published-post queries: category filter, search, featured, related, read time |
//! | [`reveal`] | One-shot scroll reveal and carousel state, mirrored by the inline page script |
//! | [`store`] | Post mutation behind a [`store::ContentStore`] trait (memory and content directory) |
//! | [`i18n`] | Locales, the UI string table and localized dates |
//! | [`config`] | `config.toml` loading, validation, merging and CSS color generation |
//! | [`types`] | Shared data types and the `+++` front matter format |
//! | [`naming`] | `NNN-name[.xx]` page filename convention and slug rules |
//! | [`output`] | CLI output formatting: information-first listings |
//!
//! # Design Decisions
//!
//! ## Content as Files
//!
//! Posts are markdown files with TOML front matter under `posts/`. Categories,
//! fabric cards and workshop galleries live in small TOML files, and pages
//! use the numeric prefix convention for nav order. The content directory is the database;
//! the admin commands edit it through [`store::DirStore`].
//!
//! ## Compile-Time Translations
//!
//! Every UI string is a [`i18n::TextKey`] variant and [`i18n::t`] is an
//! exhaustive match, so a missing translation is a build error rather than a
//! blank on the page.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a compile error, interpolation is escaped by default and there is no
//! template directory to ship.
//!
//! ## No Client Framework
//!
//! The output is plain HTML, one stylesheet and a short inline script for the
//! scroll reveal and carousel. Without `IntersectionObserver` every section is
//! shown immediately.

pub mod blog;
pub mod config;
pub mod generate;
pub mod i18n;
pub mod naming;
pub mod output;
pub mod reveal;
pub mod scan;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

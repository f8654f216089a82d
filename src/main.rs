use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};
use textile_site::i18n::Locale;
use textile_site::store::{ContentStore, DirStore, PostDraft, PostEdit};
use textile_site::{blog, config, generate, output, scan};

#[derive(Parser)]
#[command(name = "textile-site")]
#[command(about = "Static site generator for a multilingual textile company site")]
#[command(long_about = "\
Static site generator for a multilingual textile company site

The content directory is the data source. Posts are markdown files with
TOML front matter. Categories, hero fabrics and workshop galleries are TOML
lists, and numbered markdown files become nav pages.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── categories.toml              # [[category]] id, name, description, translations
  ├── fabrics.toml                 # [[fabric]] hero carousel cards (optional)
  ├── workshops.toml               # [[workshop]] galleries on the production page (optional)
  ├── posts/                       # Blog posts, any depth, sorted by path
  │   └── sustainable.md           # +++ front matter +++ then markdown
  └── pages/
      ├── 010-products.md          # Page (numbered = shown in nav)
      ├── 030-contact.md
      ├── 030-contact.ru.md        # Russian variant
      └── privacy.md               # No number prefix = hidden from nav

Every locale gets its own tree: dist/en/, dist/ru/, dist/uz/.

Run 'textile-site gen-config' to generate a documented config.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".textile-site-temp", global = true)]
    temp_dir: PathBuf,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the scanned manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// List published posts, newest first
    Posts {
        /// Category slug, or "All"
        #[arg(long, default_value = blog::ALL_CATEGORIES)]
        category: String,
        /// Case-insensitive match on title, excerpt and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Locale for dates
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Show one published post and its related posts
    Post {
        slug: String,
        /// Locale for dates and category names
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Create, edit, publish and delete posts in the content directory
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List every post, drafts included
    List,
    /// Write a new post (a draft unless --publish)
    New(NewPostArgs),
    /// Change fields of an existing post; unset flags keep their value
    Edit(EditPostArgs),
    /// Mark a post as published
    Publish { id: String },
    /// Mark a post as a draft
    Unpublish { id: String },
    /// Delete a post file
    Delete { id: String },
}

#[derive(clap::Args)]
struct NewPostArgs {
    #[arg(long)]
    title: String,
    /// Category slug
    #[arg(long)]
    category: String,
    /// Publication date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Explicit slug, derived from the title otherwise
    #[arg(long)]
    slug: Option<String>,
    #[arg(long, default_value = "")]
    excerpt: String,
    #[arg(long, default_value = "")]
    author: String,
    /// Cover image URL
    #[arg(long, default_value = "")]
    image: String,
    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// Markdown file with the post body
    #[arg(long)]
    content_file: Option<PathBuf>,
    #[arg(long)]
    featured: bool,
    #[arg(long)]
    publish: bool,
}

#[derive(clap::Args)]
struct EditPostArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    excerpt: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Category slug
    #[arg(long)]
    category: Option<String>,
    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Cover image URL
    #[arg(long)]
    image: Option<String>,
    /// Comma-separated tags, replacing the current ones
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
    /// Markdown file with the new post body
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// true or false
    #[arg(long)]
    featured: Option<bool>,
    /// true or false
    #[arg(long)]
    published: Option<bool>,
}

impl EditPostArgs {
    fn into_edit(self) -> Result<(String, PostEdit), std::io::Error> {
        let content = self
            .content_file
            .map(std::fs::read_to_string)
            .transpose()?;
        let edit = PostEdit {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content,
            author: self.author,
            date: self.date,
            category: self.category,
            image: self.image,
            featured: self.featured,
            published: self.published,
            tags: self.tags,
        };
        Ok((self.id, edit))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_target(false)
        .init();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let summary = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&summary);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let summary = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Posts {
            category,
            search,
            locale,
        } => {
            let manifest = scan::scan(&cli.source)?;
            let locale = locale.unwrap_or(manifest.config.site.default_locale);
            let blog = manifest.blog();
            output::print_post_list(&blog.filtered_posts(&category, &search), locale);
        }
        Command::Post { slug, locale } => {
            let manifest = scan::scan(&cli.source)?;
            let locale = locale.unwrap_or(manifest.config.site.default_locale);
            let blog = manifest.blog();
            let post = blog
                .post_by_slug(&slug)
                .ok_or_else(|| format!("no published post with slug \"{slug}\""))?;
            let related = blog.related_posts(post, manifest.config.blog.related_limit);
            let category = blog.category_by_slug(&post.category);
            output::print_post_detail(post, category, &related, locale);
        }
        Command::Admin { command } => run_admin(command, &cli.source)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write the scan manifest into the temp directory and return its path.
fn write_manifest(
    manifest: &scan::Manifest,
    temp_dir: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}

fn run_admin(command: AdminCommand, source: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = DirStore::open(source)?;

    match command {
        AdminCommand::List => output::print_admin_list(&store.list()?),
        AdminCommand::New(args) => {
            let date = args
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut draft = PostDraft::new(args.title, args.category, date);
            draft.slug = args.slug;
            draft.excerpt = args.excerpt;
            draft.author = args.author;
            draft.image = args.image;
            draft.tags = args.tags;
            draft.featured = args.featured;
            draft.published = args.publish;
            if let Some(path) = args.content_file {
                draft.content = std::fs::read_to_string(path)?;
            }
            let post = store.create(draft)?;
            println!("{}", output::format_store_action("Created", &post));
        }
        AdminCommand::Edit(args) => {
            let (id, edit) = args.into_edit()?;
            if edit.is_empty() {
                return Err(format!("nothing to change for post \"{id}\"").into());
            }
            let post = store.edit(&id, edit)?;
            println!("{}", output::format_store_action("Updated", &post));
        }
        AdminCommand::Publish { id } => {
            let post = store.set_published(&id, true)?;
            println!("{}", output::format_store_action("Published", &post));
        }
        AdminCommand::Unpublish { id } => {
            let post = store.set_published(&id, false)?;
            println!("{}", output::format_store_action("Unpublished", &post));
        }
        AdminCommand::Delete { id } => {
            let post = store.delete(&id)?;
            println!("{}", output::format_store_action("Deleted", &post));
        }
    }
    Ok(())
}

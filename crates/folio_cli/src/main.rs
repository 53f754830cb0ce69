//! Folio command-line probe.
//!
//! # Responsibility
//! - Wire core collaborators in dependency order from a config file.
//! - Print catalog listings, the site map and navigation state.
//!
//! Usage: `folio_cli <config.json> [list|map|open <slug>|random|theme [light|dark|system]]`

use chrono::Utc;
use folio_core::{
    default_log_level, init_logging, FsPostSource, KeyValueStore, LogReporter, MemoryStore,
    RngSource, Site, SiteConfig, SqliteStore, ThemePreference,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str =
    "usage: folio_cli <config.json> [list|map|open <slug>|random|theme [light|dark|system]]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let Some(config_path) = args.first() else {
        return Err(USAGE.into());
    };
    let config = SiteConfig::load(config_path)?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let store: Arc<dyn KeyValueStore> = match config.state_db.as_ref() {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    let source = FsPostSource::from_config(&config);
    let fallback = source.index_modified_at().unwrap_or_else(Utc::now);
    let mut site = Site::new(source, store, Arc::new(LogReporter));
    site.reload(fallback)?;
    site.restore_last_viewed();
    info!(
        "event=cli_ready module=cli status=ok posts={}",
        site.catalog().len()
    );

    let command = args.get(1).map(String::as_str).unwrap_or("list");
    match command {
        "list" => print_list(&site),
        "map" => print_map(&site),
        "open" => {
            let slug = args.get(2).ok_or(USAGE)?;
            let post = site.open_post(slug)?;
            println!("# {}", post.title);
            println!("{} | {}", post.date.format("%Y-%m-%d"), post.category);
            println!();
            println!("{}", post.content.as_deref().unwrap_or(""));
            print_adjacent(&site);
        }
        "random" => match site.random_post(&mut RngSource::thread()) {
            Some(post) => println!("{}\t{}", post.slug, post.title),
            None => println!("no posts"),
        },
        "theme" => match args.get(2) {
            Some(value) => {
                let theme: ThemePreference = value.parse()?;
                site.set_theme(theme)?;
                println!("theme={theme}");
            }
            None => println!("theme={}", site.theme()),
        },
        other => return Err(format!("unknown command `{other}`\n{USAGE}").into()),
    }
    Ok(())
}

fn print_list(site: &Site<FsPostSource>) {
    if site.most_recent().is_none() {
        println!("no posts");
        return;
    }
    let current = site.navigation().current_slug();
    for summary in site.summaries() {
        let marker = if current == Some(summary.slug.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {}  {:<24} {:<12} {}",
            summary.date.format("%Y-%m-%d"),
            summary.slug,
            summary.category,
            summary.title
        );
        if let Some(text) = summary.preview.preview_text {
            println!("      {text}");
        }
    }
}

fn print_map(site: &Site<FsPostSource>) {
    for section in site.site_map() {
        println!("[{}]", section.category);
        for entry in section.posts {
            let marker = if entry.is_current { ">" } else { "-" };
            println!("  {marker} {} ({})", entry.title, entry.slug);
        }
    }
}

fn print_adjacent(site: &Site<FsPostSource>) {
    let adjacent = site.navigation().adjacent();
    if let Some(previous) = adjacent.previous {
        println!("<- {}", previous.title);
    }
    if let Some(next) = adjacent.next {
        println!("-> {}", next.title);
    }
}

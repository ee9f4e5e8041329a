//! iarchive CLI
//!
//! Local entry point for browsing archive items and running searches.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use iarchive::{
    config,
    error::Result,
    models::{Config, FileFormat, Item, MediaType, SearchResultPage, TopCollectionType, lenient},
    query::SearchField,
    services::ArchiveService,
};

/// iarchive - Internet Archive client
#[derive(Parser, Debug)]
#[command(name = "iarchive", version, about = "Internet Archive metadata and search client")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve canned payloads instead of calling the archive
    #[arg(long)]
    mock: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show an item and its audio files
    Item {
        identifier: String,

        /// Also resolve the collections the item belongs to
        #[arg(long)]
        collections: bool,
    },

    /// Search the archive
    Search {
        text: String,

        /// Match the text against creators only
        #[arg(long)]
        creator: bool,

        /// Media types to include (repeatable), e.g. audio, etree, movies
        #[arg(long = "media")]
        media: Vec<String>,

        /// File format filter, e.g. "VBR MP3"
        #[arg(long)]
        format: Option<String>,

        /// Restrict to one collection
        #[arg(long)]
        collection: Option<String>,

        #[arg(long)]
        rows: Option<u32>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Use the page production backend
        #[arg(long)]
        alternate: bool,

        /// Resolve the collections referenced by each result
        #[arg(long)]
        resolve_collections: bool,
    },

    /// List top-level collections (audio, movies or texts)
    Collections { kind: TopCollectionType },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;
    let config = config::with_mode(config, cli.mock);
    log::debug!("Service mode: {:?}", config.service.mode);

    match cli.command {
        Command::Validate => {
            log::info!("Configuration is valid");
            println!("{}", config_summary(&config));
        }

        Command::Item {
            identifier,
            collections,
        } => {
            let service = ArchiveService::new(&config)?;
            let item = if collections {
                service.item_with_collections(&identifier).await?
            } else {
                service.item(&identifier).await?
            };
            print_item(&service, &item);
        }

        Command::Search {
            text,
            creator,
            media,
            format,
            collection,
            rows,
            page,
            alternate,
            resolve_collections,
        } => {
            let service = ArchiveService::new(&config)?;
            let mut request = service.search_request(text).page(page);
            if creator {
                request = request.field(SearchField::Creator);
            }
            if !media.is_empty() {
                request = request.media_types(
                    media
                        .iter()
                        .map(|m| lenient::lookup::<MediaType>(m))
                        .collect(),
                );
            }
            if let Some(format) = format {
                request = request.format(lenient::lookup::<FileFormat>(&format));
            }
            if let Some(collection) = collection {
                request = request.collection(collection);
            }
            if let Some(rows) = rows {
                request = request.rows(rows);
            }

            let mut results = if alternate {
                service.search_alternate(&request).await?
            } else {
                service.search(&request).await?
            };
            if resolve_collections {
                results = service.resolve_collections(results).await;
            }
            print_page(&results);
        }

        Command::Collections { kind } => {
            let service = ArchiveService::new(&config)?;
            let results = service.top_collections(kind).await?;
            print_page(&results);
        }
    }

    Ok(())
}

fn config_summary(config: &Config) -> String {
    format!(
        "mode={:?} metadata={} search={} rows={} excluded={}",
        config.service.mode,
        config.endpoints.metadata,
        config.endpoints.search,
        config.search.default_rows,
        config.search.excluded_collections.join(",")
    )
}

fn print_item(service: &ArchiveService, item: &Item) {
    let endpoints = service.endpoints();
    println!("{}", item.title().unwrap_or(item.identifier()));
    println!("  identifier: {}", item.identifier());
    println!("  media type: {}", item.metadata.media_type);
    if let Some(creator) = item.display_creator() {
        println!("  creator:    {creator}");
    }
    let date = item.display_date();
    if !date.is_empty() {
        println!("  date:       {date}");
    }
    println!("  art:        {}", item.preferred_album_art(endpoints));

    for collection in &item.collection_archives {
        println!(
            "  in:         {} ({})",
            collection.title().unwrap_or(collection.identifier()),
            collection.identifier()
        );
    }

    for file in item.sorted_non78_audio() {
        println!(
            "  {:>3}  {:<40} {:>8}  {:>8} MB",
            file.cleaned_track().map(|t| t.to_string()).unwrap_or_default(),
            file.display_name(),
            file.display_length().unwrap_or_default(),
            file.display_size().unwrap_or_default(),
        );
    }
}

fn print_page(page: &SearchResultPage) {
    println!("{} found, starting at {}", page.num_found, page.start);
    for doc in &page.docs {
        println!(
            "{}  {}  [{}]",
            doc.identifier,
            doc.title.as_deref().unwrap_or_default(),
            doc.media_type
        );
        if let Some(creator) = doc.display_creator() {
            println!("    by {creator}");
        }
        for collection in &doc.collection_archives {
            println!(
                "    in {}",
                collection.title().unwrap_or(collection.identifier())
            );
        }
    }
}

mod echo;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use kaede_core::formatters::responses;
use kaede_core::{
    CardKind, CatalogConfig, DEFAULT_BASE_URL, Document, Envelope, FetchConfig, HttpCatalog, HttpTransport,
    SearchResults, TokioSleeper, aggregate, extract_anime_list, extract_home, extract_listing, fetch, parse_page,
    to_json_string,
};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::echo::{
    format_size, print_banner, print_detail, print_info, print_step, print_success, print_timing, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which catalog page to scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Home,
    Complete,
    Ongoing,
    AnimeList,
    Search,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "complete" => Ok(Self::Complete),
            "ongoing" => Ok(Self::Ongoing),
            "anime-list" | "list" => Ok(Self::AnimeList),
            "search" => Ok(Self::Search),
            _ => Err(format!(
                "Invalid page: {}. Valid options: home, complete, ongoing, anime-list, search",
                s
            )),
        }
    }
}

/// Scrape anime catalog pages into the same JSON envelope the server returns
#[derive(Parser, Debug)]
#[command(name = "kaede")]
#[command(version)]
#[command(about = "Scrape anime catalog pages into JSON", long_about = None)]
struct Args {
    /// Page to scrape (home, complete, ongoing, anime-list, search)
    #[arg(value_name = "PAGE")]
    target: Target,

    /// URL to fetch, local HTML file, or "-" for stdin (default: live site)
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Listing page number; anything but a positive number means 1
    #[arg(short, long, default_value = "1", value_name = "NUM")]
    page: String,

    /// Search query (search only)
    #[arg(short, long, value_name = "TEXT")]
    query: Option<String>,

    /// Root URL of the catalog site
    #[arg(long, default_value = DEFAULT_BASE_URL, value_name = "URL")]
    base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON envelope
    #[arg(long)]
    pretty: bool,

    /// Print progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn card_kind(&self) -> Option<CardKind> {
        match self.target {
            Target::Complete => Some(CardKind::Complete),
            Target::Ongoing => Some(CardKind::Ongoing),
            _ => None,
        }
    }

    fn search_query(&self) -> anyhow::Result<&str> {
        match self.query.as_deref() {
            Some(q) if !q.trim().is_empty() => Ok(q),
            _ => bail!("search needs a query: pass --query <TEXT>"),
        }
    }
}

fn render<T: Serialize>(envelope: &Envelope<T>, pretty: bool) -> anyhow::Result<String> {
    to_json_string(envelope, pretty).context("Failed to serialize envelope")
}

/// Reads HTML from stdin, a URL, or a file.
async fn read_input(input: &str, config: &FetchConfig, catalog: &HttpCatalog, verbose: bool) -> anyhow::Result<String> {
    if input == "-" {
        if verbose {
            print_step(1, 3, "Reading from stdin");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
        return Ok(buffer);
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        if verbose {
            print_step(1, 3, &format!("Fetching from {}", input.bright_white().underline()));
        }
        let referer = fetch::parse_url(catalog.base_url())?;
        let transport = HttpTransport::new(config, &referer).context("Failed to build HTTP client")?;
        let page = fetch::fetch_with_retry(&transport, &TokioSleeper, &config.retry, input)
            .await
            .context("Failed to fetch URL")?;
        return Ok(page.body);
    }

    if verbose {
        print_step(1, 3, &format!("Reading from file {}", input.bright_white()));
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read file: {}", input))
}

/// Runs the extractors over already-loaded HTML.
fn scrape_document(args: &Args, html: &str, source: &str, base_url: &str) -> anyhow::Result<String> {
    if args.verbose {
        print_detail("Size", format_size(html.len()));
        eprintln!();
        print_step(2, 3, "Parsing HTML document");
    }

    let started = Instant::now();
    let doc = Document::parse(html);
    if args.verbose {
        if let Some(title) = doc.title() {
            print_detail("Title", title);
        }
        print_timing("Parse", started.elapsed());
        eprintln!();
        print_step(3, 3, "Extracting records");
    }

    let started = Instant::now();
    let page = parse_page(&args.page);
    let output = match args.target {
        Target::Home => {
            let lists = extract_home(&doc, base_url)?;
            report_count(args.verbose, lists.on_going.len() + lists.complete.len());
            render(&responses::home(lists, source), args.pretty)?
        }
        Target::Complete | Target::Ongoing => {
            let kind = args.card_kind().unwrap_or(CardKind::Complete);
            let cards = extract_listing(&doc, kind, base_url)?;
            report_count(args.verbose, cards.len());
            render(&responses::listing(kind, cards, page, source), args.pretty)?
        }
        Target::AnimeList => {
            let entries = extract_anime_list(&doc, base_url)?;
            report_count(args.verbose, entries.len());
            render(&responses::anime_list(entries, source), args.pretty)?
        }
        Target::Search => {
            let query = aggregate::normalize_query(args.search_query()?);
            let entries = extract_anime_list(&doc, base_url)?;
            let results = aggregate::search(&entries, &query);
            report_count(args.verbose, results.len());
            let found = SearchResults { query, results, total_checked: entries.len() };
            render(&responses::search(found), args.pretty)?
        }
    };

    if args.verbose {
        print_timing("Extract", started.elapsed());
        eprintln!();
    }

    Ok(output)
}

/// Fetches the live page through the retrying catalog pipeline.
async fn scrape_live(args: &Args, catalog: &HttpCatalog) -> anyhow::Result<String> {
    if args.verbose {
        print_step(1, 1, &format!("Scraping {}", catalog.base_url().bright_white().underline()));
    }

    let output = match args.target {
        Target::Home => {
            let lists = catalog.home().await.context("Failed to fetch homepage data")?;
            report_count(args.verbose, lists.on_going.len() + lists.complete.len());
            render(&responses::home(lists, &catalog.home_url()), args.pretty)?
        }
        Target::Complete | Target::Ongoing => {
            let kind = args.card_kind().unwrap_or(CardKind::Complete);
            let page = parse_page(&args.page);
            let cards = catalog.listing(kind, page).await.context(responses::listing_error_message(kind))?;
            report_count(args.verbose, cards.len());
            render(&responses::listing(kind, cards, page, &catalog.listing_url(kind, page)), args.pretty)?
        }
        Target::AnimeList => {
            let entries = catalog.anime_list().await.context("Failed to fetch anime list")?;
            report_count(args.verbose, entries.len());
            render(&responses::anime_list(entries, &catalog.anime_list_url()), args.pretty)?
        }
        Target::Search => {
            let found = catalog.search(args.search_query()?).await.context("Failed to search anime")?;
            report_count(args.verbose, found.results.len());
            render(&responses::search(found), args.pretty)?
        }
    };

    Ok(output)
}

fn report_count(verbose: bool, count: usize) {
    if !verbose {
        return;
    }
    if count == 0 {
        print_warning("No records found");
    } else {
        print_detail("Records", count);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.verbose {
        print_banner();
        print_info(&format!("Base URL {}", args.base_url));
        eprintln!();
    }

    let fetch_config = FetchConfig { timeout: args.timeout, ..Default::default() };
    let config = CatalogConfig { base_url: args.base_url.clone(), fetch: fetch_config.clone() };
    let catalog = HttpCatalog::new(config).context("Invalid base URL")?;

    let output = match args.input.as_deref() {
        Some(input) => {
            let html = read_input(input, &fetch_config, &catalog, args.verbose).await?;
            let source = if input == "-" { catalog.base_url() } else { input };
            scrape_document(&args, &html, source, catalog.base_url())?
        }
        None => scrape_live(&args, &catalog).await?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            if args.verbose {
                print_success(&format!("Output written to {}", path.display().bright_white()));
            }
        }
        None => println!("{}", output),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!("home".parse::<Target>(), Ok(Target::Home));
        assert_eq!("Anime-List".parse::<Target>(), Ok(Target::AnimeList));
        assert!("movies".parse::<Target>().is_err());
    }

    #[test]
    fn test_search_requires_query() {
        let args = Args::try_parse_from(["kaede", "search"]).unwrap();
        assert!(args.search_query().is_err());

        let args = Args::try_parse_from(["kaede", "search", "-q", "naruto"]).unwrap();
        assert_eq!(args.search_query().unwrap(), "naruto");
    }
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use skinscrape::{
    config::{Config, Engine},
    crawl::WebImageCrawler,
    info_time,
    process::process_entities,
    report::read_report,
    Result, DEFAULT_OUTPUT_DIR, DEFAULT_REPORT_PATH, DOWNLOADER_THREADS, IMAGES_PER_SEARCH,
    MIN_IMAGE_SIZE, QUERY_SUFFIX, TEST_MODE_ENTITIES,
};

/// Downloads web images for every disease listed in a count report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Report listing one `<disease> <count>` per line
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    input: PathBuf,
    /// Directory receiving one folder per disease
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,
    /// Number of images to download per search term
    #[arg(short = 'n', long, default_value_t = IMAGES_PER_SEARCH)]
    per_search: usize,
    /// Image search engine
    #[arg(short, long, value_enum, default_value_t = Engine::Bing)]
    engine: Engine,
    /// Concurrent image downloads per search
    #[arg(short, long, default_value_t = DOWNLOADER_THREADS)]
    threads: usize,
    /// Minimum image width in pixels
    #[arg(long, default_value_t = MIN_IMAGE_SIZE.0)]
    min_width: u32,
    /// Minimum image height in pixels
    #[arg(long, default_value_t = MIN_IMAGE_SIZE.1)]
    min_height: u32,
    /// Words appended to every disease name in the search query
    #[arg(long, default_value = QUERY_SUFFIX)]
    query_suffix: String,
    /// Process at most this many diseases
    #[arg(short, long)]
    limit: Option<usize>,
    /// Only scrape the first few diseases, without asking
    #[arg(long, conflicts_with = "yes")]
    test: bool,
    /// Start without asking for confirmation
    #[arg(short, long)]
    yes: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            input: args.input,
            output_dir: args.output,
            images_per_search: args.per_search,
            engine: args.engine,
            downloader_threads: args.threads,
            min_size: (args.min_width, args.min_height),
            query_suffix: args.query_suffix,
            limit: args.limit,
        }
    }
}

enum Confirmation {
    Start,
    Test,
    Cancel,
}

fn ask_confirmation() -> Result<Confirmation> {
    print!("Start scraping? (y/n/test for first {TEST_MODE_ENTITIES} only): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "y" => Confirmation::Start,
        "test" => Confirmation::Test,
        _ => Confirmation::Cancel,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let args = Args::parse();
    let (test, yes) = (args.test, args.yes);
    let mut config = Config::from(args);
    config.validate()?;

    println!("{}", "=".repeat(60));
    println!("Image Scraper for Skin Diseases");
    println!("{}", "=".repeat(60));

    let names = read_report(&config.input).await?;
    println!();
    println!("Found {} diseases to scrape", names.len());
    println!("Output directory: {}", config.output_dir.display());
    println!("Images per disease: {}", config.images_per_search);
    println!("Search engine: {}", config.engine);

    println!("\nDiseases to scrape (first 5 shown):");
    for name in names.iter().take(5) {
        println!("   - {name}");
    }
    if names.len() > 5 {
        println!("   ... and {} more", names.len() - 5);
    }

    let planned = config.limit.unwrap_or(names.len()).min(names.len());
    println!(
        "\nThis will attempt to download ~{} images.",
        planned * config.images_per_search
    );

    let confirmation = if test {
        Confirmation::Test
    } else if yes {
        Confirmation::Start
    } else {
        ask_confirmation()?
    };
    match confirmation {
        Confirmation::Start => {}
        Confirmation::Test => {
            println!("Running test mode with first {TEST_MODE_ENTITIES} diseases...");
            let limit = config
                .limit
                .map_or(TEST_MODE_ENTITIES, |l| l.min(TEST_MODE_ENTITIES));
            config.limit = Some(limit);
        }
        Confirmation::Cancel => {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let crawler = WebImageCrawler::from_config(&config)?;
    let summary = process_entities(&config, &crawler, &names).await?;

    println!("\n{}", "=".repeat(60));
    println!("SCRAPING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total diseases processed: {}", summary.results.len());
    println!("Total images downloaded: {}", summary.total_downloaded());
    println!("Output directory: {}", summary.output_dir.display());

    let failed: Vec<_> = summary.failed().collect();
    if !failed.is_empty() {
        println!("\nDiseases with no images downloaded ({}):", failed.len());
        for result in failed {
            println!("   - {}", result.name);
        }
    }

    info_time!(start_time, "Full program time:");
    Ok(())
}

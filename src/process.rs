use std::path::PathBuf;

use chrono::Local;

use crate::config::Config;
use crate::crawl::ImageFetcher;
use crate::fs::count_files;
use crate::report::read_report;
use crate::sanitize::sanitize_folder_name;
use crate::{info_time, warn_time, Result};

/// Outcome for a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityResult {
    pub name: String,
    /// Empty when the name had no usable characters and was skipped.
    pub folder: String,
    pub downloaded: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub results: Vec<EntityResult>,
}

impl RunSummary {
    pub fn total_downloaded(&self) -> usize {
        self.results.iter().map(|r| r.downloaded).sum()
    }

    /// Entities that ended up without any new image.
    pub fn failed(&self) -> impl Iterator<Item = &EntityResult> {
        self.results.iter().filter(|r| r.downloaded == 0)
    }
}

/// Reads the report named in `config` and crawls images for every entity in it.
pub async fn process_report(config: &Config, fetcher: &dyn ImageFetcher) -> Result<RunSummary> {
    config.validate()?;
    let names = read_report(&config.input).await?;
    process_entities(config, fetcher, &names).await
}

/// Crawls images for `names` in order, one folder per name under `config.output_dir`.
/// A failing entity is logged and recorded with zero downloads; the run goes on.
pub async fn process_entities(
    config: &Config,
    fetcher: &dyn ImageFetcher,
    names: &[String],
) -> Result<RunSummary> {
    let start_time = Local::now();
    let names = match config.limit {
        Some(limit) => &names[..limit.min(names.len())],
        None => names,
    };

    tokio::fs::create_dir_all(&config.output_dir).await?;
    info_time!(
        "Started scraping {} entities into {}",
        names.len(),
        config.output_dir.display()
    );

    let mut results = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        info_time!("[{}/{}] {}", i + 1, names.len(), name);
        results.push(process_entity(config, fetcher, name).await);
    }

    let summary = RunSummary {
        output_dir: config.output_dir.clone(),
        results,
    };
    info_time!(
        start_time,
        "Finished {} entities, {} images downloaded.",
        summary.results.len(),
        summary.total_downloaded()
    );
    Ok(summary)
}

async fn process_entity(config: &Config, fetcher: &dyn ImageFetcher, name: &str) -> EntityResult {
    let folder = sanitize_folder_name(name);
    if folder.is_empty() {
        warn_time!("No usable folder name for {name:?}, skipping");
        return EntityResult {
            name: name.to_string(),
            folder,
            downloaded: 0,
        };
    }

    let downloaded = match scrape_entity(config, fetcher, name, &folder).await {
        Ok(downloaded) => {
            info_time!("Downloaded {downloaded} images for {name}");
            downloaded
        }
        Err(e) => {
            warn_time!("Error while scraping {name}: {e}");
            0
        }
    };

    EntityResult {
        name: name.to_string(),
        folder,
        downloaded,
    }
}

async fn scrape_entity(
    config: &Config,
    fetcher: &dyn ImageFetcher,
    name: &str,
    folder: &str,
) -> Result<usize> {
    let dest = config.output_dir.join(folder);
    tokio::fs::create_dir_all(&dest).await?;

    let query = config.search_query(name);
    info_time!("Query: {query}");
    info_time!("Folder: {folder}/");

    let existing = count_files(&dest).await?;
    let reported = fetcher
        .fetch(&query, config.images_per_search, config.min_size, &dest)
        .await?;
    let downloaded = count_files(&dest).await?.saturating_sub(existing);
    if reported != downloaded {
        warn_time!("Fetcher reported {reported} saved images, folder grew by {downloaded}");
    }
    Ok(downloaded)
}

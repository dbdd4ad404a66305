use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::{
    Error, Result, DEFAULT_OUTPUT_DIR, DEFAULT_REPORT_PATH, DOWNLOADER_THREADS, IMAGES_PER_SEARCH,
    MIN_IMAGE_SIZE, QUERY_SUFFIX,
};

/// Image search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Engine {
    /// More reliable for automated scraping.
    #[default]
    Bing,
    Google,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Bing => write!(f, "Bing"),
            Engine::Google => write!(f, "Google"),
        }
    }
}

/// Everything a run needs, passed explicitly into [`crate::process::process_report`].
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub images_per_search: usize,
    pub engine: Engine,
    pub downloader_threads: usize,
    /// (width, height)
    pub min_size: (u32, u32),
    pub query_suffix: String,
    /// Process at most this many entities.
    pub limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_REPORT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            images_per_search: IMAGES_PER_SEARCH,
            engine: Engine::default(),
            downloader_threads: DOWNLOADER_THREADS,
            min_size: MIN_IMAGE_SIZE,
            query_suffix: QUERY_SUFFIX.to_string(),
            limit: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.images_per_search == 0 {
            return Err(Error::Config("images per search must be at least 1".into()));
        }
        if self.downloader_threads == 0 {
            return Err(Error::Config("downloader threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Builds the search query for a single entity name.
    pub fn search_query(&self, name: &str) -> String {
        let suffix = self.query_suffix.trim();
        if suffix.is_empty() {
            name.to_string()
        } else {
            format!("{name} {suffix}")
        }
    }
}

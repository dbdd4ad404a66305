//! The image search collaborator.
//!
//! The orchestration loop only ever talks to [`ImageFetcher`]; [`WebImageCrawler`]
//! is the real implementation that queries Bing or Google image search and saves
//! the results into a folder.

mod candidates;
mod parse;
mod request;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{Config, Engine};
use crate::{info_time, Result};

use self::candidates::{collect_candidates, ResultPages};
use self::request::{download_images, request_page_html};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BING_SEARCH_URL: &str = "https://www.bing.com/images/async";
const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
/// Results per Bing page.
const BING_PAGE_SIZE: usize = 35;
/// Hard cap on result pages requested per query.
const MAX_RESULT_PAGES: usize = 10;
/// Extra candidates collected beyond `max_count`, since some downloads always fail.
const CANDIDATE_SLACK: usize = 2;

/// Searches for images and saves them into `dest`.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Returns the number of image files saved.
    async fn fetch(
        &self,
        query: &str,
        max_count: usize,
        min_size: (u32, u32),
        dest: &Path,
    ) -> Result<usize>;
}

/// Crawls a web image search engine with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct WebImageCrawler {
    client: Client,
    engine: Engine,
    downloader_threads: usize,
}

impl WebImageCrawler {
    pub fn new(engine: Engine, downloader_threads: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            engine,
            downloader_threads: downloader_threads.max(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.engine, config.downloader_threads)
    }
}

/// Result pages of a single query on the crawler's engine.
struct SearchPages<'a> {
    crawler: &'a WebImageCrawler,
    query: &'a str,
    min_size: (u32, u32),
}

#[async_trait]
impl<'a> ResultPages for SearchPages<'a> {
    async fn page(&self, page: usize) -> Result<Vec<String>> {
        let client = &self.crawler.client;
        match self.crawler.engine {
            Engine::Bing => {
                let params = bing_params(self.query, page, self.min_size);
                let html = request_page_html(client, BING_SEARCH_URL, &params).await?;
                parse::parse_bing_page(&html)
            }
            Engine::Google => {
                let params = google_params(self.query, page);
                let html = request_page_html(client, GOOGLE_SEARCH_URL, &params).await?;
                Ok(parse::parse_google_page(&html, self.min_size))
            }
        }
    }
}

fn bing_params(
    query: &str,
    page: usize,
    (min_w, min_h): (u32, u32),
) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.to_string()),
        ("first", (page * BING_PAGE_SIZE + 1).to_string()),
        ("count", BING_PAGE_SIZE.to_string()),
        // Form encoding turns the leading space into the `+` Bing expects.
        ("qft", format!(" filterui:imagesize-custom_{min_w}_{min_h}")),
    ]
}

fn google_params(query: &str, page: usize) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.to_string()),
        ("tbm", "isch".to_string()),
        ("ijn", page.to_string()),
        ("start", (page * 100).to_string()),
    ]
}

#[async_trait]
impl ImageFetcher for WebImageCrawler {
    async fn fetch(
        &self,
        query: &str,
        max_count: usize,
        min_size: (u32, u32),
        dest: &Path,
    ) -> Result<usize> {
        if max_count == 0 {
            return Ok(0);
        }

        let pages = SearchPages {
            crawler: self,
            query,
            min_size,
        };
        let wanted = max_count.saturating_mul(CANDIDATE_SLACK);
        let candidates = collect_candidates(&pages, wanted, MAX_RESULT_PAGES).await?;
        info_time!(
            "{} candidate images from {} for \"{}\"",
            candidates.len(),
            self.engine,
            query
        );

        download_images(
            &self.client,
            candidates,
            dest,
            max_count,
            min_size,
            self.downloader_threads,
        )
        .await
    }
}

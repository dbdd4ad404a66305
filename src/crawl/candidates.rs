use std::collections::HashSet;

use async_trait::async_trait;

use crate::{info_time, warn_time, Result};

/// One search, addressed page by page.
#[async_trait]
pub(crate) trait ResultPages: Send + Sync {
    async fn page(&self, page: usize) -> Result<Vec<String>>;
}

/// Pages through search results until `wanted` unique image urls are known,
/// a page brings nothing new, or `max_pages` pages were requested.
/// Urls keep the order they were first seen in. A failing first page fails the
/// search; a later failing page ends it with what was already found.
pub(crate) async fn collect_candidates(
    pages: &dyn ResultPages,
    wanted: usize,
    max_pages: usize,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(wanted);

    for page in 0..max_pages {
        let urls = match pages.page(page).await {
            Ok(urls) => urls,
            Err(e) if page > 0 => {
                warn_time!("Result page {page} failed: {e}");
                break;
            }
            Err(e) => return Err(e),
        };

        let before = candidates.len();
        for url in urls {
            if seen.insert(url.clone()) {
                candidates.push(url);
            }
        }
        let new_urls = candidates.len() - before;
        info_time!("Result page {page}: {new_urls} new image urls");

        if new_urls == 0 || candidates.len() >= wanted {
            break;
        }
    }

    candidates.truncate(wanted);
    Ok(candidates)
}

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::{warn_time, Error, Result};

/// Google embeds full size results as `["<url>",<height>,<width>]`.
static GOOGLE_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\["(https?://[^"]+?)",(\d+),(\d+)\]"#).expect("google image pattern is valid")
});

/// Metadata Bing stores as JSON in the `m` attribute of every result anchor.
#[derive(Debug, Deserialize)]
struct BingMeta {
    murl: String,
}

/// Extracts full size image urls from a Bing image search result page.
pub(crate) fn parse_bing_page(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let anchor_selector = create_selector("a.iusc")?;

    let mut urls = Vec::new();
    for anchor in doc.select(&anchor_selector) {
        let Some(meta) = anchor.value().attr("m") else {
            continue;
        };
        match serde_json::from_str::<BingMeta>(meta) {
            Ok(meta) if is_http_url(&meta.murl) => urls.push(meta.murl),
            Ok(_) => {}
            Err(e) => warn_time!("Skipping Bing result with unreadable metadata: {e}"),
        }
    }
    Ok(urls)
}

/// Extracts full size image urls at least `min_size` large from a Google image search page.
pub(crate) fn parse_google_page(html: &str, (min_w, min_h): (u32, u32)) -> Vec<String> {
    GOOGLE_IMAGE_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let height: u32 = caps[2].parse().ok()?;
            let width: u32 = caps[3].parse().ok()?;
            if width < min_w || height < min_h {
                return None;
            }
            let url = unescape_js(&caps[1]);
            // Thumbnails served by Google itself.
            if url.contains("gstatic.com") {
                return None;
            }
            Some(url)
        })
        .collect()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

#[inline]
fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Undoes the escapes Google applies to urls inside inline scripts.
fn unescape_js(url: &str) -> String {
    url.replace("\\u003d", "=")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
}

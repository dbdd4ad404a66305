use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::{header::CONTENT_TYPE, Client};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::fs::count_files;
use crate::{info_time, warn_time, Error, Result};

/// Requests a search result page and returns its HTML.
pub(crate) async fn request_page_html(
    client: &Client,
    base_url: &str,
    params: &[(&str, String)],
) -> Result<String> {
    let res = client.get(base_url).query(params).send().await?;
    if !res.status().is_success() {
        return Err(Error::HttpStatus {
            url: base_url.to_string(),
            status: res.status(),
        });
    }
    let html = res.text().await?;
    Ok(html)
}

/// Downloads candidate urls concurrently (at most `threads` at a time) and writes
/// the images into `dest` until `max_count` of them are saved.
/// Images smaller than `min_size` (width, height) are discarded.
/// Returns the number of files written; failed candidates are logged and skipped.
pub(crate) async fn download_images(
    client: &Client,
    urls: Vec<String>,
    dest: &Path,
    max_count: usize,
    min_size: (u32, u32),
    threads: usize,
) -> Result<usize> {
    let semaphore = Arc::new(Semaphore::new(threads));
    let mut task_set = JoinSet::new();
    for url in urls {
        task_set.spawn({
            // Client uses Arc so we can clone cheaply
            let client = client.clone();
            let semaphore = semaphore.clone();

            async move {
                let _permit = semaphore.acquire_owned().await;
                let res = request_image(&client, &url, min_size).await;
                (url, res)
            }
        });
    }

    let mut next_index = count_files(dest).await? + 1;
    let mut saved = 0;
    while saved < max_count {
        let Some(task) = task_set.join_next().await else {
            break;
        };
        let (url, res) = task?;
        let (body, ext) = match res {
            Ok(image) => image,
            Err(e) => {
                warn_time!("Skipping {url}: {e}");
                continue;
            }
        };

        let path = free_path(dest, &mut next_index, ext).await?;
        tokio::fs::write(&path, &body).await?;
        saved += 1;
    }
    task_set.shutdown().await;

    info_time!("Saved {saved} images into {}", dest.display());
    Ok(saved)
}

/// Requests a single image, returning its bytes and the file extension to use.
async fn request_image(
    client: &Client,
    url: &str,
    (min_w, min_h): (u32, u32),
) -> Result<(Vec<u8>, &'static str)> {
    let res = client.get(url).send().await?;
    if !res.status().is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: res.status(),
        });
    }

    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return Err(Error::NotAnImage {
            url: url.to_string(),
            content_type,
        });
    }
    let ext = image_extension(&content_type, url);

    let body = res.bytes().await?;
    let Ok(size) = imagesize::blob_size(&body) else {
        return Err(Error::NotAnImage {
            url: url.to_string(),
            content_type,
        });
    };
    if size.width < min_w as usize || size.height < min_h as usize {
        return Err(Error::ImageTooSmall {
            url: url.to_string(),
            width: size.width,
            height: size.height,
        });
    }
    Ok((body.to_vec(), ext))
}

/// Picks an extension from the content type, falling back to the url path.
fn image_extension(content_type: &str, url: &str) -> &'static str {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    match mime {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => return "jpg",
        "image/png" => return "png",
        "image/gif" => return "gif",
        "image/webp" => return "webp",
        "image/bmp" => return "bmp",
        _ => {}
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let url_ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match url_ext.as_str() {
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "bmp" => "bmp",
        _ => "jpg",
    }
}

/// Finds the first unused `NNNNNN.<ext>` name starting at `next_index`.
async fn free_path(dest: &Path, next_index: &mut usize, ext: &str) -> Result<PathBuf> {
    loop {
        let path = dest.join(format!("{:06}.{ext}", *next_index));
        *next_index += 1;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }
    }
}

//! Downloads a batch of web images for every disease named in a count report.
//!
//! The report is parsed into an ordered list of names ([`report`]), every name
//! becomes a filesystem-safe folder ([`sanitize`]) and an image search query, and
//! the search itself is delegated to an [`crawl::ImageFetcher`].

mod error;
mod macros;

pub mod config;
pub mod crawl;
pub mod fs;
pub mod process;
pub mod report;
pub mod sanitize;

pub use error::{Error, Result};

pub const DEFAULT_REPORT_PATH: &str = "skin_word.txt";
pub const DEFAULT_OUTPUT_DIR: &str = "scraped_images";
pub const IMAGES_PER_SEARCH: usize = 50;
pub const DOWNLOADER_THREADS: usize = 4;
/// Minimum (width, height) of a saved image.
pub const MIN_IMAGE_SIZE: (u32, u32) = (100, 100);
/// Appended to every name to steer the search towards real patient photos.
pub const QUERY_SUFFIX: &str = "skin lesion patient photo close up real";
/// Number of entities processed in test mode.
pub const TEST_MODE_ENTITIES: usize = 3;

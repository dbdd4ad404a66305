use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Report file not found: {}", .0.display())]
    ReportNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Not an image ({content_type:?}): {url}")]
    NotAnImage { url: String, content_type: String },
    #[error("Image too small ({width}x{height}): {url}")]
    ImageTooSmall {
        url: String,
        width: usize,
        height: usize,
    },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

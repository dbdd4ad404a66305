use std::path::Path;

use crate::Result;

/// Number of entries directly inside `dir`.
pub async fn count_files(dir: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut count = 0;
    while entries.next_entry().await?.is_some() {
        count += 1;
    }
    Ok(count)
}

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use skinscrape::{
    config::Config,
    crawl::ImageFetcher,
    fs::count_files,
    process::{process_entities, process_report},
    Error, Result,
};
use tempfile::TempDir;

/// Writes `per_query` files for every query, failing for queries containing `fail_on`.
struct StubFetcher {
    per_query: usize,
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<(String, usize, (u32, u32))>>,
}

impl StubFetcher {
    fn new(per_query: usize) -> Self {
        Self {
            per_query,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, needle: &'static str) -> Self {
        self.fail_on = Some(needle);
        self
    }

    fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _, _)| q.clone())
            .collect()
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(
        &self,
        query: &str,
        max_count: usize,
        min_size: (u32, u32),
        dest: &Path,
    ) -> Result<usize> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_count, min_size));

        if self.fail_on.is_some_and(|needle| query.contains(needle)) {
            return Err(Error::Config("stub failure".into()));
        }

        let offset = count_files(dest).await?;
        let n = self.per_query.min(max_count);
        for i in 0..n {
            let path = dest.join(format!("{:06}.jpg", offset + i + 1));
            tokio::fs::write(path, b"jpeg").await?;
        }
        Ok(n)
    }
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        input: dir.path().join("skin_word.txt"),
        output_dir: dir.path().join("images"),
        images_per_search: 5,
        ..Config::default()
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn creates_one_folder_per_entity() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let fetcher = StubFetcher::new(3);

    let summary = process_entities(&config, &fetcher, &names(&["Acne (Mild)", "A/B:C"]))
        .await
        .unwrap();

    assert_eq!(summary.total_downloaded(), 6);
    assert_eq!(summary.failed().count(), 0);
    assert_eq!(summary.results[0].folder, "acne_(mild)");
    assert_eq!(summary.results[1].folder, "a_b_c");
    for folder in ["acne_(mild)", "a_b_c"] {
        let path = config.output_dir.join(folder);
        assert_eq!(count_files(&path).await.unwrap(), 3);
    }

    assert_eq!(
        fetcher.queries(),
        vec![
            "Acne (Mild) skin lesion patient photo close up real",
            "A/B:C skin lesion patient photo close up real"
        ]
    );
    let calls = fetcher.calls.lock().unwrap();
    assert!(calls.iter().all(|&(_, max, size)| max == 5 && size == (100, 100)));
}

#[tokio::test]
async fn failing_entity_counts_as_zero_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let fetcher = StubFetcher::new(2).failing_on("Melasma");

    let summary = process_entities(&config, &fetcher, &names(&["Acne", "Melasma", "Rosacea"]))
        .await
        .unwrap();

    let downloads: Vec<_> = summary.results.iter().map(|r| r.downloaded).collect();
    assert_eq!(downloads, vec![2, 0, 2]);
    let failed: Vec<_> = summary.failed().map(|r| r.name.as_str()).collect();
    assert_eq!(failed, vec!["Melasma"]);
}

#[tokio::test]
async fn unusable_names_are_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let fetcher = StubFetcher::new(1);

    let summary = process_entities(&config, &fetcher, &names(&["?*", "Vitiligo"]))
        .await
        .unwrap();

    assert_eq!(summary.results[0].folder, "");
    assert_eq!(summary.results[0].downloaded, 0);
    assert_eq!(summary.results[1].downloaded, 1);
    assert_eq!(fetcher.queries().len(), 1);
}

#[tokio::test]
async fn only_new_files_are_counted() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let existing = config.output_dir.join("acne");
    tokio::fs::create_dir_all(&existing).await.unwrap();
    tokio::fs::write(existing.join("000001.jpg"), b"old").await.unwrap();

    let summary = process_entities(&config, &StubFetcher::new(4), &names(&["Acne"]))
        .await
        .unwrap();

    assert_eq!(summary.results[0].downloaded, 4);
    assert_eq!(count_files(&existing).await.unwrap(), 5);
}

#[tokio::test]
async fn limit_caps_processed_entities() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        limit: Some(2),
        ..test_config(&dir)
    };
    let fetcher = StubFetcher::new(1);

    let summary = process_entities(&config, &fetcher, &names(&["A", "B", "C", "D"]))
        .await
        .unwrap();

    assert_eq!(summary.results.len(), 2);
    assert_eq!(fetcher.queries().len(), 2);
}

#[tokio::test]
async fn report_drives_the_whole_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    tokio::fs::write(
        &config.input,
        "DISEASE COUNT\n==========\nAcne    120\nPsoriasis   44\nAcne    3\n----------\nTotal rows: 167\nUnique diseases: 2\n",
    )
    .await
    .unwrap();

    let summary = process_report(&config, &StubFetcher::new(2)).await.unwrap();

    let processed: Vec<_> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(processed, vec!["Acne", "Psoriasis", "Acne"]);
    // The duplicate lands in the same folder on top of the first batch.
    assert_eq!(count_files(&config.output_dir.join("acne")).await.unwrap(), 4);
    assert_eq!(summary.total_downloaded(), 6);
}

#[tokio::test]
async fn missing_report_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let err = process_report(&config, &StubFetcher::new(1)).await.unwrap_err();
    assert!(matches!(err, Error::ReportNotFound(_)));
}

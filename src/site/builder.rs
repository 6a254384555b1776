//! Static build of every viewer route.
//!
//! # Error Handling Strategy
//!
//! - **Source errors**: An unreadable or corrupted source aborts the build. A partial site
//!   that silently misses records is worse than no site.
//! - **Per-record problems**: Ids that cannot be used as a directory name, and repeated
//!   ids after the first, are skipped with a warning and counted in [`BuildSummary`].
//! - **Output errors**: Failing to create a directory or write a file aborts the build with
//!   the offending path in the error context.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::Metadata;
use crate::render::{render_detail, render_index, render_json_pretty};
use crate::store::RecordStore;
use crate::utils::record_dir;

pub const INDEX_FILE: &str = "index.html";
pub const JSON_DIR: &str = "json";
pub const JSON_FILE: &str = "index.json";

/// Counts reported at the end of a static build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Records whose detail and JSON pages were written
    pub records_written: usize,
    /// Total files written, including the index page
    pub files_written: usize,
    /// Ids skipped because they are not safe as a directory name
    pub unsafe_ids: Vec<String>,
    /// Records skipped because an earlier record had the same id
    pub duplicate_ids: usize,
    /// Source lines skipped as malformed during the record pass
    pub skipped_lines: usize,
}

/// Pre-render every route of the viewer into `out_dir`
///
/// Streams the records once, writing `context/{id}/index.html` and
/// `context/{id}/json/index.json` for each, so only one record is held in
/// memory at a time. `index.html` is written last and lists exactly the
/// records whose pages were written.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is corrupted, or if any
/// output file cannot be written.
pub async fn build_site(store: &RecordStore, out_dir: &Path) -> Result<BuildSummary> {
    let mut summary = BuildSummary::default();

    let mut records = store
        .records()
        .await
        .with_context(|| format!("Failed to open records in {}", store.source_path().display()))?;
    create_dir(out_dir).await?;

    let mut written: Vec<Metadata> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    while let Some(record) = records.next().await.context("Failed to read record")? {
        let id = record.id().to_string();

        if seen.contains(&id) {
            warn!(id = %id, "Skipping record with duplicate id");
            summary.duplicate_ids += 1;
            continue;
        }

        let dir = match record_dir(out_dir, &id) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "Skipping record");
                summary.unsafe_ids.push(id);
                continue;
            }
        };

        let json_dir = dir.join(JSON_DIR);
        create_dir(&json_dir).await?;
        write_file(&dir.join(INDEX_FILE), render_detail(&record).as_bytes()).await?;

        let json = render_json_pretty(&record)
            .with_context(|| format!("Failed to encode record {} as JSON", id))?;
        write_file(&json_dir.join(JSON_FILE), json.as_bytes()).await?;

        debug!(id = %id, "Wrote record pages");
        summary.files_written += 2;
        summary.records_written += 1;
        written.push(Metadata::from(&record.meta));
        seen.insert(id);
    }
    summary.skipped_lines = records.skipped();

    write_file(&out_dir.join(INDEX_FILE), render_index(&written).as_bytes()).await?;
    summary.files_written += 1;

    info!(
        out_dir = %out_dir.display(),
        records = summary.records_written,
        files = summary.files_written,
        unsafe_ids = summary.unsafe_ids.len(),
        duplicates = summary.duplicate_ids,
        "Static build complete"
    );

    Ok(summary)
}

async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create output directory: {}", path.display()))
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Path of the detail page written for `id`
pub fn detail_page_path(out_dir: &Path, id: &str) -> Result<PathBuf> {
    Ok(record_dir(out_dir, id)?.join(INDEX_FILE))
}

/// Path of the JSON export written for `id`
pub fn json_page_path(out_dir: &Path, id: &str) -> Result<PathBuf> {
    Ok(record_dir(out_dir, id)?.join(JSON_DIR).join(JSON_FILE))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn line(id: &str, run_id: &str) -> String {
        format!(
            r#"{{"meta":{{"id":"{}","run_id":"{}","tiktoken_context_window_length":1000,"claude_context_length":1100,"num_messages":2}},"messages":[{{"role":"user","content":"question for {}"}},{{"role":"system","content":"END"}}]}}"#,
            id, run_id, id
        )
    }

    fn source(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(lines.join("\n").as_bytes()).expect("Failed to write temp file");
        file
    }

    #[tokio::test]
    async fn test_build_writes_every_route() {
        let file = source(&[line("one", "r1"), line("two", "r2")]);
        let out = TempDir::new().unwrap();

        let summary = build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.files_written, 5);

        let index = std::fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains(r#"<a href="/context/one/">one</a>"#));

        let detail = std::fs::read_to_string(detail_page_path(out.path(), "two").unwrap()).unwrap();
        assert!(detail.contains("question for two"));

        let json = std::fs::read_to_string(json_page_path(out.path(), "one").unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["meta"]["run_id"], "r1");
    }

    #[tokio::test]
    async fn test_build_skips_duplicate_ids() {
        let file = source(&[line("dup", "first"), line("dup", "second")]);
        let out = TempDir::new().unwrap();

        let summary = build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.duplicate_ids, 1);

        let json = std::fs::read_to_string(json_page_path(out.path(), "dup").unwrap()).unwrap();
        assert!(json.contains("\"first\""));
    }

    #[tokio::test]
    async fn test_build_skips_unsafe_ids() {
        let file = source(&[line("..", "r1"), line("a/b", "r2"), line("ok", "r3")]);
        let out = TempDir::new().unwrap();

        let summary = build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.unsafe_ids, vec!["..".to_string(), "a/b".to_string()]);

        let index = std::fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains("/context/ok/"));
        assert!(!index.contains(">a/b</a>"));
        assert!(!out.path().join("context").join("a").exists());
    }

    #[tokio::test]
    async fn test_build_empty_source() {
        let file = source(&[]);
        let out = TempDir::new().unwrap();

        let summary = build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();
        assert_eq!(summary.records_written, 0);
        assert_eq!(summary.files_written, 1);
        assert!(out.path().join(INDEX_FILE).exists());
    }

    #[tokio::test]
    async fn test_build_missing_source_fails() {
        let out = TempDir::new().unwrap();
        let store = RecordStore::new(out.path().join("missing.jsonl"));

        let err = build_site(&store, out.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open records"));
        assert!(!out.path().join(INDEX_FILE).exists());
    }

    #[tokio::test]
    async fn test_build_index_lists_only_written_records() {
        let tool = r#"{"meta":{"id":"toolrec","run_id":"r","tiktoken_context_window_length":1,"claude_context_length":1,"num_messages":2},"messages":[{"role":"tool","content":"x"},{"role":"system","content":"END"}]}"#;
        let file = source(&[line("good1", "r1"), tool.to_string(), line("good2", "r2")]);
        let out = TempDir::new().unwrap();

        let summary = build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.skipped_lines, 1);

        let index = std::fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains("2 records"));
        assert!(index.contains(r#"<a href="/context/good1/">"#));
        assert!(index.contains(r#"<a href="/context/good2/">"#));
        assert!(!index.contains("toolrec"));
        assert!(!detail_page_path(out.path(), "toolrec").unwrap().exists());
    }

    #[tokio::test]
    async fn test_build_index_links_have_pages() {
        let file = source(&[line("a", "r1"), line("a", "r2"), line("..", "r3"), line("b", "r4")]);
        let out = TempDir::new().unwrap();

        build_site(&RecordStore::new(file.path()), out.path()).await.unwrap();

        let index = std::fs::read_to_string(out.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains("2 records"));
        assert_eq!(index.matches(r#"<a href="/context/a/">"#).count(), 1);
        for id in ["a", "b"] {
            assert!(detail_page_path(out.path(), id).unwrap().exists());
            assert!(json_page_path(out.path(), id).unwrap().exists());
        }
    }
}

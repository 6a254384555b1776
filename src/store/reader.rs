use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::{DEFAULT_READ_TIMEOUT, ViewerConfig};
use crate::error::{StoreError, StoreResult};
use crate::models::{Metadata, MetadataLine, Record};
use crate::store::source::{RecordStream, SourceLines};

/// Just enough of a line to compare ids without decoding message bodies
#[derive(Deserialize)]
struct IdLine<'a> {
    #[serde(borrow)]
    meta: MetaId<'a>,
}

#[derive(Deserialize)]
struct MetaId<'a> {
    #[serde(borrow)]
    id: Cow<'a, str>,
}

/// Read-only access to the line-delimited record file
///
/// The file is opened fresh for every operation, so concurrent callers never
/// share a handle.
#[derive(Debug, Clone)]
pub struct RecordStore {
    source_path: PathBuf,
    read_timeout: Duration,
}

impl RecordStore {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self { source_path: source_path.into(), read_timeout: DEFAULT_READ_TIMEOUT }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(&config.source_path).with_read_timeout(config.read_timeout)
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// List the metadata of every record in file order
    ///
    /// # Errors
    ///
    /// - [`StoreError::SourceUnavailable`] if the file cannot be opened or read
    /// - [`StoreError::MalformedSource`] if too many lines fail to decode
    /// - [`StoreError::Timeout`] if the scan exceeds the read timeout
    pub async fn list_metadata(&self) -> StoreResult<Vec<Metadata>> {
        self.bounded(async {
            let source = SourceLines::open(&self.source_path).await?;
            let lines: Vec<MetadataLine> =
                RecordStream::new(source, self.read_timeout).collect().await?;
            Ok::<Vec<Metadata>, StoreError>(lines.into_iter().map(|line| line.meta).collect())
        })
        .await
    }

    /// Find the first record whose id matches, stopping the scan at the match
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the stream ends without a match
    /// - [`StoreError::MalformedRecord`] if the matching line does not decode as a record
    /// - [`StoreError::SourceUnavailable`], [`StoreError::MalformedSource`] and
    ///   [`StoreError::Timeout`] as for [`RecordStore::list_metadata`]
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Record> {
        self.bounded(async {
            let mut source = SourceLines::open(&self.source_path).await?;

            while let Some(line) = source.next_line().await? {
                let line_num = source.line_num();
                let Some(head) = source.tally_mut().decode::<IdLine>(line_num, &line)? else {
                    continue;
                };
                if head.meta.id != id {
                    continue;
                }

                let record = serde_json::from_slice::<Record>(&line).map_err(|source_err| {
                    StoreError::MalformedRecord {
                        id: id.to_string(),
                        line: line_num,
                        path: self.source_path.clone(),
                        source: source_err,
                    }
                })?;
                debug!(id, line = line_num, messages = record.messages.len(), "Found record");
                return Ok(record);
            }

            source.tally().finish()?;
            Err(StoreError::NotFound { id: id.to_string() })
        })
        .await
    }

    /// Open a cursor over every record in file order
    pub async fn records(&self) -> StoreResult<RecordStream<Record>> {
        let source = self.bounded(SourceLines::open(&self.source_path)).await?;
        Ok(RecordStream::new(source, self.read_timeout))
    }

    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.read_timeout, fut).await.unwrap_or_else(|_| {
            Err(StoreError::Timeout { path: self.source_path.clone(), after: self.read_timeout })
        })
    }
}

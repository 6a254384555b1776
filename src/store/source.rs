use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{StoreError, StoreResult};
use crate::parsers::LineTally;

/// Sequential line reader over the source file
///
/// Owns the file handle; dropping it mid-scan releases the file.
pub(crate) struct SourceLines {
    path: PathBuf,
    reader: BufReader<File>,
    line_num: usize,
    tally: LineTally,
}

impl SourceLines {
    pub(crate) async fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).await.map_err(|source| StoreError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            line_num: 0,
            tally: LineTally::new(path),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based number of the line most recently returned
    pub(crate) fn line_num(&self) -> usize {
        self.line_num
    }

    pub(crate) fn tally_mut(&mut self) -> &mut LineTally {
        &mut self.tally
    }

    pub(crate) fn tally(&self) -> &LineTally {
        &self.tally
    }

    /// Read the next raw line, including its terminator
    ///
    /// Bytes are returned as read; UTF-8 is checked per line by the tally so a
    /// corrupt line is skipped rather than failing the scan.
    pub(crate) async fn next_line(&mut self) -> StoreResult<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let read = self.reader.read_until(b'\n', &mut line).await.map_err(|source| {
            StoreError::SourceUnavailable { path: self.path.clone(), source }
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_num += 1;
        Ok(Some(line))
    }
}

/// Async cursor yielding every decoded item of the source in file order
///
/// Each call to [`RecordStream::next`] is bounded by the store's read timeout.
pub struct RecordStream<T> {
    source: SourceLines,
    read_timeout: Duration,
    finished: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> RecordStream<T> {
    pub(crate) fn new(source: SourceLines, read_timeout: Duration) -> Self {
        Self { source, read_timeout, finished: false, _item: PhantomData }
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Number of lines skipped as malformed so far
    pub fn skipped(&self) -> usize {
        self.source.tally().skipped()
    }

    /// Decode the next item
    ///
    /// After an error the stream is finished and keeps returning `Ok(None)`.
    pub async fn next(&mut self) -> StoreResult<Option<T>> {
        if self.finished {
            return Ok(None);
        }

        let timeout = self.read_timeout;
        let outcome = tokio::time::timeout(timeout, self.advance()).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout { path: self.source.path().to_path_buf(), after: timeout }),
        };
        if result.is_err() {
            self.finished = true;
        }
        result
    }

    async fn advance(&mut self) -> StoreResult<Option<T>> {
        loop {
            let Some(line) = self.source.next_line().await? else {
                self.finished = true;
                self.source.tally().finish()?;
                return Ok(None);
            };

            let line_num = self.source.line_num();
            if let Some(item) = self.source.tally_mut().decode::<T>(line_num, &line)? {
                return Ok(Some(item));
            }
        }
    }

    /// Drain the remaining items into a vector
    pub async fn collect(mut self) -> StoreResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}

//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a temp directory holding a context window source file
pub struct SourceFileBuilder {
    temp_dir: TempDir,
    records: Vec<String>,
}

impl SourceFileBuilder {
    /// Create a new builder with no records
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, records: Vec::new() }
    }

    /// Add a record line
    pub fn with_record(mut self, record: RecordBuilder) -> Self {
        self.records.push(record.to_json());
        self
    }

    /// Add a raw line verbatim (for malformed input)
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.records.push(line.to_string());
        self
    }

    /// Write `context_windows.jsonl` and return the temp dir and file path
    pub fn build(self) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join("context_windows.jsonl");
        fs::write(&path, self.records.join("\n")).expect("Failed to write source file");
        (self.temp_dir, path)
    }
}

impl Default for SourceFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one record line
pub struct RecordBuilder {
    id: String,
    run_id: String,
    tiktoken: u64,
    claude: u64,
    messages: Vec<(String, String)>,
    final_state: Option<String>,
}

impl RecordBuilder {
    /// Create a record with one user message and the trailing END marker
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            run_id: "run-1".to_string(),
            tiktoken: 1000,
            claude: 1100,
            messages: vec![("user".to_string(), "Test message".to_string())],
            final_state: None,
        }
    }

    pub fn run_id(mut self, run_id: &str) -> Self {
        self.run_id = run_id.to_string();
        self
    }

    pub fn tokens(mut self, tiktoken: u64, claude: u64) -> Self {
        self.tiktoken = tiktoken;
        self.claude = claude;
        self
    }

    /// Replace the messages before the trailing marker
    pub fn messages(mut self, messages: &[(&str, &str)]) -> Self {
        self.messages =
            messages.iter().map(|(r, c)| (r.to_string(), c.to_string())).collect();
        self
    }

    pub fn final_state(mut self, content: &str) -> Self {
        self.final_state = Some(content.to_string());
        self
    }

    /// Convert to a JSON line; `num_messages` counts the trailing marker
    pub fn to_json(&self) -> String {
        let mut messages: Vec<serde_json::Value> = self
            .messages
            .iter()
            .map(|(role, content)| serde_json::json!({ "role": role, "content": content }))
            .collect();
        messages.push(serde_json::json!({ "role": "system", "content": "END" }));

        let mut meta = serde_json::json!({
            "id": self.id,
            "run_id": self.run_id,
            "tiktoken_context_window_length": self.tiktoken,
            "claude_context_length": self.claude,
            "num_messages": messages.len(),
        });
        if let Some(content) = &self.final_state {
            meta["final_state"] = serde_json::json!({ "content": content });
        }

        serde_json::json!({ "meta": meta, "messages": messages }).to_string()
    }
}

/// Read a file written by the static build
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

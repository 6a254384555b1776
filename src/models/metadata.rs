use serde::{Deserialize, Serialize};

use super::record::RecordMeta;

/// Summary of a record used for listing, decoded without the message bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_record_id")]
    pub id: String,
    pub run_id: String,
    pub tiktoken_context_window_length: u64,
    pub claude_context_length: u64,
    pub num_messages: u64,
}

/// Line shape used when only the metadata is needed; `messages` and any
/// other top-level fields are skipped by serde without being materialised.
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataLine {
    pub meta: Metadata,
}

impl From<&RecordMeta> for Metadata {
    fn from(meta: &RecordMeta) -> Self {
        Self {
            id: meta.id.clone(),
            run_id: meta.run_id.clone(),
            tiktoken_context_window_length: meta.tiktoken_context_window_length,
            claude_context_length: meta.claude_context_length,
            num_messages: meta.num_messages,
        }
    }
}

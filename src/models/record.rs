use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker of a single message in a context window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_content")]
    pub content: String,
    /// Fields the viewer does not interpret, kept for the JSON export
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_content")]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_record_id")]
    pub id: String,
    pub run_id: String,
    pub tiktoken_context_window_length: u64,
    pub claude_context_length: u64,
    pub num_messages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_state: Option<FinalState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One stored conversation: its metadata plus the full message history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub meta: RecordMeta,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Messages shown in the viewer: the trailing marker written by the
    /// ingestion process is not part of the conversation.
    pub fn displayed_messages(&self) -> &[Message] {
        match self.messages.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn final_state_content(&self) -> &str {
        self.meta.final_state.as_ref().map(|s| s.content.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"meta":{"id":"abc","run_id":"r1","tiktoken_context_window_length":1200,"claude_context_length":1300,"num_messages":3,"final_state":{"content":"done"}},"messages":[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"},{"role":"system","content":"END"}]}"#;

    #[test]
    fn test_record_deserializes_nested_meta() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.id(), "abc");
        assert_eq!(record.meta.run_id, "r1");
        assert_eq!(record.meta.num_messages, 3);
        assert_eq!(record.messages.len(), 3);
        assert_eq!(record.messages[1].role, Role::Assistant);
        assert_eq!(record.final_state_content(), "done");
    }

    #[test]
    fn test_displayed_messages_drops_trailing_marker() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();
        let shown = record.displayed_messages();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].content, "hi");
        assert_eq!(shown[1].content, "hello");
    }

    #[test]
    fn test_displayed_messages_empty_history() {
        let json = r#"{"meta":{"id":"x","run_id":"r","tiktoken_context_window_length":0,"claude_context_length":0,"num_messages":0},"messages":[]}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.displayed_messages().is_empty());
        assert_eq!(record.final_state_content(), "");
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let json = r#"{"meta":{"id":"x","run_id":"r","tiktoken_context_window_length":1,"claude_context_length":2,"num_messages":1,"model":"m-1"},"messages":[{"role":"user","content":"q","name":"alice"}],"source":"ingest"}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["meta"]["model"], "m-1");
        assert_eq!(value["messages"][0]["name"], "alice");
        assert_eq!(value["source"], "ingest");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"meta":{"id":"x","run_id":"r","tiktoken_context_window_length":1,"claude_context_length":2,"num_messages":1},"messages":[{"role":"narrator","content":"q"}]}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}

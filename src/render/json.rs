use serde_json::Value;

use crate::models::Record;

/// Render the full record as a JSON document, including fields the viewer does not interpret
pub fn render_json(record: &Record) -> serde_json::Result<Value> {
    serde_json::to_value(record)
}

/// Pretty-printed JSON text used for the static export
pub fn render_json_pretty(record: &Record) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"meta":{"id":"abc","run_id":"r1","tiktoken_context_window_length":5,"claude_context_length":6,"num_messages":2,"final_state":{"content":"x","saved":false}},"messages":[{"role":"user","content":"hi"},{"role":"system","content":null}],"tags":["a"]}"#;

    #[test]
    fn test_json_reparses_to_same_record() {
        let record: Record = serde_json::from_str(LINE).unwrap();
        let value = render_json(&record).unwrap();

        let reparsed: Record = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed, record);
    }

    #[test]
    fn test_json_keeps_trailing_marker_and_extra_fields() {
        let record: Record = serde_json::from_str(LINE).unwrap();
        let value = render_json(&record).unwrap();

        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
        assert_eq!(value["tags"][0], "a");
        assert_eq!(value["meta"]["final_state"]["saved"], false);
    }

    #[test]
    fn test_pretty_json_is_valid() {
        let record: Record = serde_json::from_str(LINE).unwrap();
        let text = render_json_pretty(&record).unwrap();
        let reparsed: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed.meta.id, "abc");
    }
}

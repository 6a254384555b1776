//! Streaming access to the context window source file.
//!
//! Every operation opens the file, reads it line by line and drops the handle
//! when it returns. [`RecordStore::find_by_id`] stops reading at the first
//! match, so only one full record is ever resident.

pub mod reader;
mod source;

pub use reader::RecordStore;
pub use source::RecordStream;

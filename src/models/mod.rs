//! Data models for stored context windows.
//!
//! - [`Record`] - One conversation: [`RecordMeta`] plus its [`Message`] history
//! - [`Metadata`] - Reduced projection of a record used for the index page
//!
//! Records are decoded with serde at the parse boundary. Unknown fields are
//! carried through untouched so the JSON export reproduces the source line.

pub mod metadata;
pub mod record;

pub(crate) use metadata::MetadataLine;
pub use metadata::Metadata;
pub use record::{FinalState, Message, Record, RecordMeta, Role};

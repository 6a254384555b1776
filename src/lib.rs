//! Context Window Viewer - Browse stored conversation context windows as HTML
//!
//! This library renders a line-delimited JSON file of context window records
//! (id, message history, token counts) as a small website. It supports:
//!
//! - Streaming the source file to list metadata or find one record by id
//! - Rendering an index page, a per-record conversation page and a JSON export
//! - Serving those pages live over HTTP
//! - Pre-rendering every page to disk as a static site
//!
//! # Example
//!
//! ```no_run
//! use context_window_viewer::{RecordStore, render_index};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = RecordStore::new("./context_windows.jsonl");
//! let metas = store.list_metadata().await?;
//! let html = render_index(&metas);
//! println!("Rendered {} records ({} bytes)", metas.len(), html.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod render;
pub mod server;
pub mod site;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{StoreError, StoreResult};
pub use models::{Message, Metadata, Record, RecordMeta, Role};
pub use render::{render_detail, render_index, render_json};
pub use site::build_site;
pub use store::RecordStore;
pub use utils::{encode_id_segment, format_thousands};

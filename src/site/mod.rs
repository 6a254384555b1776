//! Static generation pass: renders every route of the live server to files.

pub mod builder;

pub use builder::{BuildSummary, build_site, detail_page_path, json_page_path};

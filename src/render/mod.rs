//! Page rendering for the viewer.
//!
//! Every renderer is a pure function of its input: the same metadata list or
//! record always produces the same document. All text taken from the source
//! file is HTML-escaped before it is interpolated.

pub mod detail;
pub mod escape;
pub mod index;
pub mod json;

pub use detail::render_detail;
pub use escape::escape_html;
pub use index::render_index;
pub use json::{render_json, render_json_pretty};

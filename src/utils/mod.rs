pub mod format;
pub mod paths;

pub use format::format_thousands;
pub use paths::{
    detail_href, encode_id_segment, format_path_with_tilde, record_dir, validate_id_component,
};

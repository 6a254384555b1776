use std::borrow::Cow;
use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

// Characters to percent-encode when a record id becomes one URL path segment
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Encodes a record id as a single URL path segment
///
/// # Examples
///
/// ```
/// use context_window_viewer::encode_id_segment;
///
/// assert_eq!(encode_id_segment("run 1/a"), "run%201%2Fa");
/// assert_eq!(encode_id_segment("abc-123"), "abc-123");
/// ```
pub fn encode_id_segment(id: &str) -> Cow<'_, str> {
    utf8_percent_encode(id, SEGMENT_ENCODE_SET).into()
}

/// Relative href of a record's detail page
pub fn detail_href(id: &str) -> String {
    format!("/context/{}/", encode_id_segment(id))
}

/// Checks that a record id can be used verbatim as one directory name
///
/// The static build writes `context/{id}/index.html`, so an id must not be able to
/// climb out of the output directory or nest into subdirectories.
///
/// # Errors
///
/// Returns an error if the id is empty, is `.` or `..`, or contains a path
/// separator or NUL byte.
pub fn validate_id_component(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("Record id is empty");
    }
    if id.contains(['/', '\\', '\0']) {
        bail!("Record id contains a path separator: {:?}", id);
    }

    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("Record id is not a plain path component: {:?}", id),
    }
}

/// Output directory of a record's pages inside the static build
pub fn record_dir(out_dir: &Path, id: &str) -> Result<PathBuf> {
    validate_id_component(id)?;
    Ok(out_dir.join("context").join(id))
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    path_str.into_owned()
}

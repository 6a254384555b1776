use crate::models::Metadata;
use crate::render::escape::escape_html;
use crate::utils::{detail_href, format_thousands};

/// Render the index page listing every record in the given order
pub fn render_index(metas: &[Metadata]) -> String {
    let mut rows = String::new();
    for meta in metas {
        rows.push_str(&render_index_row(meta));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Context Window Viewer</title>
</head>
<body>
<h1>Context Window Viewer</h1>
<p>{count} records</p>
ID - Messages [ Tokens: TikToken - Claude ] <br>
{rows}</body>
</html>
"#,
        count = format_thousands(metas.len() as u64),
        rows = rows,
    )
}

fn render_index_row(meta: &Metadata) -> String {
    format!(
        "<a href=\"{href}\">{id}</a> {messages} messages [ tokens: {tiktoken} - {claude} ] <br>\n",
        href = escape_html(&detail_href(&meta.id)),
        id = escape_html(&meta.id),
        messages = meta.num_messages,
        tiktoken = format_thousands(meta.tiktoken_context_window_length),
        claude = format_thousands(meta.claude_context_length),
    )
}

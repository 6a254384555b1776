use crate::models::{Message, Record, Role};
use crate::render::escape::escape_html;
use crate::utils::format_thousands;

/// Anchor of the block above the first message
const TOP_ANCHOR: &str = "top-of-chat";
/// Anchor of the marker below the last message
const END_ANCHOR: &str = "end";

/// Render the detail page of one record
///
/// The trailing element of `messages` is a marker written by the ingestion
/// process and is never shown. Each remaining message becomes one block with
/// its role, 1-based position and Previous/Next links to its neighbours.
pub fn render_detail(record: &Record) -> String {
    let meta = &record.meta;
    let id = escape_html(&meta.id);
    let messages = record.displayed_messages();

    let mut blocks = String::new();
    for (index, message) in messages.iter().enumerate() {
        blocks.push_str(&render_message(message, index, messages.len()));
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{id} | Context Viewer</title>
<script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100 flex flex-row">
<div id="top" class="sticky top-5 mt-2 m-auto w-full text-center">
<a href="/" class="underline text-gray-500">&lt;- Back to Index</a>
<h1>Currently Viewing</h1>
<h2 class="text-2xl font-bold">{id}</h2>
<p>Run ID: {run_id}</p>
<p>Number of Messages: {num_messages}</p>
<p><span class="text-sm">Context Length:</span><br />{tiktoken} tokens (TikToken)<br />
{claude} tokens (Claude)</p>
<a href="./json/index.json" class="underline text-gray-500">View as json</a> | <a href="#{end}" class="underline text-pink-500">Jump to End</a>
</div>
<div class="flex flex-col items-center justify-center">
<div id="chat" class="w-full bg-white shadow-md rounded p-6 mt-6">
<div id="{top}"></div>
{blocks}</div>
</div>
<div>
<h1 id="{end}" class="text-2xl text-center pt-8">END of Context</h1>
<a href="#{top}" class="block text-center pb-6 text-pink-500 font-2xl underline">Back to Top</a>
<h1 class="text-2xl font-bold">Final State Content:</h1>
<div class="font-mono break-words whitespace-pre-wrap">
<input type="text" value="{final_state}" />
<button type="button">Save</button>
</div>
<a href="#{top}" class="block text-center pb-6 text-pink-500 font-2xl underline">Back to Top</a>
</div>
</body>
</html>
"##,
        id = id,
        run_id = escape_html(&meta.run_id),
        num_messages = meta.num_messages,
        tiktoken = format_thousands(meta.tiktoken_context_window_length),
        claude = format_thousands(meta.claude_context_length),
        top = TOP_ANCHOR,
        end = END_ANCHOR,
        blocks = blocks,
        final_state = escape_html(record.final_state_content()),
    )
}

fn message_anchor(index: usize) -> String {
    format!("message-{}", index)
}

fn render_message(message: &Message, index: usize, total: usize) -> String {
    let previous =
        if index == 0 { TOP_ANCHOR.to_string() } else { message_anchor(index - 1) };
    let next = if index + 1 >= total { END_ANCHOR.to_string() } else { message_anchor(index + 1) };

    format!(
        r##"<div id="{anchor}" class="w-100">
<div class="sticky w-full top-0 bg-white/80 backdrop-blur-md py-4">
<div class="flex justify-between w-full">
<div class="role">{role}</div>
<div class="position">{position} of {total}</div>
<div>
<a class="bg-pink-200 rounded-md p-2 hover:bg-pink-500 hover:text-white" href="#{previous}">Previous ({index})</a>
<a class="bg-pink-300 rounded-md p-2 hover:bg-pink-500 hover:text-white" href="#{next}">Next ({after})</a>
</div>
</div>
</div>
<div class="message px-6 pb-6 rounded-md {style} break-words whitespace-pre-wrap font-mono">{content}</div>
</div>
"##,
        anchor = message_anchor(index),
        role = message.role.as_str(),
        position = index + 1,
        total = total,
        previous = previous,
        next = next,
        index = index,
        after = index + 2,
        style = role_style(message.role),
        content = escape_html(&message.content),
    )
}

fn role_style(role: Role) -> &'static str {
    match role {
        Role::Assistant => "bg-gray-200",
        Role::System => "bg-pink-400 text-white",
        Role::User => "bg-blue-500 text-white",
    }
}

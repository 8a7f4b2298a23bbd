//! Directory listing generation.
//!
//! Listing markup is a deliberate part of this crate's contract rather than
//! inherited behavior: one `<li>` anchor per entry, sorted by name,
//! directories suffixed with a slash. Entry names are HTML-escaped in the
//! anchor text and percent-encoded in the href.

use std::io::Error as IoError;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;

/// Characters percent-encoded in listing hrefs. Covers everything that
/// would terminate or escape the attribute value, plus `%` itself so that
/// encoded names survive a round-trip.
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'%')
    .add(b'{')
    .add(b'}');

struct Entry {
    name: String,
    is_dir: bool,
}

/// Render the HTML listing page for the directory at `path`.
///
/// `request_path` is the URL path the directory was requested under; it only
/// appears in the page title and heading.
pub async fn directory_listing(path: &Path, request_path: &str) -> Result<String, IoError> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(path).await?;
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        entries.push(Entry { name, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let title = html_escape(request_path);
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>Index of {}</title>\n", title));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>Index of {}</h1>\n<hr>\n<ul>\n", title));
    for entry in &entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        page.push_str(&format!(
            "<li><a href=\"{href}{suffix}\">{name}{suffix}</a></li>\n",
            href = utf8_percent_encode(&entry.name, HREF_ENCODE_SET),
            name = html_escape(&entry.name),
            suffix = suffix,
        ));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(page)
}

fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

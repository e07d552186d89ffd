pub mod thumbnail;

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

/// Correlation id for one download attempt, sent as `task_id`
pub fn generate_task_id() -> String {
    Uuid::new_v4().to_string()
}

static FILENAME_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|[;\s])filename=("[^"]*"|[^;]*)"#).expect("filename pattern is valid")
});

/// Header bytes as text. UTF-8 when valid, otherwise latin-1, which is how
/// most servers write non-ASCII header values.
pub fn decode_header_value(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Pull the filename out of a `Content-Disposition` header value.
///
/// Everything after `filename=` up to the next `;` is taken and every double
/// quote is stripped, so `attachment; filename="song.mp3"` yields `song.mp3`.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let caps = FILENAME_PARAM.captures(header)?;
    let filename = caps[1].replace('"', "");
    let filename = filename.trim();
    if filename.is_empty() {
        None
    } else {
        Some(filename.to_string())
    }
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}

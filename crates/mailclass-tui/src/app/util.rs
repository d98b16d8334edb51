use std::io::Write;
use std::path::PathBuf;

/// Copy text to the system clipboard using the OSC 52 escape sequence.
/// Works in most modern terminals (iTerm2, kitty, alacritty, WezTerm, etc.).
pub(super) fn osc52_copy(text: &str) {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    // Write directly to stdout, bypassing the terminal backend buffer
    let _ = std::io::stdout().write_all(format!("\x1b]52;c;{}\x07", encoded).as_bytes());
    let _ = std::io::stdout().flush();
}

/// Turn pasted text into candidate paths, one per non-empty line.
///
/// Handles the forms terminals use when a file is dropped on them: quoted
/// paths, backslash-escaped spaces and `file://` URIs.
pub(super) fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| PathBuf::from(clean_dropped_path(line)))
        .collect()
}

fn clean_dropped_path(raw: &str) -> String {
    let unquoted = strip_quotes(raw);
    if let Some(path) = file_uri_path(unquoted) {
        return path;
    }
    unescape_spaces(unquoted)
}

/// Local path of a `file:` URI (`file:///p`, `file://host/p` or `file:/p`),
/// percent-decoded.
fn file_uri_path(uri: &str) -> Option<String> {
    let rest = uri.strip_prefix("file:")?;
    let path = match rest.strip_prefix("//") {
        // Only the path of file://host/path is usable here
        Some(authority) => &authority[authority.find('/')?..],
        None => rest,
    };
    if !path.starts_with('/') {
        return None;
    }
    let decoded = urlencoding::decode_binary(path.as_bytes());
    Some(String::from_utf8_lossy(&decoded).into_owned())
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn unescape_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, ' ' | '(' | ')' | '\'' | '&')
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

#![forbid(unsafe_code)]

//! File-drop events.
//!
//! Terminal emulators have no dedicated drop protocol: dropping files onto a
//! window types (or bracket-pastes) their paths. [`DropEvent::from_paste`]
//! recognises that text so drop targets can tell a dropped file apart from an
//! ordinary paste.
//!
//! # Accepted forms
//!
//! | Emulator style | Example |
//! |----------------|---------|
//! | Plain path | `/home/me/photo.png` |
//! | Backslash-escaped | `/home/me/my\ photo.png` |
//! | Quoted | `'/home/me/my photo.png'` or `"C:\Users\me\a.png"` |
//! | URI list | `file:///home/me/my%20photo.png` |
//!
//! Several paths may be separated by whitespace or newlines. If any token is
//! not path-like the whole paste is treated as text.

use std::path::{Path, PathBuf};

/// One or more files dropped onto the terminal, in drop order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropEvent {
    /// Dropped paths, first file first.
    pub paths: Vec<PathBuf>,
}

impl DropEvent {
    /// Create a drop event from paths.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Interpret pasted text as a file drop.
    ///
    /// Returns `None` when the text is empty or any token is not an
    /// absolute path or `file://` URI.
    #[must_use]
    pub fn from_paste(text: &str) -> Option<Self> {
        let tokens = split_shell_words(text.trim())?;
        if tokens.is_empty() {
            return None;
        }
        let mut paths = Vec::with_capacity(tokens.len());
        for token in tokens {
            paths.push(token_to_path(&token)?);
        }
        Some(Self { paths })
    }

    /// Number of dropped files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing was dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first dropped path, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

fn token_to_path(token: &str) -> Option<PathBuf> {
    if let Some(rest) = token.strip_prefix("file://") {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        if !rest.starts_with('/') {
            return None;
        }
        return percent_decode(rest).map(PathBuf::from);
    }
    if is_absolute_like(token) {
        Some(PathBuf::from(token))
    } else {
        None
    }
}

fn is_absolute_like(token: &str) -> bool {
    if token.starts_with('/') || token.starts_with("~/") || token.starts_with("\\\\") {
        return true;
    }
    // Windows drive path: `C:\...` or `C:/...`
    let bytes = token.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Split on unquoted whitespace, honouring single quotes, double quotes and
/// backslash escapes. Returns `None` on an unterminated quote.
fn split_shell_words(text: &str) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Quote::Single, '\'') => quote = Quote::None,
            (Quote::Single, _) => current.push(c),
            (Quote::Double, '"') => quote = Quote::None,
            (Quote::Double, _) => current.push(c),
            (Quote::None, '\'') => {
                quote = Quote::Single;
                in_word = true;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                in_word = true;
            }
            (Quote::None, '\\') => {
                in_word = true;
                // Escapes only cover characters a shell would split on;
                // anything else keeps the backslash (Windows separators).
                match chars.peek() {
                    Some(&next) if next.is_whitespace() || matches!(next, '\'' | '"' | '\\') => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                }
            }
            (Quote::None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (Quote::None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote != Quote::None {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(event: &DropEvent) -> Vec<&str> {
        event
            .paths
            .iter()
            .map(|p| p.to_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn plain_absolute_path() {
        let drop = DropEvent::from_paste("/tmp/photo.png").unwrap();
        assert_eq!(paths(&drop), ["/tmp/photo.png"]);
    }

    #[test]
    fn trailing_whitespace_ignored() {
        let drop = DropEvent::from_paste("  /tmp/photo.png \n").unwrap();
        assert_eq!(drop.len(), 1);
    }

    #[test]
    fn backslash_escaped_space() {
        let drop = DropEvent::from_paste(r"/home/me/my\ photo.png").unwrap();
        assert_eq!(paths(&drop), ["/home/me/my photo.png"]);
    }

    #[test]
    fn single_quoted_path() {
        let drop = DropEvent::from_paste("'/home/me/my photo.png' ").unwrap();
        assert_eq!(paths(&drop), ["/home/me/my photo.png"]);
    }

    #[test]
    fn multiple_paths_keep_order() {
        let drop = DropEvent::from_paste("/a/first.png /b/second.jpg\n/c/third.jpeg").unwrap();
        assert_eq!(
            paths(&drop),
            ["/a/first.png", "/b/second.jpg", "/c/third.jpeg"]
        );
        assert_eq!(drop.first(), Some(Path::new("/a/first.png")));
    }

    #[test]
    fn file_uri_is_decoded() {
        let drop = DropEvent::from_paste("file:///home/me/my%20photo.png").unwrap();
        assert_eq!(paths(&drop), ["/home/me/my photo.png"]);
    }

    #[test]
    fn file_uri_with_localhost() {
        let drop = DropEvent::from_paste("file://localhost/tmp/a.png").unwrap();
        assert_eq!(paths(&drop), ["/tmp/a.png"]);
    }

    #[test]
    fn windows_drive_path_keeps_backslashes() {
        let drop = DropEvent::from_paste(r#""C:\Users\me\a.png""#).unwrap();
        assert_eq!(paths(&drop), [r"C:\Users\me\a.png"]);
    }

    #[test]
    fn ordinary_text_is_not_a_drop() {
        assert!(DropEvent::from_paste("hello world").is_none());
        assert!(DropEvent::from_paste("a@b.com").is_none());
        assert!(DropEvent::from_paste("relative/path.png").is_none());
    }

    #[test]
    fn mixed_text_and_path_is_not_a_drop() {
        assert!(DropEvent::from_paste("/tmp/a.png and more").is_none());
    }

    #[test]
    fn empty_is_not_a_drop() {
        assert!(DropEvent::from_paste("").is_none());
        assert!(DropEvent::from_paste("   \n").is_none());
    }

    #[test]
    fn unterminated_quote_is_not_a_drop() {
        assert!(DropEvent::from_paste("'/tmp/a.png").is_none());
    }

    #[test]
    fn bad_percent_escape_is_not_a_drop() {
        assert!(DropEvent::from_paste("file:///tmp/%zz.png").is_none());
    }
}

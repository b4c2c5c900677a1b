//! Heading extraction and anchor ids for the table of contents
//!
//! The markdown renderer assigns heading anchors through [`parse_heading_line`]
//! and [`slugify`] as well, so every id produced here resolves to an element
//! in the rendered page.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})[ \t]+(.+)$").unwrap();
    static ref NON_SLUG_RE: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS_RE: Regex = Regex::new(r"-+").unwrap();
}

/// A heading in a markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id
    pub id: String,
    /// Heading text as written
    pub text: String,
    /// 1 to 6
    pub level: u8,
}

impl Heading {
    pub fn new(level: u8, text: &str) -> Self {
        Self {
            id: slugify(text),
            text: text.to_string(),
            level,
        }
    }
}

/// Extract ATX headings (`# ...` to `###### ...`) in document order.
///
/// Lines inside fenced code blocks are skipped. Headings whose text
/// slugifies to the same id keep that duplicate id.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut open_fence: Option<(char, usize)> = None;

    for line in markdown.lines() {
        if let Some((ch, len, bare)) = fence_marker(line) {
            match open_fence {
                None => open_fence = Some((ch, len)),
                Some((open_ch, open_len)) if ch == open_ch && len >= open_len && bare => {
                    open_fence = None
                }
                Some(_) => {}
            }
            continue;
        }

        if open_fence.is_some() {
            continue;
        }

        if let Some((level, text)) = parse_heading_line(line) {
            headings.push(Heading::new(level, text));
        }
    }

    headings
}

/// Parse a single ATX heading line into `(level, text)`
pub fn parse_heading_line(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2)?.as_str().trim();
    Some((level, text))
}

/// Turn heading text into an anchor id.
///
/// Lower-cases, drops everything except word characters, whitespace and
/// hyphens, joins whitespace runs with a hyphen, squeezes repeated hyphens
/// and trims hyphens from both ends.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RE.replace_all(&stripped, "-");
    let squeezed = HYPHENS_RE.replace_all(&hyphenated, "-");
    squeezed.trim_matches('-').to_string()
}

/// Recognize a code fence line: (fence char, run length, has no info string)
fn fence_marker(line: &str) -> Option<(char, usize, bool)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }

    Some((ch, len, trimmed[len..].trim().is_empty()))
}

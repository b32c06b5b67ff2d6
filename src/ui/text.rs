use std::num::NonZeroUsize;

use lru::LruCache;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const DEFAULT_MAX_ENTRIES: usize = 64;

/// Reduces CMS HTML to plain text: tags dropped, line-breaking tags turned
/// into newlines, common entities decoded.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            rest = &rest[open..];
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        if is_line_break(&tag) {
            out.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    let decoded = decode_entities(&out);
    let lines: Vec<&str> = decoded.lines().map(str::trim).collect();
    let mut collapsed = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && collapsed.last().is_none_or(|last: &&str| last.is_empty()) {
            continue;
        }
        collapsed.push(line);
    }
    while collapsed.last().is_some_and(|last| last.is_empty()) {
        collapsed.pop();
    }
    collapsed.join("\n")
}

fn is_line_break(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|ch: char| ch.is_whitespace() || ch == '/')
        .next()
        .unwrap_or_default();
    matches!(name, "br" | "p" | "div" | "li" | "h1" | "h2" | "h3" | "h4")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8217;", "\u{2019}")
        .replace("&amp;", "&")
}

/// Greedy word wrap by display width. Words wider than `width` are split on
/// grapheme boundaries; explicit newlines are kept.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;
        for word in paragraph.split_word_bounds() {
            let word_width = word.width();
            if line_width + word_width <= width {
                line.push_str(word);
                line_width += word_width;
                continue;
            }
            if !line.trim().is_empty() {
                lines.push(line.trim_end().to_string());
            }
            line = String::new();
            line_width = 0;
            if word.trim().is_empty() {
                continue;
            }
            for grapheme in word.graphemes(true) {
                let grapheme_width = grapheme.width();
                if line_width + grapheme_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += grapheme_width;
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Wrapped lines keyed by text and width, so an unchanged slide is not
/// re-wrapped on every frame.
#[derive(Debug)]
pub struct WrapCache {
    entries: LruCache<(String, u16), Vec<String>>,
}

impl Default for WrapCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl WrapCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn wrap(&mut self, text: &str, width: u16) -> Vec<String> {
        let key = (text.to_string(), width);
        self.entries
            .get_or_insert(key, || wrap_text(text, width))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

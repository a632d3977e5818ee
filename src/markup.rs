//! Markup formatting for bot responses.
//!
//! Converts raw message text into a display-ready marker string:
//! fenced code blocks become `<pre lang="...">...</pre>`, inline code
//! becomes `<code>...</code>`, and newlines become `<br>`. Code bodies
//! and any remaining plain text have `<`/`>` escaped, so no raw angle
//! bracket from user input survives outside the inserted markers.
//!
//! `format_markup` is a pure function: the same input always yields the
//! same output, and it never panics. Formatting runs once per message;
//! the result is cached on the message and the reveal scheduler slices
//! prefixes of it (see `reveal`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Fenced code block: ```lang\n...\n``` (non-greedy, multi-line).
/// A fence with no closing delimiter does not match.
static BLOCK_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)\n```").ok());

/// Inline code span: a single backtick pair.
static INLINE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"`([^`]+)`").ok());

/// Language label used when a fence carries no tag.
const DEFAULT_LANG: &str = "text";

// Private-use sentinels for the placeholder pass. Stripped from input
// up front so user text can never collide with a placeholder.
const PH_OPEN: char = '\u{E000}';
const PH_CLOSE: char = '\u{E001}';

/// Escape `<` and `>` only. `&` is deliberately left alone.
fn escape_angles(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Fallback when a pattern is unavailable: raw text, angles escaped,
/// newlines converted. Best effort rather than a failure.
fn format_plain(raw: &str) -> String {
    escape_angles(raw).replace('\n', "<br>")
}

/// Format raw message text into the marker string described above.
///
/// Processing order is fixed: fenced blocks first, then inline code on
/// the remainder, then plain-text escaping, then newline conversion.
/// The newline pass runs over the fully substituted string, so newlines
/// inside code block bodies are converted too.
pub fn format_markup(raw: &str) -> String {
    let (Some(block_re), Some(inline_re)) = (BLOCK_RE.as_ref(), INLINE_RE.as_ref()) else {
        return format_plain(raw);
    };

    let raw: String = raw.chars().filter(|c| *c != PH_OPEN && *c != PH_CLOSE).collect();

    // Pass 1: pull out fenced blocks and inline spans, leaving
    // placeholder tokens behind.
    let mut markers: Vec<String> = Vec::new();

    let text = block_re.replace_all(&raw, |caps: &Captures| {
        let lang = caps.get(1).map(|m| m.as_str()).unwrap_or(DEFAULT_LANG);
        let body = escape_angles(&caps[2]);
        markers.push(format!("<pre lang=\"{}\">{}</pre>", lang, body));
        placeholder(markers.len() - 1)
    });

    let text = inline_re.replace_all(&text, |caps: &Captures| {
        markers.push(format!("<code>{}</code>", escape_angles(&caps[1])));
        placeholder(markers.len() - 1)
    });

    // Pass 2: escape what is left (everything outside code spans), then
    // substitute the markers back in. An inline span can capture a block
    // placeholder in its body (the block pass ran first, so the embedded
    // index is always the lower one); resolving high to low substitutes
    // the enclosing marker before the one nested inside it.
    let mut out = escape_angles(&text);
    for (idx, marker) in markers.iter().enumerate().rev() {
        out = out.replace(&placeholder(idx), marker);
    }

    out.replace('\n', "<br>")
}

fn placeholder(idx: usize) -> String {
    format!("{}{}{}", PH_OPEN, idx, PH_CLOSE)
}

/// A display-level piece of a formatted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text with markers resolved: `<br>` back to `\n`,
    /// `&lt;`/`&gt;` back to angle brackets.
    Text(String),
    /// An inline code span body.
    InlineCode(String),
    /// A fenced code block with its language label.
    CodeBlock { lang: String, body: String },
}

/// Resolve escapes for display.
fn unescape(text: &str) -> String {
    text.replace("<br>", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Parse a formatted marker string back into display segments.
///
/// Tolerates truncated input: during the typewriter reveal the UI
/// renders prefixes of the formatted string, so a marker may be cut off
/// mid-tag. Anything from an unterminated marker onward is emitted as
/// literal text, which is the accepted half-rendered-tag behavior.
pub fn parse_segments(formatted: &str) -> Vec<Segment> {
    const PRE_OPEN: &str = "<pre lang=\"";
    const CODE_OPEN: &str = "<code>";
    const CODE_CLOSE: &str = "</code>";

    let mut segments = Vec::new();
    let mut rest = formatted;

    loop {
        let next_pre = rest.find(PRE_OPEN);
        let next_code = rest.find(CODE_OPEN);

        let (at, is_pre) = match (next_pre, next_code) {
            (Some(p), Some(c)) if p <= c => (p, true),
            (Some(_), Some(c)) => (c, false),
            (Some(p), None) => (p, true),
            (None, Some(c)) => (c, false),
            (None, None) => break,
        };

        let complete = if is_pre {
            parse_pre(&rest[at..])
        } else {
            rest[at + CODE_OPEN.len()..]
                .find(CODE_CLOSE)
                .map(|end| {
                    let body = &rest[at + CODE_OPEN.len()..at + CODE_OPEN.len() + end];
                    (Segment::InlineCode(unescape(body)), CODE_OPEN.len() + end + CODE_CLOSE.len())
                })
        };

        match complete {
            Some((segment, consumed)) => {
                push_text(&mut segments, &rest[..at]);
                segments.push(segment);
                rest = &rest[at + consumed..];
            }
            None => {
                // Truncated marker: everything from here renders literally.
                push_text(&mut segments, rest);
                rest = "";
                break;
            }
        }
    }

    push_text(&mut segments, rest);
    segments
}

fn parse_pre(tail: &str) -> Option<(Segment, usize)> {
    let open_len = "<pre lang=\"".len();
    let lang_end = tail[open_len..].find("\">")?;
    let body_start = open_len + lang_end + "\">".len();
    let body_end = tail[body_start..].find("</pre>")?;
    let lang = tail[open_len..open_len + lang_end].to_string();
    let body = unescape(&tail[body_start..body_start + body_end]);
    Some((Segment::CodeBlock { lang, body }, body_start + body_end + "</pre>".len()))
}

fn push_text(segments: &mut Vec<Segment>, raw: &str) {
    if !raw.is_empty() {
        segments.push(Segment::Text(unescape(raw)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_fence_extraction() {
        let out = format_markup("before\n```js\nconst x = 1;\n```\nafter");
        assert_eq!(out, "before<br><pre lang=\"js\">const x = 1;</pre><br>after");
    }

    #[test]
    fn test_fence_without_language_falls_back_to_text() {
        let out = format_markup("```\nhello\n```");
        assert_eq!(out, "<pre lang=\"text\">hello</pre>");
    }

    #[test]
    fn test_non_word_language_tag_not_captured() {
        // "c++" is not a \w+ tag, so no block matches at that fence.
        let out = format_markup("```c++\nint x;\n```");
        assert!(!out.contains("<pre lang=\"c++\">"));
    }

    #[test]
    fn test_inline_span_enclosing_a_fence() {
        // The inline pass captures the block's placeholder inside its
        // own marker; both must still resolve.
        let out = format_markup("`one ```js\ncode\n``` two`");
        assert!(!out.contains('\u{E000}') && !out.contains('\u{E001}'));
        assert_eq!(out, "<code>one <pre lang=\"js\">code</pre> two</code>");
    }

    #[test]
    fn test_unterminated_fence_is_plain_text() {
        let out = format_markup("```js\nconst x = 1;");
        assert!(!out.contains("<pre"));
        assert_eq!(out, "```js<br>const x = 1;");
    }

    #[test]
    fn test_empty_code_block() {
        let out = format_markup("```js\n\n```");
        assert_eq!(out, "<pre lang=\"js\"></pre>");
    }

    #[test]
    fn test_inline_code() {
        let out = format_markup("use `let x = 1;` here");
        assert_eq!(out, "use <code>let x = 1;</code> here");
    }

    #[test]
    fn test_code_body_angles_escaped() {
        let out = format_markup("```html\n<div>\n```");
        assert_eq!(out, "<pre lang=\"html\">&lt;div&gt;</pre>");

        let out = format_markup("try `a < b`");
        assert_eq!(out, "try <code>a &lt; b</code>");
    }

    #[test]
    fn test_ampersand_not_escaped() {
        assert_eq!(format_markup("a & b"), "a & b");
        assert_eq!(format_markup("`a && b`"), "<code>a && b</code>");
    }

    #[test]
    fn test_plain_text_injection_escaped() {
        let out = format_markup("<script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert_eq!(out, "&lt;script&gt;alert(1)&lt;/script&gt;");

        let out = format_markup("<img onerror=x src=y>");
        assert_eq!(out, "&lt;img onerror=x src=y&gt;");
    }

    #[test]
    fn test_no_raw_angles_outside_markers() {
        let out = format_markup("a <b> c\n```html\n<i>\n```\nand `<u>` done");
        // Strip our own markers, then nothing angle-bracketed remains.
        let stripped = out
            .replace("<pre lang=\"html\">", "")
            .replace("</pre>", "")
            .replace("<code>", "")
            .replace("</code>", "")
            .replace("<br>", "");
        assert!(!stripped.contains('<'));
        assert!(!stripped.contains('>'));
    }

    #[test]
    fn test_newlines_converted_including_block_bodies() {
        let out = format_markup("```py\na = 1\nb = 2\n```");
        assert_eq!(out, "<pre lang=\"py\">a = 1<br>b = 2</pre>");
    }

    #[test]
    fn test_idempotent_on_same_input() {
        let raw = "hi\n```rs\nlet a: Vec<u8>;\n```\nuse `x < y`";
        assert_eq!(format_markup(raw), format_markup(raw));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_markup(""), "");
    }

    #[test]
    fn test_placeholder_sentinels_stripped_from_input() {
        let raw = format!("a{}0{}b", '\u{E000}', '\u{E001}');
        assert_eq!(format_markup(&raw), "a0b");
    }

    #[test]
    fn test_parse_segments_round_trip() {
        let out = format_markup("before\n```js\nconst x = 1;\n```\nafter `ok`");
        let segments = parse_segments(&out);
        assert_eq!(
            segments,
            vec![
                Segment::Text("before\n".into()),
                Segment::CodeBlock {
                    lang: "js".into(),
                    body: "const x = 1;".into()
                },
                Segment::Text("\nafter ".into()),
                Segment::InlineCode("ok".into()),
            ]
        );
    }

    #[test]
    fn test_parse_segments_truncated_marker_is_literal() {
        let full = format_markup("hi\n```py\nprint(1)\n```");
        // Cut mid-way through the <pre ...> marker, as a reveal would.
        let cut: String = full.chars().take(10).collect();
        let segments = parse_segments(&cut);
        assert_eq!(segments.len(), 1);
        match &segments[0] {
            Segment::Text(text) => assert!(text.starts_with("hi")),
            other => panic!("expected literal text, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_segments_unescapes_text() {
        let out = format_markup("a < b\nnext");
        assert_eq!(parse_segments(&out), vec![Segment::Text("a < b\nnext".into())]);
    }
}

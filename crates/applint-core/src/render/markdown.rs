//! Escaping for markdown comments and HTML summary cells.

/// Characters that get a backslash in comment text, after the backslash itself.
const MARKDOWN_SPECIAL: &[char] = &[
    '`', '*', '_', '{', '}', '[', ']', '<', '>', '(', ')', '#', '+', '-', '.', '!', '|',
];

/// Escape `text` for a single markdown table cell.
///
/// Backslashes go first so the escapes added afterwards survive. Newlines
/// become `<br>` to keep the row on one line.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c if MARKDOWN_SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Render `text` as inline code inside a table cell.
///
/// Pipes still split cells inside code spans, so they are escaped. Text with
/// backticks cannot sit in a single-backtick span and falls back to escaped prose.
pub fn code_span(text: &str) -> String {
    if text.contains('`') || text.contains('\n') {
        return escape_markdown(text);
    }
    format!("`{}`", text.replace('|', "\\|"))
}

/// Escape `text` for an HTML table cell; newlines become `<br>`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_every_special_character() {
        let input = "\\`*_{}[]<>()#+-.!|";
        assert_eq!(
            escape_markdown(input),
            "\\\\\\`\\*\\_\\{\\}\\[\\]\\<\\>\\(\\)\\#\\+\\-\\.\\!\\|"
        );
    }

    #[test]
    fn test_backslash_is_escaped_once() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
        assert_eq!(escape_markdown("\\|"), "\\\\\\|");
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(escape_markdown("one\ntwo\r\nthree"), "one<br>two<br>three");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_markdown("Icon missing"), "Icon missing");
    }

    #[test]
    fn test_code_span_escapes_pipe() {
        assert_eq!(code_span("a|b"), "`a\\|b`");
        assert_eq!(code_span("bitcoin/umbrel-app.yml"), "`bitcoin/umbrel-app.yml`");
        assert_eq!(code_span("a`b"), "a\\`b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"x\" & 'y'</b>\nnext"),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;<br>next"
        );
    }
}

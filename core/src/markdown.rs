//! Markdown to HTML for todo notes.
//!
//! Notes are rendered with pulldown-cmark (GFM tables, strikethrough and
//! task lists; single newlines become `<br />`). Note content is user input,
//! so the event stream is rewritten before it reaches the HTML writer:
//! - raw HTML blocks and inline HTML are emitted as escaped text,
//! - link and image targets using a script-capable scheme become `#`.

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Render markdown source to sanitized HTML.
pub fn render_markdown(source: &str) -> String {
    let events = Parser::new_ext(source, options()).map(sanitize);
    let mut html = String::with_capacity(source.len() * 3 / 2);
    push_html(&mut html, events);
    html
}

fn sanitize(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::SoftBreak => Event::HardBreak,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // Browsers ignore embedded whitespace and control characters in schemes.
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    if BLOCKED_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme)) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_renders_as_strong() {
        assert_eq!(render_markdown("**bold**"), "<p><strong>bold</strong></p>\n");
    }

    #[test]
    fn gfm_extensions_are_enabled() {
        let html = render_markdown("~~gone~~\n\n- [x] done\n\n| a |\n|---|\n| 1 |\n");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn single_newline_is_a_line_break() {
        assert_eq!(render_markdown("one\ntwo"), "<p>one<br />\ntwo</p>\n");
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nhi <b onclick=\"x()\">there</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b onclick"));
    }

    #[test]
    fn script_links_are_neutralized() {
        let html = render_markdown("[click](javascript:alert(1)) [ok](https://example.com)");
        assert!(html.contains("<a href=\"#\">click</a>"));
        assert!(html.contains("<a href=\"https://example.com\">ok</a>"));

        let html = render_markdown("![x](JaVaScRiPt:alert(1))");
        assert!(html.contains("src=\"#\""));
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let html = render_markdown("```rust\nfn main() {}\n```");
        assert!(html.contains("class=\"language-rust\""));
    }
}

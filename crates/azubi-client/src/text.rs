//! Report text codec.
//!
//! The entry endpoint stores HTML fragments the way the site's rich-text
//! editor produces them: the first line bare, each following line in its own
//! `<div>`, an empty line as `<div><br></div>`. The fragment travels
//! percent-encoded. Reading walks the rendered fragment and turns blocks and
//! `<br>` back into line breaks.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::ElementRef;
use scraper::node::Node;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn escape_html(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Converts plain text with line breaks into the editor's HTML fragment.
pub fn text_to_fragment(text: &str) -> String {
    let mut fragment = String::new();
    for (index, line) in text.lines().enumerate() {
        let line = escape_html(line);
        if index == 0 {
            fragment.push_str(&line);
        } else if line.is_empty() {
            fragment.push_str("<div><br></div>");
        } else {
            fragment.push_str("<div>");
            fragment.push_str(&line);
            fragment.push_str("</div>");
        }
    }
    fragment
}

/// Value of the `Inhalt` field for `text`.
pub fn encode_report_text(text: &str) -> String {
    utf8_percent_encode(&text_to_fragment(text), URI_COMPONENT).to_string()
}

fn is_block(name: &str) -> bool {
    matches!(name, "div" | "p" | "li")
}

fn push_line(lines: &mut Vec<String>, current: &mut String) {
    lines.push(current.trim().to_string());
    current.clear();
}

fn collect_lines(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) if el.name() == "br" => push_line(lines, current),
            Node::Element(el) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                if !is_block(el.name()) {
                    collect_lines(child_element, lines, current);
                    continue;
                }
                if !current.trim().is_empty() {
                    push_line(lines, current);
                }
                current.clear();
                let before = lines.len();
                collect_lines(child_element, lines, current);
                if !current.trim().is_empty() || lines.len() == before {
                    push_line(lines, current);
                }
                current.clear();
            }
            _ => {}
        }
    }
}

/// Lines of a rendered fragment, block boundaries turned into breaks.
pub fn fragment_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(element, &mut lines, &mut current);
    if !current.trim().is_empty() {
        push_line(&mut lines, &mut current);
    }
    lines
}

/// Text of a rendered fragment.
///
/// With formatting, line breaks are preserved (boundaries trimmed); without,
/// everything collapses to single-space-separated words.
pub fn fragment_to_text(element: ElementRef<'_>, with_formatting: bool) -> String {
    let lines = fragment_lines(element);
    if with_formatting {
        lines.join("\n").trim().to_string()
    } else {
        lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

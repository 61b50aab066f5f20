//! Cleanup of a storefront description block after DOM parsing.
//!
//! Storefront descriptions open with promotional markup (a banner, an
//! autoplaying trailer, spacer breaks) that is not part of the game text.

use scraper::node::Element;
use scraper::{ElementRef, Node};

/// Elements whose text is code, not prose.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Elements that start a new line when rendered; their text is separated by a
/// space in the plain-text rendition.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre",
    "section", "table", "td", "th", "tr", "ul",
];

/// A description block with leading noise removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CleanDescription {
    /// Serialized markup of the remaining child nodes.
    pub html: String,
    /// Plain text of the remaining child nodes, whitespace collapsed.
    pub text: String,
}

/// `<br>`, `<video>`, and `<div class="banner...">` elements count as
/// leading noise.
fn is_noise_element(element: &Element) -> bool {
    match element.name() {
        "br" | "video" => true,
        "div" => element
            .attr("class")
            .is_some_and(|class| class.trim_start().starts_with("banner")),
        _ => false,
    }
}

/// Drops leading whitespace, comments and noise elements from `block`'s
/// children, in any order and any number of times, then renders what is left.
pub(crate) fn clean_description(block: ElementRef<'_>) -> CleanDescription {
    let content: Vec<_> = block
        .children()
        .skip_while(|node| match node.value() {
            Node::Text(text) => text.trim().is_empty(),
            Node::Comment(_) => true,
            Node::Element(element) => is_noise_element(element),
            _ => false,
        })
        .collect();

    let mut html = String::new();
    for (index, node) in content.iter().enumerate() {
        match node.value() {
            Node::Text(text) if index == 0 => push_escaped(&mut html, text.trim_start()),
            Node::Text(text) => push_escaped(&mut html, text),
            Node::Comment(comment) => {
                html.push_str("<!--");
                html.push_str(&comment.comment);
                html.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(*node) {
                    html.push_str(&element.html());
                }
            }
            _ => {}
        }
    }

    let mut text = String::new();
    for piece in content.iter().flat_map(|node| node.descendants()) {
        match piece.value() {
            Node::Text(fragment) => {
                let in_raw_text = piece.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name()))
                });
                if !in_raw_text {
                    text.push_str(fragment);
                }
            }
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => text.push(' '),
            _ => {}
        }
    }

    CleanDescription {
        html,
        text: text.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Escapes a text node the way the HTML serializer does.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

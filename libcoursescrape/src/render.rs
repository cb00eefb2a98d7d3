//! Serialisation of `scraper` trees with per-element edits.
//!
//! Parsed documents are never mutated. Edits are applied to a clone of the
//! tree, which `scraper` then serialises, so the same parsed page can be
//! queried any number of times.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

/// What to do with an element before serialising.
#[derive(Debug, PartialEq, Eq)]
pub enum ElementAction {
    Keep,
    /// Detach the element and everything below it.
    Remove,
    /// Give the element a new tag name and drop all of its attributes.
    Rename(&'static str),
}

/// Inner html of `target`, a node of `document`, with `action` applied to
/// every descendant element.
pub fn inner_html_with<F>(document: &Html, target: ElementRef<'_>, action: &F) -> String
where
    F: Fn(ElementRef<'_>) -> ElementAction,
{
    let edits: Vec<(NodeId, ElementAction)> = target
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .map(|element| (element.id(), action(element)))
        .filter(|(_, edit)| *edit != ElementAction::Keep)
        .collect();
    if edits.is_empty() {
        return target.inner_html();
    }

    let mut edited = document.clone();
    for (id, edit) in edits {
        let Some(mut node) = edited.tree.get_mut(id) else {
            continue;
        };
        match edit {
            ElementAction::Keep => {}
            ElementAction::Remove => node.detach(),
            ElementAction::Rename(new_name) => {
                if let Node::Element(element) = node.value() {
                    element.name.local = new_name.into();
                    element.attrs.clear();
                    element.id = None;
                    element.classes.clear();
                }
            }
        }
    }

    edited
        .tree
        .get(target.id())
        .and_then(ElementRef::wrap)
        .map(|element| element.inner_html())
        .unwrap_or_default()
}

/// Text of `element` and its descendants, skipping elements for which
/// `skip` returns true. Whitespace runs collapse into one space and the
/// result is trimmed.
pub fn text_with<F>(element: ElementRef<'_>, skip: &F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let mut raw = String::new();
    for child in element.children() {
        collect_text(child, skip, &mut raw);
    }
    normalize_whitespace(&raw)
}

fn collect_text<F>(node: ego_tree::NodeRef<'_, Node>, skip: &F, out: &mut String)
where
    F: Fn(ElementRef<'_>) -> bool,
{
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(_) => {
            if ElementRef::wrap(node).is_some_and(|el| skip(el)) {
                return;
            }
            for child in node.children() {
                collect_text(child, skip, out);
            }
        }
        _ => {}
    }
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escapes plain text for the generated `<title>` and heading elements.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

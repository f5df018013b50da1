//! View tree produced by the renderer.
//!
//! The tree is framework independent: hosts either serialize it with
//! [`ViewNode::to_html`] or walk it and route clicks on nodes tagged with a
//! [`Control`] back to the card.

use std::fmt::Write as _;

/// Interactive controls on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Primary Buy control (link or button).
    Buy,
    /// Secondary add-to-cart button.
    AddToCart,
    /// Variant chip at the given position in the option list.
    Chip(usize),
}

/// A node in the view tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Element(Element),
    Text(String),
}

/// An element with attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<ViewNode>,
    pub control: Option<Control>,
    pub disabled: bool,
}

const VOID_TAGS: [&str; 2] = ["img", "input"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            control: None,
            disabled: false,
        }
    }

    /// Set the `class` attribute.
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set an attribute, replacing an earlier value.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set an attribute only when a value is present.
    pub fn attr_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn child(mut self, child: impl Into<ViewNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a child when present.
    pub fn child_opt(mut self, child: Option<impl Into<ViewNode>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ViewNode::Text(text.into()))
    }

    pub fn control(mut self, control: Control) -> Self {
        self.control = Some(control);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Value of an attribute.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element's class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl From<Element> for ViewNode {
    fn from(element: Element) -> Self {
        ViewNode::Element(element)
    }
}

impl ViewNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ViewNode::Element(el) => Some(el),
            ViewNode::Text(_) => None,
        }
    }

    /// Depth-first iterator over all elements, this one included.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        if let ViewNode::Element(el) = self {
            out.push(el);
            for child in &el.children {
                child.collect_elements(out);
            }
        }
    }

    /// First element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.elements().into_iter().find(|el| el.has_class(class))
    }

    /// All elements carrying `class`, in document order.
    pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.has_class(class))
            .collect()
    }

    /// The element bound to `control`.
    pub fn find_control(&self, control: Control) -> Option<&Element> {
        self.elements()
            .into_iter()
            .find(|el| el.control == Some(control))
    }

    /// Concatenated text of this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ViewNode::Text(text) => out.push_str(text),
            ViewNode::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Serialize as HTML markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text(text) => out.push_str(&escape_html(text)),
            ViewNode::Element(el) => {
                let _ = write!(out, "<{}", el.tag);
                for (name, value) in &el.attrs {
                    let _ = write!(out, r#" {}="{}""#, name, escape_html(value));
                }
                if el.disabled {
                    out.push_str(" disabled");
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_serialization() {
        let node: ViewNode = Element::new("div")
            .class("card")
            .child(Element::new("img").attr("src", "/a.png").attr("alt", "A & B"))
            .child(Element::new("button").disabled(true).text("<Buy>"))
            .into();

        assert_eq!(
            node.to_html(),
            r#"<div class="card"><img src="/a.png" alt="A &amp; B"><button disabled>&lt;Buy&gt;</button></div>"#
        );
    }

    #[test]
    fn test_queries() {
        let node: ViewNode = Element::new("div")
            .class("row")
            .child(Element::new("span").class("chip active").control(Control::Chip(0)).text("S"))
            .child(Element::new("span").class("chip").control(Control::Chip(1)).text("M"))
            .into();

        assert_eq!(node.find_all_by_class("chip").len(), 2);
        assert_eq!(node.find_by_class("active").unwrap().text_content(), "S");
        assert_eq!(node.find_control(Control::Chip(1)).unwrap().text_content(), "M");
        assert!(node.find_control(Control::Buy).is_none());
        assert_eq!(node.text_content(), "SM");
    }

    #[test]
    fn test_attr_replaces_and_skips_none() {
        let el = Element::new("a")
            .attr("href", "/x")
            .attr("href", "/y")
            .attr_opt("title", None::<String>);
        assert_eq!(el.get_attr("href"), Some("/y"));
        assert_eq!(el.attrs.len(), 1);
    }
}

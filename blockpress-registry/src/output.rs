//! Render output: a small serializable markup tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta", "source", "wbr"];

/// What a block renders to.
///
/// Hosts either serialize this tree (JSON render results for a client-side
/// frontend) or write it out with [`RenderNode::to_html`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderNode {
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderNode>,
    },
    Text {
        text: String,
    },
    /// Children without a wrapper element.
    Fragment {
        children: Vec<RenderNode>,
    },
    /// Renders nothing. Used for blank regions left by failed blocks.
    Empty,
}

impl RenderNode {
    pub fn element(tag: impl Into<String>) -> Self {
        RenderNode::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text { text: text.into() }
    }

    pub fn fragment(children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment { children }
    }

    /// Sets an attribute. No-op on anything but an element.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let RenderNode::Element { attrs, .. } = &mut self {
            attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Appends a child to an element or fragment.
    #[must_use]
    pub fn child(mut self, node: RenderNode) -> Self {
        if let RenderNode::Element { children, .. } | RenderNode::Fragment { children } = &mut self {
            children.push(node);
        }
        self
    }

    /// Appends children to an element or fragment.
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = RenderNode>) -> Self {
        if let RenderNode::Element { children, .. } | RenderNode::Fragment { children } = &mut self {
            children.extend(nodes);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RenderNode::Empty => true,
            RenderNode::Fragment { children } => children.iter().all(RenderNode::is_empty),
            _ => false,
        }
    }

    /// Concatenated text of this subtree, ignoring markup.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text { text } => out.push_str(text),
            RenderNode::Element { children, .. } | RenderNode::Fragment { children } => {
                for c in children {
                    c.collect_text(out);
                }
            }
            RenderNode::Empty => {}
        }
    }

    /// Writes the tree as HTML. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    let _ = write!(out, " {k}=\"{}\"", escape(v));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for c in children {
                    c.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
            RenderNode::Text { text } => out.push_str(&escape(text)),
            RenderNode::Fragment { children } => {
                for c in children {
                    c.write_html(out);
                }
            }
            RenderNode::Empty => {}
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
